//! What the window should display for a given screen state.

use chrono::{DateTime, NaiveDate};

use crate::screen::ProfileScreen;

/// Display format for the account creation date.
const CREATED_AT_FORMAT: &str = "%d-%m-%Y";

/// The input form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub username: String,
    /// Show a spinner instead of the submit button.
    pub loading: bool,
    pub error: Option<String>,
}

/// The profile card, with every field already formatted as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub avatar_url: String,
    pub name: String,
    pub email: String,
    pub bio: String,
    pub location: String,
    pub public_repos: String,
    pub created_at: String,
}

/// One of the two mutually exclusive views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenView {
    Form(FormView),
    Card(CardView),
}

/// Maps the screen to the view it should show.
#[must_use]
pub fn render(screen: &ProfileScreen) -> ScreenView {
    if !screen.show_result() {
        let error = screen.error_message();
        return ScreenView::Form(FormView {
            username: screen.username().to_owned(),
            loading: screen.is_loading(),
            error: (!error.is_empty()).then(|| error.to_owned()),
        });
    }

    let profile = screen.profile();
    ScreenView::Card(CardView {
        avatar_url: profile.avatar_url.clone(),
        name: profile.name.clone(),
        email: profile.email.clone().unwrap_or_default(),
        bio: profile.bio.clone().unwrap_or_default(),
        location: profile.location.clone().unwrap_or_default(),
        public_repos: profile.public_repos.to_string(),
        created_at: format_created_at(&profile.created_at),
    })
}

/// Formats an ISO 8601 timestamp as `DD-MM-YYYY` in its own offset.
///
/// Empty input yields an empty string; unparseable input is returned as is.
#[must_use]
pub fn format_created_at(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return String::new();
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return ts.format(CREATED_AT_FORMAT).to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format(CREATED_AT_FORMAT).to_string();
    }
    raw.to_owned()
}
