//! Profile lookup screen state.
//!
//! [`ProfileScreen`] owns the username input, the last fetched profile and the
//! current [`ScreenState`]. A lookup is split in two halves so the network call
//! can run off the UI thread:
//!
//! 1. [`ProfileScreen::submit`] validates the input, enters `Loading` and hands
//!    out a [`LookupTicket`].
//! 2. [`ProfileScreen::complete`] applies the outcome for that ticket, unless
//!    the ticket is stale or the screen was closed in the meantime.

use tracing::{debug, info, warn};

use crate::error::{FetchError, SubmitError};
use crate::models::{LookupResponse, UserProfile};

/// Which part of the lookup flow the screen is in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScreenState {
    /// Waiting for a username.
    #[default]
    Input,
    /// A request is in flight. An error from the previous attempt stays visible.
    Loading { previous_error: Option<String> },
    /// A profile is shown.
    Result,
    /// The input form is shown with an error below it.
    Error(String),
}

impl ScreenState {
    /// Returns true when the profile card is visible.
    #[inline]
    #[must_use]
    pub const fn shows_result(&self) -> bool {
        matches!(self, ScreenState::Result)
    }
}

/// Handle tying a completion back to the submit that started it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    username: String,
}

impl LookupTicket {
    /// The username to look up, trimmed of surrounding whitespace.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The lookup counter value this ticket was issued at.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// State of the single lookup screen.
#[derive(Debug, Clone, Default)]
pub struct ProfileScreen {
    username: String,
    profile: UserProfile,
    state: ScreenState,
    generation: u64,
    closed: bool,
}

impl ProfileScreen {
    /// Creates a screen in the `Input` state with a default profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current username input.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Last successfully fetched profile. May be stale once the card is hidden.
    #[inline]
    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn show_result(&self) -> bool {
        self.state.shows_result()
    }

    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ScreenState::Loading { .. })
    }

    /// Inline error text, empty when there is none.
    #[must_use]
    pub fn error_message(&self) -> &str {
        match &self.state {
            ScreenState::Error(message)
            | ScreenState::Loading {
                previous_error: Some(message),
            } => message,
            _ => "",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Replaces the username input text.
    pub fn set_username(&mut self, text: impl Into<String>) {
        self.username = text.into();
    }

    /// Starts a lookup for the current username.
    ///
    /// Leaves the state untouched when rejected.
    pub fn submit(&mut self) -> Result<LookupTicket, SubmitError> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(SubmitError::EmptyUsername);
        }
        if self.is_loading() {
            return Err(SubmitError::InFlight);
        }

        let ticket = LookupTicket {
            generation: self.generation.wrapping_add(1),
            username: username.to_owned(),
        };
        self.generation = ticket.generation;
        let previous_error = match std::mem::take(&mut self.state) {
            ScreenState::Error(message) => Some(message),
            _ => None,
        };
        self.state = ScreenState::Loading { previous_error };
        info!(username = %ticket.username, generation = ticket.generation, "Lookup started");
        Ok(ticket)
    }

    /// Applies the outcome of a lookup. Returns false if it was ignored.
    pub fn complete(
        &mut self,
        ticket: &LookupTicket,
        outcome: Result<LookupResponse, FetchError>,
    ) -> bool {
        if self.closed || ticket.generation != self.generation || !self.is_loading() {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                closed = self.closed,
                "Ignoring stale lookup result"
            );
            return false;
        }

        match outcome {
            Ok(LookupResponse::Found(profile)) => {
                info!(username = %ticket.username, "Profile found");
                self.profile = profile;
                self.state = ScreenState::Result;
                self.username.clear();
            }
            Ok(LookupResponse::NotFound(message)) => {
                info!(username = %ticket.username, "Profile not found");
                self.state = ScreenState::Error(message);
            }
            Err(e) => {
                warn!(username = %ticket.username, error = %e, "Lookup failed");
                self.state = ScreenState::Error(e.to_string());
            }
        }
        true
    }

    /// Hides the profile card and returns to the input form.
    ///
    /// Does nothing outside the `Result` state.
    pub fn reset_to_input(&mut self) {
        if self.show_result() {
            self.state = ScreenState::Input;
        }
    }

    /// Marks the screen as torn down. Later completions are ignored.
    pub fn close(&mut self) {
        self.closed = true;
    }
}
