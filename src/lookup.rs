//! Runs lookups against a [`ProfileSource`] on behalf of a shared screen.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::ProfileSource;
use crate::error::SubmitError;
use crate::screen::{LookupTicket, ProfileScreen};

/// A profile source paired with the screen its results land on.
///
/// The lock is never held across the network call, so the UI thread can keep
/// reading the screen while a lookup is in flight.
#[derive(Debug)]
pub struct LookupSession<S> {
    source: S,
    screen: Arc<Mutex<ProfileScreen>>,
}

impl<S: ProfileSource> LookupSession<S> {
    pub fn new(source: S, screen: Arc<Mutex<ProfileScreen>>) -> Self {
        Self { source, screen }
    }

    /// Shared handle to the screen.
    #[inline]
    pub fn screen(&self) -> &Arc<Mutex<ProfileScreen>> {
        &self.screen
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Validates the input and moves the screen to `Loading`.
    pub fn begin(&self) -> Result<LookupTicket, SubmitError> {
        self.screen.lock().submit()
    }

    /// Fetches the profile for `ticket` and applies the outcome.
    ///
    /// Returns true if the screen changed and needs re-rendering.
    pub async fn resolve(&self, ticket: LookupTicket) -> bool {
        let outcome = self.source.fetch_profile(ticket.username()).await;
        self.screen.lock().complete(&ticket, outcome)
    }

    /// Runs a complete lookup: [`begin`](Self::begin) then [`resolve`](Self::resolve).
    pub async fn submit_lookup(&self) -> Result<bool, SubmitError> {
        let ticket = self.begin()?;
        Ok(self.resolve(ticket).await)
    }
}
