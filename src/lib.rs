//! GitHub profile lookup.
//!
//! A single screen that takes a username, fetches the public profile from the
//! GitHub REST API and shows it in a card.
//!
//! # Components
//!
//! - [`ProfileScreen`]: lookup state machine (input, loading, result, error)
//! - [`LookupSession`]: runs one lookup against a [`ProfileSource`]
//! - [`GitHubClient`]: reqwest-backed [`ProfileSource`] for `/users/{username}`
//! - [`view::render`]: maps the screen to what the window shows

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod screen;
pub mod view;

pub use client::{AvatarPixels, GitHubClient, ProfileSource};
pub use config::Config;
pub use error::{ConfigError, FetchError, SubmitError};
pub use lookup::LookupSession;
pub use models::{LookupResponse, UserProfile};
pub use screen::{LookupTicket, ProfileScreen, ScreenState};
pub use view::{CardView, FormView, ScreenView};
