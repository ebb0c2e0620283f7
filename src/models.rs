use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Message GitHub puts in the body when the user does not exist.
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

/// Represents a GitHub user profile from the `/users/{username}` API.
///
/// Missing or `null` fields fall back to their defaults; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub public_repos: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub avatar_url: String,
}

/// A classified response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResponse {
    /// The body is taken as the user's profile.
    Found(UserProfile),
    /// The body carried the `"Not Found"` sentinel.
    NotFound(String),
}

impl LookupResponse {
    /// Classifies a parsed body.
    ///
    /// The sentinel is matched on the `message` value, independent of the HTTP
    /// status. Anything else is decoded as a profile.
    pub fn from_body(body: Value) -> Result<Self, serde_json::Error> {
        if body.get("message").and_then(Value::as_str) == Some(NOT_FOUND_MESSAGE) {
            return Ok(Self::NotFound(NOT_FOUND_MESSAGE.to_owned()));
        }
        serde_json::from_value(body).map(Self::Found)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
