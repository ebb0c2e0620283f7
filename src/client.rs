use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::FetchError;
use crate::models::LookupResponse;

/// Raw RGBA pixels of a decoded avatar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Anything that can resolve a username to a classified profile response.
pub trait ProfileSource: Send + Sync {
    /// Performs one lookup for `username`.
    fn fetch_profile(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<LookupResponse, FetchError>> + Send;
}

/// GitHub REST client for the `/users/{username}` endpoint.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: Url,
}

impl GitHubClient {
    /// Creates a client with the headers GitHub expects.
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("github-profile-lookup"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github.v3+json"));

        if let Some(token) = &config.token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| FetchError::InvalidToken)?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_base: config.api_base.clone(),
        })
    }

    /// Fetches and classifies a GitHub user by username.
    pub async fn fetch_user(&self, username: &str) -> Result<LookupResponse, FetchError> {
        let url = profile_url(&self.api_base, username)?;
        info!(%url, "Looking up profile");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!(%status, len = bytes.len(), "Profile response received");

        let body: Value = serde_json::from_slice(&bytes)?;
        Ok(LookupResponse::from_body(body)?)
    }

    /// Downloads an avatar at `size` pixels and decodes it into RGBA.
    pub async fn fetch_avatar(&self, avatar_url: &str, size: u32) -> Result<AvatarPixels, FetchError> {
        let sized_url = sized_avatar_url(avatar_url, size);
        let bytes = self
            .http
            .get(&sized_url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let image = image::load_from_memory(&bytes)?;

        // GitHub sometimes ignores `s=` for cached avatars.
        let rgba = image.thumbnail_exact(size, size).to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(AvatarPixels {
            rgba: rgba.into_raw(),
            width,
            height,
        })
    }
}

impl ProfileSource for GitHubClient {
    fn fetch_profile(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<LookupResponse, FetchError>> + Send {
        self.fetch_user(username)
    }
}

/// Builds `{base}/users/{username}` with the username as one encoded segment.
pub fn profile_url(base: &Url, username: &str) -> Result<Url, FetchError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| FetchError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .push("users")
        .push(username);
    Ok(url)
}

fn sized_avatar_url(url: &str, size: u32) -> String {
    if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserProfile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn base(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    /// Answers one HTTP request with a canned response and returns the request head.
    async fn serve_once(
        status: &'static str,
        content_type: &'static str,
        body: &'static str,
    ) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _addr) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 8192];
            let mut read = 0;
            while read < buf.len() {
                let n = stream.read(&mut buf[read..]).await.unwrap();
                if n == 0 {
                    break;
                }
                read += n;
                if buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.ok();
            String::from_utf8_lossy(&buf[..read]).into_owned()
        });

        (base(&format!("http://{addr}")), handle)
    }

    fn client_for(api_base: Url) -> GitHubClient {
        GitHubClient::new(&Config {
            api_base,
            ..Config::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_user_not_found_body_despite_404() {
        let (api_base, server) = serve_once(
            "404 Not Found",
            "application/json",
            r#"{"message":"Not Found","documentation_url":"https://docs.github.com/rest"}"#,
        )
        .await;

        let resp = client_for(api_base).fetch_user("ghost").await.unwrap();
        assert_eq!(resp, LookupResponse::NotFound("Not Found".into()));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /users/ghost HTTP/1.1\r\n"));
        assert!(request.to_ascii_lowercase().contains("user-agent: github-profile-lookup"));
    }

    #[tokio::test]
    async fn test_fetch_user_html_body_is_decode_error() {
        let (api_base, server) = serve_once(
            "200 OK",
            "text/html",
            "<!doctype html><html><body>unicorn</body></html>",
        )
        .await;

        let result = client_for(api_base).fetch_user("octocat").await;
        assert!(matches!(result, Err(FetchError::Decode(_))));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_user_rate_limit_body_is_treated_as_profile() {
        let (api_base, server) = serve_once(
            "403 Forbidden",
            "application/json",
            r#"{"message":"API rate limit exceeded for 127.0.0.1."}"#,
        )
        .await;

        let resp = client_for(api_base).fetch_user("octocat").await.unwrap();
        assert_eq!(resp, LookupResponse::Found(UserProfile::default()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_user_profile_body() {
        let (api_base, server) = serve_once(
            "200 OK",
            "application/json",
            r#"{"name":"The Octocat","public_repos":8,"created_at":"2011-01-25T18:44:36Z","avatar_url":"https://x/a.png"}"#,
        )
        .await;

        let LookupResponse::Found(profile) =
            client_for(api_base).fetch_profile("octocat").await.unwrap()
        else {
            panic!("expected a profile");
        };
        assert_eq!(profile.name, "The Octocat");
        assert_eq!(profile.public_repos, 8);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /users/octocat HTTP/1.1\r\n"));
    }

    #[test]
    fn test_profile_url_default_base() {
        let url = profile_url(&base("https://api.github.com"), "octocat").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/users/octocat");
    }

    #[test]
    fn test_profile_url_with_path_prefix() {
        let url = profile_url(&base("https://ghe.example.com/api/v3/"), "octocat").unwrap();
        assert_eq!(url.as_str(), "https://ghe.example.com/api/v3/users/octocat");
    }

    #[test]
    fn test_profile_url_encodes_reserved_characters() {
        let api = base("https://api.github.com");
        assert_eq!(
            profile_url(&api, "octo cat").unwrap().as_str(),
            "https://api.github.com/users/octo%20cat"
        );
        assert_eq!(
            profile_url(&api, "../orgs").unwrap().path(),
            "/users/..%2Forgs"
        );
        assert_eq!(
            profile_url(&api, "who?x=1#y").unwrap().as_str(),
            "https://api.github.com/users/who%3Fx=1%23y"
        );
    }

    #[test]
    fn test_sized_avatar_url() {
        assert_eq!(
            sized_avatar_url("https://avatars.example/u/1?v=4", 128),
            "https://avatars.example/u/1?v=4&s=128"
        );
        assert_eq!(
            sized_avatar_url("https://avatars.example/u/1", 64),
            "https://avatars.example/u/1?s=64"
        );
    }

    #[test]
    fn test_client_rejects_bad_token() {
        let config = Config {
            token: Some("bad\ntoken".into()),
            ..Config::default()
        };
        assert!(matches!(GitHubClient::new(&config), Err(FetchError::InvalidToken)));
    }
}
