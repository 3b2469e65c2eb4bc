//! # Catalog Lookup
//!
//! Resolves a free-form `"{title} {artist}"` query to at most one playable
//! track. The recommender only depends on the [`CatalogSearch`] trait;
//! [`SpotifyClient`] is the real implementation.
//!
//! ## Spotify flow
//!
//! 1. Client-credentials grant against the accounts service, the bearer
//!    token is kept until shortly before it expires.
//! 2. `GET /v1/search` with `type=track`, `limit=1` and a fixed market.
//!
//! No retries. Timeouts are whatever the HTTP agent enforces.

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::{debug, info};
use serde::Deserialize;
use std::cell::RefCell;
use std::fmt;
use std::time::{Duration, Instant};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Refresh this long before the reported expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Opaque catalog id of a playable track.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackId(String);

impl TrackId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The single operation the recommender needs from a catalog.
pub trait CatalogSearch {
    /// Best match for `query`, or `None` if the catalog has nothing.
    ///
    /// # Errors
    ///
    /// Transport, authentication, or decoding failures.
    fn search(&self, query: &str) -> Result<Option<TrackId>>;
}

impl<C: CatalogSearch + ?Sized> CatalogSearch for &C {
    fn search(&self, query: &str) -> Result<Option<TrackId>> {
        (**self).search(query)
    }
}

/// App credentials for the client-credentials grant.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

// Keep the secret out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

impl Credentials {
    fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", STANDARD.encode(raw))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<TrackItem>,
}

#[derive(Debug, Deserialize)]
struct TrackItem {
    id: String,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn from_response(response: TokenResponse, now: Instant) -> Self {
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(TOKEN_EXPIRY_MARGIN);
        Self {
            value: response.access_token,
            expires_at: now + lifetime,
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Spotify Web API search client, backed by a blocking `ureq` agent.
pub struct SpotifyClient {
    http_client: ureq::Agent,
    credentials: Credentials,
    market: String,
    token_url: String,
    search_url: String,
    token: RefCell<Option<AccessToken>>,
}

impl SpotifyClient {
    #[must_use]
    pub fn new(credentials: Credentials, market: impl Into<String>) -> Self {
        Self::with_endpoints(credentials, market, TOKEN_URL, SEARCH_URL)
    }

    /// Same client, talking to other token and search endpoints (a local
    /// stand-in server, a proxy).
    #[must_use]
    pub fn with_endpoints(
        credentials: Credentials,
        market: impl Into<String>,
        token_url: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        let http_client = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(5))
            .timeout_read(Duration::from_secs(15))
            .timeout_write(Duration::from_secs(15))
            .build();
        Self {
            http_client,
            credentials,
            market: market.into(),
            token_url: token_url.into(),
            search_url: search_url.into(),
            token: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn market(&self) -> &str {
        &self.market
    }

    fn access_token(&self) -> Result<String> {
        let now = Instant::now();
        if let Some(token) = self.token.borrow().as_ref().filter(|t| t.is_fresh(now)) {
            return Ok(token.value.clone());
        }

        debug!("Requesting Spotify access token");
        let response: TokenResponse = self
            .http_client
            .post(&self.token_url)
            .set("Authorization", &self.credentials.basic_auth_header())
            .send_form(&[("grant_type", "client_credentials")])
            .map_err(|err| anyhow!("Spotify token request failed: {err}"))?
            .into_json()
            .context("Spotify token response could not be parsed")?;

        let token = AccessToken::from_response(response, now);
        info!("Obtained Spotify access token");
        let value = token.value.clone();
        *self.token.borrow_mut() = Some(token);
        Ok(value)
    }
}

impl CatalogSearch for SpotifyClient {
    fn search(&self, query: &str) -> Result<Option<TrackId>> {
        let token = self.access_token()?;

        debug!("Searching Spotify for `{query}' in market {}", self.market);
        let response: SearchResponse = self
            .http_client
            .get(&self.search_url)
            .set("Authorization", &format!("Bearer {token}"))
            .query("q", query)
            .query("type", "track")
            .query("limit", "1")
            .query("market", &self.market)
            .call()
            .map_err(|err| anyhow!("Spotify search failed: {err}"))?
            .into_json()
            .context("Spotify search response could not be parsed")?;

        Ok(first_track(response))
    }
}

fn first_track(response: SearchResponse) -> Option<TrackId> {
    response
        .tracks
        .items
        .into_iter()
        .next()
        .map(|item| TrackId::new(item.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::{Arc, Mutex};
    use std::thread;

    /// What the local server saw of one request.
    #[derive(Debug, Clone)]
    struct Recorded {
        request_line: String,
        headers: Vec<(String, String)>,
        body: String,
    }

    impl Recorded {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        }
    }

    /// Minimal HTTP/1.1 server on 127.0.0.1 standing in for both Spotify
    /// endpoints. Every request is logged before it is answered.
    struct FakeSpotify {
        base_url: String,
        requests: Arc<Mutex<Vec<Recorded>>>,
    }

    impl FakeSpotify {
        fn start(search_body: &'static str) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
            let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
            let requests = Arc::new(Mutex::new(Vec::new()));

            let recorded = Arc::clone(&requests);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    let Ok(stream) = stream else { break };
                    let _ = handle(stream, search_body, &recorded);
                }
            });

            Self { base_url, requests }
        }

        fn client(&self) -> SpotifyClient {
            let credentials = Credentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            };
            SpotifyClient::with_endpoints(
                credentials,
                "GB",
                format!("{}/api/token", self.base_url),
                format!("{}/v1/search", self.base_url),
            )
        }

        fn requests_to(&self, path: &str) -> Vec<Recorded> {
            self.requests
                .lock()
                .expect("request log")
                .iter()
                .filter(|request| request.request_line.contains(path))
                .cloned()
                .collect()
        }
    }

    fn handle(
        mut stream: TcpStream,
        search_body: &str,
        recorded: &Mutex<Vec<Recorded>>,
    ) -> Option<()> {
        let mut reader = BufReader::new(stream.try_clone().ok()?);
        let mut request_line = String::new();
        reader.read_line(&mut request_line).ok()?;

        let mut headers = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).ok()?;
            let line = line.trim_end();
            if line.is_empty() {
                break;
            }
            if let Some((key, value)) = line.split_once(':') {
                headers.push((key.trim().to_string(), value.trim().to_string()));
            }
        }

        let length = headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.parse::<usize>().ok())
            .unwrap_or(0);
        let mut body = vec![0; length];
        reader.read_exact(&mut body).ok()?;

        let is_token = request_line.contains("/api/token");
        recorded.lock().ok()?.push(Recorded {
            request_line: request_line.trim_end().to_string(),
            headers,
            body: String::from_utf8_lossy(&body).into_owned(),
        });

        let payload = if is_token {
            r#"{"access_token":"tok-1","token_type":"Bearer","expires_in":3600}"#
        } else {
            search_body
        };
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
            payload.len()
        );
        stream.write_all(response.as_bytes()).ok()?;
        stream.flush().ok()
    }

    #[test]
    fn test_first_track_takes_first_item() {
        let json = r#"{"tracks":{"href":"x","items":[{"id":"4uLU6hMCjMI75M1A2tKUQC","name":"Never"},{"id":"other"}],"limit":1}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("valid json");
        assert_eq!(
            first_track(response),
            Some(TrackId::new("4uLU6hMCjMI75M1A2tKUQC"))
        );
    }

    #[test]
    fn test_first_track_empty_items() {
        let json = r#"{"tracks":{"items":[]}}"#;
        let response: SearchResponse = serde_json::from_str(json).expect("valid json");
        assert_eq!(first_track(response), None);
    }

    #[test]
    fn test_basic_auth_header() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
        };
        // base64("id:secret")
        assert_eq!(credentials.basic_auth_header(), "Basic aWQ6c2VjcmV0");
    }

    #[test]
    fn test_credentials_debug_hides_secret() {
        let credentials = Credentials {
            client_id: "id".to_string(),
            client_secret: "hunter2".to_string(),
        };
        let rendered = format!("{credentials:?}");
        assert!(rendered.contains("id"));
        assert!(!rendered.contains("hunter2"));
    }

    #[test]
    fn test_token_expiry_margin() {
        let now = Instant::now();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_string(),
                expires_in: 3600,
            },
            now,
        );
        assert!(token.is_fresh(now));
        assert!(token.is_fresh(now + Duration::from_secs(3539)));
        assert!(!token.is_fresh(now + Duration::from_secs(3540)));
    }

    #[test]
    fn test_short_lived_token_is_never_fresh() {
        let now = Instant::now();
        let token = AccessToken::from_response(
            TokenResponse {
                access_token: "abc".to_string(),
                expires_in: 30,
            },
            now,
        );
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn test_search_against_local_server() {
        let server = FakeSpotify::start(r#"{"tracks":{"items":[]}}"#);
        let client = server.client();
        assert_eq!(client.market(), "GB");

        assert_eq!(client.search("Song A Artist X").expect("search ok"), None);
        assert_eq!(client.search("Song B Artist Y").expect("search ok"), None);

        // the token is fetched once and reused
        let token_requests = server.requests_to("/api/token");
        assert_eq!(token_requests.len(), 1);
        let token_request = &token_requests[0];
        assert!(token_request.request_line.starts_with("POST "));
        assert_eq!(token_request.header("authorization"), Some("Basic aWQ6c2VjcmV0"));
        assert_eq!(token_request.body, "grant_type=client_credentials");

        let searches = server.requests_to("/v1/search");
        assert_eq!(searches.len(), 2);
        for search in &searches {
            let line = &search.request_line;
            assert!(line.starts_with("GET "));
            assert!(line.contains("q="));
            assert!(line.contains("type=track"));
            assert!(line.contains("limit=1"));
            assert!(line.contains("market=GB"));
            assert_eq!(search.header("Authorization"), Some("Bearer tok-1"));
        }
    }

    #[test]
    fn test_search_returns_first_track_from_local_server() {
        let server = FakeSpotify::start(
            r#"{"tracks":{"items":[{"id":"4uLU6hMCjMI75M1A2tKUQC"},{"id":"other"}]}}"#,
        );
        let client = server.client();

        let track = client.search("Easy On Me Adele").expect("search ok");
        assert_eq!(
            track.as_ref().map(TrackId::as_str),
            Some("4uLU6hMCjMI75M1A2tKUQC")
        );
    }
}
