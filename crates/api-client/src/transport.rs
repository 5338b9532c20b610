//! HTTP transport abstraction
//!
//! `RequestAttempt` is the full description of one outbound call plus its
//! single-use `retried` marker. The marker is immutable from the outside:
//! a replay is a new attempt built with `into_retried()`, never a flag
//! flipped on a request object some other code still holds.
//!
//! `Transport` uses `Pin<Box<dyn Future>>` return types for
//! dyn-compatibility (`Arc<dyn Transport>`), so tests can substitute a
//! scripted transport for the reqwest-backed one.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::Method;
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// One outbound call: verb, path, body, headers, and the retry marker.
#[derive(Debug, Clone)]
pub struct RequestAttempt {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. `/assets`.
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: HeaderMap,
    retried: bool,
}

impl RequestAttempt {
    /// Describe a request. Attempts start un-retried.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: HeaderMap::new(),
            retried: false,
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach extra headers.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Whether this attempt has already been replayed once after a refresh.
    pub fn retried(&self) -> bool {
        self.retried
    }

    /// Consume the attempt and produce its one permitted replay.
    ///
    /// This is the only way to set the marker: a given logical request can
    /// be auto-retried at most once.
    pub fn into_retried(mut self) -> Self {
        self.retried = true;
        self
    }
}

/// Status and body of a completed HTTP exchange.
///
/// Error statuses are ordinary responses here — the client layer passes
/// non-auth errors through untouched and only inspects 401.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the response carries the "unauthenticated" signal (401).
    ///
    /// 403 means authorized-but-disallowed and must not trigger a refresh.
    pub fn is_unauthenticated(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Deserialize the body.
    pub fn json<T: DeserializeOwned>(&self) -> std::result::Result<T, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Abstraction over the HTTP call itself.
pub trait Transport: Send + Sync {
    /// Perform the described call and report status plus body.
    ///
    /// Only transport-level failures (connect, timeout) are `Err`; any
    /// HTTP status is `Ok`.
    fn send<'a>(
        &'a self,
        attempt: &'a RequestAttempt,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>>;
}

/// reqwest-backed transport.
///
/// The inner client must be built with a cookie store — the backend
/// authenticates through HTTP-only cookies, and the refresh call shares
/// the same jar.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransport {
    /// Build a transport (and its cookie-carrying reqwest client) from config.
    ///
    /// The timeout is set on the client itself, not just per request: the
    /// refresh invoker reuses this client directly, and a hung refresh
    /// endpoint must become a refresh failure, not stall the coordinator
    /// and every queued waiter.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(format!("building HTTP client: {e}")))?;
        Ok(Self::with_client(client, config))
    }

    /// Wrap an existing reqwest client (shared with the refresh invoker).
    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    /// The underlying reqwest client, for collaborators that must share
    /// the cookie jar (the refresh invoker).
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

impl Transport for HttpTransport {
    fn send<'a>(
        &'a self,
        attempt: &'a RequestAttempt,
    ) -> Pin<Box<dyn Future<Output = Result<TransportResponse>> + Send + 'a>> {
        Box::pin(async move {
            let url = format!("{}{}", self.base_url, attempt.path);
            debug!(method = %attempt.method, %url, retried = attempt.retried(), "sending request");

            let mut request = self
                .client
                .request(attempt.method.clone(), &url)
                .headers(attempt.headers.clone())
                .timeout(self.timeout);
            if let Some(ref body) = attempt.body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    Error::Timeout(format!("{} {url}: {e}", attempt.method))
                } else {
                    Error::Transport(format!("{} {url}: {e}", attempt.method))
                }
            })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| Error::Transport(format!("reading response body: {e}")))?;

            Ok(TransportResponse::new(status, body))
        })
    }
}
