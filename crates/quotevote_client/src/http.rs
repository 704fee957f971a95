//! reqwest implementation of [`QuoteRemote`] against the quote REST API.

use crate::remote::{QuoteRemote, StoreError};
use quotevote_core::models::auth::{CredentialsRequest, LoginResponse};
use quotevote_core::models::quote::{QuoteTextRequest, VoteRequest};
use quotevote_core::{QueryState, Quote, QuoteId};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// HTTP client for the quote service rooted at a base URL.
#[derive(Debug, Clone)]
pub struct HttpQuoteStore {
    client: Client,
    base: String,
    log_timing: bool,
}

/// Join `segments` onto the base URL, percent-encoding each one.
///
/// # Returns
/// The endpoint URL, or a [`StoreError::Transport`] when `server` is not a
/// usable base.
pub fn api_url(server: &str, segments: &[&str]) -> Result<Url, StoreError> {
    let mut url = Url::parse(server)
        .map_err(|err| StoreError::Transport(format!("invalid server URL '{}': {}", server, err)))?;
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            StoreError::Transport(format!("server URL '{}' cannot be used as a base", server))
        })?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}

/// Trim whitespace and trailing slashes from a configured server URL.
pub fn normalize_server(server: &str) -> String {
    let mut normalized = server.trim().to_string();
    while normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// Pick a readable failure message from an error response body.
///
/// Prefers a JSON `error` or `message` field, then the raw body, then the
/// canonical status reason.
pub fn error_message_for_response(status: StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string();
    }

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        return ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str))
            .unwrap_or(body)
            .to_string();
    }

    body.trim().to_string()
}

async fn ensure_success(res: Response) -> Result<Response, StoreError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(StoreError::Unauthorized);
    }
    let body = match res.text().await {
        Ok(body) => body,
        Err(err) => format!("failed to read error response body: {}", err),
    };
    Err(StoreError::Status {
        status: status.as_u16(),
        message: error_message_for_response(status, &body),
    })
}

impl HttpQuoteStore {
    /// Build a store for `server` with a per-request timeout.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| StoreError::Transport(err.to_string()))?;
        let base = normalize_server(server);
        // Validate once so later joins only fail on bad segments.
        api_url(&base, &[])?;
        Ok(Self {
            client,
            base,
            log_timing: false,
        })
    }

    /// Emit per-request timings at `info` instead of `debug`.
    pub fn with_timing(mut self, enabled: bool) -> Self {
        self.log_timing = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        api_url(&self.base, segments)
    }

    async fn send(&self, op: &str, request: RequestBuilder) -> Result<Response, StoreError> {
        let started = Instant::now();
        let result = request.send().await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        let res = result.map_err(|err| StoreError::Transport(err.to_string()))?;
        if self.log_timing {
            info!(target: "quotevote::timing", op = op, status = res.status().as_u16(), elapsed_ms = elapsed_ms, "request");
        } else {
            debug!(op = op, status = res.status().as_u16(), elapsed_ms = elapsed_ms, "request");
        }
        ensure_success(res).await
    }
}

impl QuoteRemote for HttpQuoteStore {
    async fn search(&self, token: &str, query: &QueryState) -> Result<Vec<Quote>, StoreError> {
        let endpoint = self.url(&["api", "quotes", "search"])?;
        let request = self
            .client
            .get(endpoint)
            .bearer_auth(token)
            .query(&query.query_pairs());
        let res = self.send("search", request).await?;
        res.json::<Vec<Quote>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn vote(&self, token: &str, id: QuoteId) -> Result<(), StoreError> {
        let endpoint = self.url(&["api", "quotes", "vote"])?;
        let request = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(&VoteRequest { quote_id: id });
        self.send("vote", request).await.map(|_| ())
    }

    async fn create(&self, token: &str, text: &str) -> Result<(), StoreError> {
        let endpoint = self.url(&["api", "quotes"])?;
        let request = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(&QuoteTextRequest {
                text: text.to_string(),
            });
        self.send("create", request).await.map(|_| ())
    }

    async fn update(&self, token: &str, id: QuoteId, text: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        let endpoint = self.url(&["api", "quotes-update", id.as_str()])?;
        let request = self
            .client
            .post(endpoint)
            .bearer_auth(token)
            .json(&QuoteTextRequest {
                text: text.to_string(),
            });
        self.send("update", request).await.map(|_| ())
    }

    async fn delete(&self, token: &str, id: QuoteId) -> Result<(), StoreError> {
        let id = id.to_string();
        let endpoint = self.url(&["api", "quotes", id.as_str()])?;
        let request = self.client.delete(endpoint).bearer_auth(token);
        self.send("delete", request).await.map(|_| ())
    }

    async fn login(&self, request: &CredentialsRequest) -> Result<LoginResponse, StoreError> {
        let endpoint = self.url(&["login"])?;
        let res = self
            .send("login", self.client.post(endpoint).json(request))
            .await?;
        res.json::<LoginResponse>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }

    async fn register(&self, request: &CredentialsRequest) -> Result<(), StoreError> {
        let endpoint = self.url(&["register"])?;
        self.send("register", self.client.post(endpoint).json(request))
            .await
            .map(|_| ())
    }
}
