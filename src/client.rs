//! Authenticated request execution for the Sentinel management API.
//!
//! `SentinelClient` owns the HTTP client, the `TokenProvider`, the workspace
//! base URL and the resource reference tracker. Every call goes through
//! [`SentinelClient::execute`]:
//!
//! 1. fetch a token (always, there is no anonymous path),
//! 2. send the request with `Authorization: Bearer <token>`,
//! 3. classify the response: 2xx hands back the body untouched, 404 is
//!    `NotFound`, anything else is `Api` with a normalized body.
//!
//! No request is retried. Dropping the returned future cancels the
//! in-flight request.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Serialize;

use crate::auth::TokenProvider;
use crate::error::{Result, SentinelError};
use crate::normalize::normalize;
use crate::tracker::ResourceTracker;

/// Version of the Microsoft.SecurityInsights API this crate targets.
pub const DEFAULT_API_VERSION: &str = "2020-01-01";

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Failure bodies are truncated to this many bytes in logs.
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Connect and overall request timeouts for management API calls.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    /// TCP + TLS handshake.
    pub connect: Duration,
    /// Full round-trip including the response body.
    pub request: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            connect: Duration::from_secs(10),
            request: Duration::from_secs(60),
        }
    }
}

/// One request to issue. Built per call and consumed by `execute`.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub body: Option<String>,
    pub content_type: Option<&'static str>,
}

impl RequestDescriptor {
    pub fn new(method: Method, url: Url) -> Self {
        RequestDescriptor {
            method,
            url,
            body: None,
            content_type: None,
        }
    }

    /// Attaches `payload` as a UTF-8 JSON body.
    pub fn with_json<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self> {
        self.body = Some(serde_json::to_string(payload)?);
        self.content_type = Some(JSON_CONTENT_TYPE);
        Ok(self)
    }
}

/// A successful response body, passed through as opaque text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResponse {
    /// Non-empty body, exactly as received.
    Body(String),
    /// The API succeeded without a body (typical for DELETE).
    Empty,
}

impl ApiResponse {
    fn from_body(body: String) -> Self {
        if body.is_empty() {
            ApiResponse::Empty
        } else {
            ApiResponse::Body(body)
        }
    }

    /// The raw body, or `""` for [`ApiResponse::Empty`].
    pub fn as_text(&self) -> &str {
        match self {
            ApiResponse::Body(body) => body,
            ApiResponse::Empty => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ApiResponse::Empty)
    }

    /// Indented JSON for display; non-JSON bodies come back verbatim.
    pub fn pretty(&self) -> String {
        match self {
            ApiResponse::Body(body) => serde_json::from_str::<serde_json::Value>(body)
                .ok()
                .and_then(|value| serde_json::to_string_pretty(&value).ok())
                .unwrap_or_else(|| body.clone()),
            ApiResponse::Empty => String::new(),
        }
    }
}

/// Authenticated client for one Sentinel workspace.
pub struct SentinelClient {
    http: Client,
    base_url: String,
    api_version: String,
    auth: TokenProvider,
    tracker: Arc<ResourceTracker>,
}

impl SentinelClient {
    /// `base_url` is the workspace's `Microsoft.SecurityInsights` provider
    /// URL; collection names are appended to it.
    pub fn new(auth: TokenProvider, base_url: &str, api_version: &str) -> Result<Self> {
        Self::with_timeouts(auth, base_url, api_version, Timeouts::default())
    }

    pub fn with_timeouts(
        auth: TokenProvider,
        base_url: &str,
        api_version: &str,
        timeouts: Timeouts,
    ) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(timeouts.connect)
            .timeout(timeouts.request)
            .build()?;
        Ok(SentinelClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_version: api_version.to_string(),
            auth,
            tracker: Arc::new(ResourceTracker::default()),
        })
    }

    /// Replaces the reference tracker, e.g. to share one between clients
    /// or to give each session its own.
    pub fn with_tracker(mut self, tracker: Arc<ResourceTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn tracker(&self) -> &ResourceTracker {
        &self.tracker
    }

    /// Builds `{base_url}/{segments...}?api-version={api_version}`.
    /// Segments are percent-encoded.
    pub fn resource_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url).map_err(|err| {
            SentinelError::config(format!("base URL {:?} is invalid: {err}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                SentinelError::config(format!("base URL {:?} cannot take a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    /// Sends one authenticated request and classifies the response.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<ApiResponse> {
        // Token fetch happens-before send; an auth failure stops the call here.
        let token = self.auth.get_token().await?;

        let RequestDescriptor {
            method,
            url,
            body,
            content_type,
        } = request;
        tracing::debug!(%method, %url, "sending request");

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .bearer_auth(token.secret());
        if let Some(body) = body {
            builder = builder
                .header(CONTENT_TYPE, content_type.unwrap_or(JSON_CONTENT_TYPE))
                .body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            tracing::debug!(%method, %url, %status, "request succeeded");
            return Ok(ApiResponse::from_body(body));
        }

        tracing::warn!(%method, %url, %status, body = %sanitize_for_log(&body), "request failed");
        let error = normalize(&body);
        if status == StatusCode::NOT_FOUND {
            return Err(SentinelError::NotFound {
                kind: None,
                url: url.to_string(),
                error,
            });
        }
        Err(SentinelError::Api { status, error })
    }

    pub async fn get(&self, url: Url) -> Result<ApiResponse> {
        self.execute(RequestDescriptor::new(Method::GET, url)).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, url: Url, payload: &B) -> Result<ApiResponse> {
        self.execute(RequestDescriptor::new(Method::PUT, url).with_json(payload)?)
            .await
    }

    pub async fn delete(&self, url: Url) -> Result<ApiResponse> {
        self.execute(RequestDescriptor::new(Method::DELETE, url))
            .await
    }
}

/// Truncates a body for logging and strips control characters.
fn sanitize_for_log(body: &str) -> String {
    let truncated = if body.len() > MAX_LOG_BODY_LENGTH {
        let mut end = MAX_LOG_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... [truncated, {} bytes total]", &body[..end], body.len())
    } else {
        body.to_string()
    };
    truncated.replace(|c: char| c.is_control(), " ")
}
