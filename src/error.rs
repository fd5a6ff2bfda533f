//! Typed error hierarchy for the sentinel-mgmt crate.
//!
//! `SentinelError` classifies every failure a management operation can hit
//! into one of a small set of boundaries:
//! - `Auth` — the Azure AD token endpoint (client-credentials grant).
//! - `Transport` — the request never reached, or never came back from,
//!   the network (DNS, TCP, TLS, client timeout).
//! - `NotFound` / `Api` — the management API answered with a non-2xx.
//!   404 is kept apart so callers can say "create one first".
//! - `NoPriorResource` — implicit addressing asked for "the last X I
//!   created" before any X was created in this process.
//!
//! Nothing in the crate recovers from these internally; they propagate to
//! the caller of the resource operation unchanged.

use reqwest::StatusCode;

use crate::normalize::NormalizedError;
use crate::resource::ResourceKind;

/// Unified error type for all sentinel-mgmt library operations.
#[derive(Debug, thiserror::Error)]
pub enum SentinelError {
    /// Token acquisition failed.
    ///
    /// Covers non-2xx answers from `/oauth2/v2.0/token` (the AADSTS body is
    /// kept in `message`), network failures reaching the endpoint, and
    /// token responses that cannot be parsed or are already expired.
    #[error("authentication failed: {message}")]
    Auth {
        /// Human-readable description, including HTTP status and the
        /// Azure AD error body when one was returned.
        message: String,
        /// The underlying transport or parse error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A network-level failure: no HTTP status is available.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered 404 for an addressed resource.
    #[error("{} not found at {url}{}", describe(.kind), create_hint(.kind))]
    NotFound {
        /// Resource kind the request addressed. Filled in by the resource
        /// layer; `None` when the raw executor is used directly.
        kind: Option<ResourceKind>,
        /// The URL that was requested.
        url: String,
        /// Normalized error body returned alongside the 404.
        error: NormalizedError,
    },

    /// The API answered with any other non-success status.
    #[error("API error {status}: {error}")]
    Api {
        /// HTTP status code returned by the management API.
        status: StatusCode,
        /// Normalized error body. Malformed bodies are preserved verbatim.
        error: NormalizedError,
    },

    /// Implicit addressing was requested before any successful create.
    #[error("no {kind} has been created yet, please create a new {kind} first")]
    NoPriorResource {
        /// The kind whose last-created id was requested.
        kind: ResourceKind,
    },

    /// A request payload could not be encoded as JSON.
    #[error("failed to encode request payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Configuration could not be loaded or produced an unusable URL.
    #[error("invalid configuration: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },
}

impl SentinelError {
    /// Attaches a resource kind to a `NotFound` error. Other variants pass
    /// through untouched.
    pub(crate) fn for_kind(self, kind: ResourceKind) -> Self {
        match self {
            SentinelError::NotFound { kind: None, url, error } => SentinelError::NotFound {
                kind: Some(kind),
                url,
                error,
            },
            other => other,
        }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        SentinelError::Config {
            message: message.into(),
        }
    }

    /// Returns `true` for the 404 classification.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SentinelError::NotFound { .. })
    }
}

fn describe(kind: &Option<ResourceKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "resource".to_string(),
    }
}

fn create_hint(kind: &Option<ResourceKind>) -> String {
    match kind {
        Some(kind) => format!(", please create a new {kind} first"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, SentinelError>;
