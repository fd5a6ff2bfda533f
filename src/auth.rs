//! OAuth2 client-credentials authentication against Azure AD.
//!
//! Acquires bearer tokens for the Azure Resource Manager audience from the
//! `/oauth2/v2.0/token` endpoint. `TokenProvider` caches the last token and
//! hands it out again while it is comfortably inside its lifetime; otherwise
//! a fresh one is requested. There is no retry: a failed acquisition is an
//! `Auth` error for whichever operation needed the token.

use std::fmt;
use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::{Result, SentinelError};

/// Azure AD authority that hosts the per-tenant token endpoints.
pub const DEFAULT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Audience of the Azure Resource Manager API, which fronts Sentinel.
pub const DEFAULT_AUDIENCE: &str = "https://management.azure.com";

/// A cached token is not reused once it is this close to expiry.
const EXPIRY_BUFFER: Duration = Duration::from_secs(60);

const TOKEN_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const TOKEN_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Service principal credentials. Fixed for the lifetime of the process.
#[derive(Clone)]
pub struct Credentials {
    /// Azure AD tenant (directory) ID.
    pub tenant_id: String,
    /// Application (client) ID of the service principal.
    pub client_id: String,
    /// Client secret of the service principal.
    pub client_secret: String,
    /// Resource the token is requested for, e.g. [`DEFAULT_AUDIENCE`].
    pub audience: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("audience", &self.audience)
            .finish()
    }
}

/// Form body sent to the token endpoint.
#[derive(Serialize)]
struct TokenRequest<'a> {
    client_id: &'a str,
    scope: &'a str,
    client_secret: &'a str,
    grant_type: &'a str,
}

/// Subset of the Azure AD token response that we need.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// A bearer token and the instant it stops being valid.
#[derive(Clone)]
pub struct Token {
    access_token: String,
    expires_at: Instant,
}

impl Token {
    /// When the token expires.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// `true` once `expires_at` has passed.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Whether a cached token may be handed out again.
    fn is_reusable(&self) -> bool {
        Instant::now() + EXPIRY_BUFFER < self.expires_at
    }

    pub(crate) fn secret(&self) -> &str {
        &self.access_token
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Acquires and caches access tokens for one service principal.
///
/// The cache sits behind an async mutex held across acquisition, so
/// concurrent callers that all find the cache stale wait for a single
/// token request instead of racing their own.
pub struct TokenProvider {
    http: Client,
    token_url: String,
    credentials: Credentials,
    cache: Mutex<Option<Token>>,
}

impl TokenProvider {
    /// Provider that talks to the public Azure AD authority.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_authority(credentials, DEFAULT_AUTHORITY)
    }

    /// Provider that talks to a different authority (sovereign clouds,
    /// or a mock server in tests).
    pub fn with_authority(credentials: Credentials, authority: &str) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(TOKEN_CONNECT_TIMEOUT)
            .timeout(TOKEN_REQUEST_TIMEOUT)
            .build()?;
        Ok(TokenProvider {
            http,
            token_url: token_url(authority, &credentials.tenant_id),
            credentials,
            cache: Mutex::new(None),
        })
    }

    /// Creates a provider with a pre-set token, bypassing Azure AD.
    /// Used by tests; the token is valid for an hour.
    pub fn with_token(token: &str) -> Self {
        TokenProvider {
            http: Client::new(),
            token_url: String::new(),
            credentials: Credentials {
                tenant_id: String::new(),
                client_id: String::new(),
                client_secret: String::new(),
                audience: String::new(),
            },
            cache: Mutex::new(Some(Token {
                access_token: token.to_string(),
                expires_at: Instant::now() + Duration::from_secs(3600),
            })),
        }
    }

    /// Returns a token whose expiry lies in the future, requesting a new
    /// one when the cached token is missing or about to expire.
    pub async fn get_token(&self) -> Result<Token> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref().filter(|token| token.is_reusable()) {
            return Ok(token.clone());
        }

        tracing::debug!(
            tenant_id = %self.credentials.tenant_id,
            client_id = %self.credentials.client_id,
            "acquiring access token"
        );
        let token = self.acquire().await?;
        *cache = Some(token.clone());
        Ok(token)
    }

    async fn acquire(&self) -> Result<Token> {
        let scope = format!("{}/.default", self.credentials.audience.trim_end_matches('/'));
        let form = TokenRequest {
            client_id: &self.credentials.client_id,
            scope: &scope,
            client_secret: &self.credentials.client_secret,
            grant_type: "client_credentials",
        };

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|err| auth_error("could not reach token endpoint", err))?;

        // Read the body before checking status so the AADSTS diagnostics
        // survive into the error.
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| auth_error("could not read token response", err))?;

        if !status.is_success() {
            tracing::warn!(%status, "token request rejected");
            return Err(SentinelError::Auth {
                message: format!("token request failed ({status}): {body}"),
                source: None,
            });
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|err| auth_error("failed to parse token response", err))?;
        if parsed.expires_in == 0 {
            return Err(SentinelError::Auth {
                message: "token endpoint issued an already-expired token".to_string(),
                source: None,
            });
        }

        let expires_at = Instant::now()
            .checked_add(Duration::from_secs(parsed.expires_in))
            .ok_or_else(|| SentinelError::Auth {
                message: format!(
                    "token endpoint issued an unrepresentable lifetime ({}s)",
                    parsed.expires_in
                ),
                source: None,
            })?;

        Ok(Token {
            access_token: parsed.access_token,
            expires_at,
        })
    }
}

fn token_url(authority: &str, tenant_id: &str) -> String {
    format!(
        "{}/{}/oauth2/v2.0/token",
        authority.trim_end_matches('/'),
        tenant_id
    )
}

fn auth_error(
    message: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> SentinelError {
    SentinelError::Auth {
        message: format!("{message}: {source}"),
        source: Some(Box::new(source)),
    }
}
