//! Hunting bookmarks: saved query results marked for investigation.
//!
//! - [`create_bookmark`] — PUT `bookmarks/{generated id}`.
//! - [`get_bookmark`] / [`delete_bookmark`] — explicit id or last created.
//! - [`list_bookmarks`] — GET `bookmarks`.

use serde::Serialize;

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, Created, Envelope, ResourceKind, ResourceRef, Scope};

/// Properties of a bookmark.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkProperties {
    pub display_name: String,
    /// KQL query the bookmark was taken from.
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Creates a bookmark under a freshly generated id and records it as the
/// last created Bookmark.
///
/// # Errors
///
/// - `SentinelError::Payload` — the properties could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_bookmark(
    client: &SentinelClient,
    properties: &BookmarkProperties,
) -> Result<Created> {
    let scope = Scope::top(ResourceKind::Bookmark);
    resource::create(client, &scope, None, &Envelope { properties }).await
}

/// Reads one bookmark, by id or last created.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any bookmark was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Bookmark`) — the bookmark does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_bookmark(client: &SentinelClient, bookmark: ResourceRef<'_>) -> Result<ApiResponse> {
    resource::get(client, &Scope::top(ResourceKind::Bookmark), bookmark).await
}

/// Deletes a bookmark. The tracker entry is left in place.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any bookmark was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Bookmark`) — the bookmark does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn delete_bookmark(
    client: &SentinelClient,
    bookmark: ResourceRef<'_>,
) -> Result<ApiResponse> {
    resource::delete(client, &Scope::top(ResourceKind::Bookmark), bookmark).await
}

/// Lists every bookmark of the workspace.
///
/// # Errors
///

/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_bookmarks(client: &SentinelClient) -> Result<ApiResponse> {
    resource::list(client, &Scope::top(ResourceKind::Bookmark)).await
}
