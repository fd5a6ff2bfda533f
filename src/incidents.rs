//! Incidents and their comments.
//!
//! Incident ids are chosen by the caller; comment ids are generated.
//! Comments live under `incidents/{incidentId}/comments`, and the parent
//! incident can be given explicitly or taken from the last created
//! Incident.

use serde::{Deserialize, Serialize};

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, Created, Envelope, ResourceKind, ResourceRef, Scope, Severity};

/// Lifecycle state of an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncidentStatus {
    New,
    Active,
    Closed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentProperties {
    pub title: String,
    pub severity: Severity,
    pub status: IncidentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentCommentProperties {
    pub message: String,
}

/// Creates (or replaces) the incident named `incident_id` and records it
/// as the last created Incident.
///
/// # Errors
///
/// - `SentinelError::Payload` — the properties could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_incident(
    client: &SentinelClient,
    incident_id: &str,
    properties: &IncidentProperties,
) -> Result<Created> {
    let scope = Scope::top(ResourceKind::Incident);
    resource::create(client, &scope, Some(incident_id), &Envelope { properties }).await
}

/// Reads one incident, by id or last created.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any incident was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Incident`) — the incident does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_incident(client: &SentinelClient, incident: ResourceRef<'_>) -> Result<ApiResponse> {
    resource::get(client, &Scope::top(ResourceKind::Incident), incident).await
}

/// Deletes an incident. The tracker entry is left in place.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any incident was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Incident`) — the incident does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn delete_incident(
    client: &SentinelClient,
    incident: ResourceRef<'_>,
) -> Result<ApiResponse> {
    resource::delete(client, &Scope::top(ResourceKind::Incident), incident).await
}

/// Lists every incident of the workspace.
///
/// # Errors
///

/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_incidents(client: &SentinelClient) -> Result<ApiResponse> {
    resource::list(client, &Scope::top(ResourceKind::Incident)).await
}

/// Adds a comment to `incident` under a generated comment id.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `incident` is `LastCreated` before any incident was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `IncidentComment`) — the incident does not exist.
/// - `SentinelError::Payload` — the comment could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_incident_comment(
    client: &SentinelClient,
    incident: ResourceRef<'_>,
    properties: &IncidentCommentProperties,
) -> Result<Created> {
    let scope = Scope::nested(client, ResourceKind::IncidentComment, incident)?;
    resource::create(client, &scope, None, &Envelope { properties }).await
}

/// Reads one comment of `incident`. Either reference may be
/// `LastCreated`.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any incident or comment was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `IncidentComment`) — the incident or the comment does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_incident_comment(
    client: &SentinelClient,
    incident: ResourceRef<'_>,
    comment: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::IncidentComment, incident)?;
    resource::get(client, &scope, comment).await
}

/// Deletes one comment of `incident`.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any incident or comment was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `IncidentComment`) — the incident or the comment does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn delete_incident_comment(
    client: &SentinelClient,
    incident: ResourceRef<'_>,
    comment: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::IncidentComment, incident)?;
    resource::delete(client, &scope, comment).await
}

/// Lists every comment of `incident`.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any incident was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Incident`) — the incident does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_incident_comments(
    client: &SentinelClient,
    incident: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::IncidentComment, incident)?;
    resource::list(client, &scope).await
}
