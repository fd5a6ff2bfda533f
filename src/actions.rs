//! Alert rule actions: Logic App playbooks triggered by a rule.
//!
//! Actions are nested under `alertRules/{ruleId}/actions`. Both the parent
//! rule and the action can be addressed explicitly or by last created.

use serde::Serialize;

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, Created, Envelope, ResourceKind, ResourceRef, Scope};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionProperties {
    /// ARM id of the Logic App workflow.
    pub logic_app_resource_id: String,
    /// Callback URL of the workflow's trigger.
    pub trigger_uri: String,
}

/// Attaches a new action to `rule` under a generated id and records it
/// as the last created Action.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `rule` is `LastCreated` before any alert rule was
///   created; no request is sent.
/// - `SentinelError::Payload` — the properties could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_action(
    client: &SentinelClient,
    rule: ResourceRef<'_>,
    properties: &ActionProperties,
) -> Result<Created> {
    let scope = Scope::nested(client, ResourceKind::Action, rule)?;
    resource::create(client, &scope, None, &Envelope { properties }).await
}

/// Reads one action of `rule`. Either reference may be `LastCreated`.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any alert rule or action was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Action`) — the rule or the action does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_action(
    client: &SentinelClient,
    rule: ResourceRef<'_>,
    action: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::Action, rule)?;
    resource::get(client, &scope, action).await
}

/// Detaches an action from `rule`. The tracker entry is left in place.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any alert rule or action was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `Action`) — the rule or the action does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn delete_action(
    client: &SentinelClient,
    rule: ResourceRef<'_>,
    action: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::Action, rule)?;
    resource::delete(client, &scope, action).await
}

/// Lists every action of `rule`.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any alert rule was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `AlertRule`) — the rule does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_actions(client: &SentinelClient, rule: ResourceRef<'_>) -> Result<ApiResponse> {
    let scope = Scope::nested(client, ResourceKind::Action, rule)?;
    resource::list(client, &scope).await
}
