//! Built-in alert rule templates (read-only).

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, ResourceKind, ResourceRef, Scope};

/// Reads one template. Templates are never created through this crate,
/// so there is no last-created form: the id must be given.
///
/// # Errors
///
/// - `SentinelError::NotFound` (kind `AlertRuleTemplate`) — no template has that id.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_alert_rule_template(
    client: &SentinelClient,
    template_id: &str,
) -> Result<ApiResponse> {
    let scope = Scope::top(ResourceKind::AlertRuleTemplate);
    resource::get(client, &scope, ResourceRef::Id(template_id)).await
}

/// Lists the built-in templates available to the workspace.
///
/// # Errors
///

/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_alert_rule_templates(client: &SentinelClient) -> Result<ApiResponse> {
    resource::list(client, &Scope::top(ResourceKind::AlertRuleTemplate)).await
}
