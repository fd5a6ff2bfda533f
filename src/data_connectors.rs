//! Data connectors that stream alerts from other products into the
//! workspace.
//!
//! Connector bodies are `{"kind": ..., "properties": {...}}`. Connector ids
//! are generated on create.

use serde::{Deserialize, Serialize};

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, Created, ResourceKind, ResourceRef, Scope};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "properties")]
pub enum DataConnector {
    AzureSecurityCenter(AscDataConnectorProperties),
    AzureActiveDirectory(AadDataConnectorProperties),
}

/// Azure Security Center connector: alerts of one subscription.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AscDataConnectorProperties {
    pub subscription_id: String,
    pub data_types: AlertsDataTypes,
}

/// Azure Active Directory connector: alerts of one tenant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AadDataConnectorProperties {
    pub tenant_id: String,
    pub data_types: AlertsDataTypes,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertsDataTypes {
    pub alerts: DataTypeConnection,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataTypeConnection {
    pub state: DataConnectionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataConnectionState {
    Enabled,
    Disabled,
}

impl AlertsDataTypes {
    pub fn alerts(state: DataConnectionState) -> Self {
        AlertsDataTypes {
            alerts: DataTypeConnection { state },
        }
    }
}

/// Connects a product under a generated id and records it as the last
/// created DataConnector.
///
/// # Errors
///
/// - `SentinelError::Api` with 400 — e.g. the subscription or tenant is
///   not accessible to the workspace.
/// - `SentinelError::Payload` — the connector could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_data_connector(
    client: &SentinelClient,
    connector: &DataConnector,
) -> Result<Created> {
    resource::create(client, &Scope::top(ResourceKind::DataConnector), None, connector).await
}

/// Reads one connector, by id or last created.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any data connector was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `DataConnector`) — the connector does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn get_data_connector(
    client: &SentinelClient,
    connector: ResourceRef<'_>,
) -> Result<ApiResponse> {
    resource::get(client, &Scope::top(ResourceKind::DataConnector), connector).await
}

/// Disconnects a connector. The tracker entry is left in place.
///
/// # Errors
///
/// - `SentinelError::NoPriorResource` — `LastCreated` before any data connector was
///   created; no request is sent.
/// - `SentinelError::NotFound` (kind `DataConnector`) — the connector does not exist.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn delete_data_connector(
    client: &SentinelClient,
    connector: ResourceRef<'_>,
) -> Result<ApiResponse> {
    resource::delete(client, &Scope::top(ResourceKind::DataConnector), connector).await
}

/// Lists every connector of the workspace.
///
/// # Errors
///

/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_data_connectors(client: &SentinelClient) -> Result<ApiResponse> {
    resource::list(client, &Scope::top(ResourceKind::DataConnector)).await
}
