//! Resource kinds and the generic operations every resource client uses.
//!
//! Each kind is a row in a small static table (collection segment, parent
//! kind). The per-kind modules only build payloads and pick a row; the
//! create/get/delete/list logic lives here once:
//!
//! - **create** — PUT `{base}/{collection}/{id}`, with `id` generated
//!   (UUID v4) unless the caller supplies one, then record it in the
//!   tracker.
//! - **get** / **delete** — GET/DELETE on the same address; the id comes
//!   from the caller or from the tracker.
//! - **list** — GET on the collection itself.
//!
//! Nested kinds (actions under alert rules, comments under incidents) put
//! the parent's collection and id in front.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;

/// Every resource kind the management API exposes to this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Action,
    AlertRule,
    AlertRuleTemplate,
    Bookmark,
    DataConnector,
    Incident,
    IncidentComment,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 7] = [
        ResourceKind::Action,
        ResourceKind::AlertRule,
        ResourceKind::AlertRuleTemplate,
        ResourceKind::Bookmark,
        ResourceKind::DataConnector,
        ResourceKind::Incident,
        ResourceKind::IncidentComment,
    ];

    /// URL segment of the kind's collection.
    pub fn collection(self) -> &'static str {
        match self {
            ResourceKind::Action => "actions",
            ResourceKind::AlertRule => "alertRules",
            ResourceKind::AlertRuleTemplate => "alertRuleTemplates",
            ResourceKind::Bookmark => "bookmarks",
            ResourceKind::DataConnector => "dataConnectors",
            ResourceKind::Incident => "incidents",
            ResourceKind::IncidentComment => "comments",
        }
    }

    /// Kind whose instances contain this kind's collection, if any.
    pub fn parent(self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Action => Some(ResourceKind::AlertRule),
            ResourceKind::IncidentComment => Some(ResourceKind::Incident),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Action => "Action",
            ResourceKind::AlertRule => "AlertRule",
            ResourceKind::AlertRuleTemplate => "AlertRuleTemplate",
            ResourceKind::Bookmark => "Bookmark",
            ResourceKind::DataConnector => "DataConnector",
            ResourceKind::Incident => "Incident",
            ResourceKind::IncidentComment => "IncidentComment",
        };
        f.write_str(name)
    }
}

/// How an operation addresses a single resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceRef<'a> {
    /// An explicit identifier.
    Id(&'a str),
    /// The most recently created instance of the kind.
    LastCreated,
}

impl<'a> From<&'a str> for ResourceRef<'a> {
    fn from(id: &'a str) -> Self {
        ResourceRef::Id(id)
    }
}

impl<'a> From<Option<&'a str>> for ResourceRef<'a> {
    fn from(id: Option<&'a str>) -> Self {
        id.map_or(ResourceRef::LastCreated, ResourceRef::Id)
    }
}

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    /// The id recorded in the tracker.
    pub id: String,
    /// Response body as returned by the API.
    pub response: ApiResponse,
}

/// Alert and incident severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
    Informational,
}

/// `{"properties": {...}}`, the body shape of kinds without a `kind` tag.
#[derive(Serialize)]
pub(crate) struct Envelope<'a, P> {
    pub(crate) properties: &'a P,
}

/// A collection, possibly under a resolved parent instance.
pub(crate) struct Scope {
    kind: ResourceKind,
    parent: Option<(ResourceKind, String)>,
}

impl Scope {
    pub(crate) fn top(kind: ResourceKind) -> Self {
        Scope { kind, parent: None }
    }

    /// Scope of `kind` under the parent instance named by `parent`. The
    /// parent reference is ignored for kinds without a parent.
    pub(crate) fn nested(
        client: &SentinelClient,
        kind: ResourceKind,
        parent: ResourceRef<'_>,
    ) -> Result<Self> {
        let parent = match kind.parent() {
            Some(parent_kind) => Some((parent_kind, client.tracker().resolve(parent_kind, parent)?)),
            None => None,
        };
        Ok(Scope { kind, parent })
    }

    /// Kind a missing collection is reported as.
    fn listing_kind(&self) -> ResourceKind {
        self.parent
            .as_ref()
            .map_or(self.kind, |(parent_kind, _)| *parent_kind)
    }

    fn segments<'s>(&'s self, id: Option<&'s str>) -> Vec<&'s str> {
        let mut segments = Vec::with_capacity(4);
        if let Some((parent_kind, parent_id)) = &self.parent {
            segments.push(parent_kind.collection());
            segments.push(parent_id.as_str());
        }
        segments.push(self.kind.collection());
        segments.extend(id);
        segments
    }
}

pub(crate) async fn create<B: Serialize + ?Sized>(
    client: &SentinelClient,
    scope: &Scope,
    id: Option<&str>,
    payload: &B,
) -> Result<Created> {
    let requested = match id {
        Some(id) => id.to_string(),
        None => uuid::Uuid::new_v4().to_string(),
    };
    let url = client.resource_url(&scope.segments(Some(requested.as_str())))?;
    let response = client
        .put(url, payload)
        .await
        .map_err(|err| err.for_kind(scope.kind))?;

    let id = created_id(&response).unwrap_or(requested);
    client.tracker().set_last_created(scope.kind, id.clone());
    tracing::info!(kind = %scope.kind, %id, "created resource");
    Ok(Created { id, response })
}

pub(crate) async fn get(
    client: &SentinelClient,
    scope: &Scope,
    reference: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let id = client.tracker().resolve(scope.kind, reference)?;
    let url = client.resource_url(&scope.segments(Some(id.as_str())))?;
    client.get(url).await.map_err(|err| err.for_kind(scope.kind))
}

pub(crate) async fn delete(
    client: &SentinelClient,
    scope: &Scope,
    reference: ResourceRef<'_>,
) -> Result<ApiResponse> {
    let id = client.tracker().resolve(scope.kind, reference)?;
    let url = client.resource_url(&scope.segments(Some(id.as_str())))?;
    let response = client
        .delete(url)
        .await
        .map_err(|err| err.for_kind(scope.kind))?;
    tracing::info!(kind = %scope.kind, %id, "deleted resource");
    Ok(response)
}

/// A 404 on a nested collection means the parent instance is missing, so
/// the error names the parent kind.
pub(crate) async fn list(client: &SentinelClient, scope: &Scope) -> Result<ApiResponse> {
    let url = client.resource_url(&scope.segments(None))?;
    client
        .get(url)
        .await
        .map_err(|err| err.for_kind(scope.listing_kind()))
}

/// The id the API reports for a created resource: `name`, else the last
/// segment of the ARM `id`.
fn created_id(response: &ApiResponse) -> Option<String> {
    let value: Value = serde_json::from_str(response.as_text()).ok()?;
    if let Some(name) = value.get("name").and_then(Value::as_str).filter(|s| !s.is_empty()) {
        return Some(name.to_string());
    }
    value
        .get("id")
        .and_then(Value::as_str)
        .and_then(|id| id.trim_end_matches('/').rsplit('/').next())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}
