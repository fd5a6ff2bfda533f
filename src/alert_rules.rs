//! Analytics alert rules.
//!
//! Three rule kinds are supported, each serialized as
//! `{"kind": ..., "properties": {...}}`:
//!
//! - `Fusion` — enables the built-in Fusion correlation engine from a
//!   template.
//! - `MicrosoftSecurityIncidentCreation` — raises incidents from alerts of
//!   another Microsoft security product.
//! - `Scheduled` — runs a KQL query on a schedule.
//!
//! Rule ids are generated on create.

use serde::{Deserialize, Serialize};

use crate::client::{ApiResponse, SentinelClient};
use crate::error::Result;
use crate::resource::{self, Created, ResourceKind, ResourceRef, Scope, Severity};

/// Alert rule body, tagged by `kind`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "properties")]
pub enum AlertRule {
    Fusion(FusionAlertRuleProperties),
    MicrosoftSecurityIncidentCreation(SecurityIncidentCreationAlertRuleProperties),
    Scheduled(ScheduledAlertRuleProperties),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionAlertRuleProperties {
    pub alert_rule_template_name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIncidentCreationAlertRuleProperties {
    pub display_name: String,
    pub product_filter: ProductFilter,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub severities_filter: Vec<Severity>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledAlertRuleProperties {
    pub display_name: String,
    pub enabled: bool,
    pub query: String,
    /// ISO 8601 duration, e.g. `PT5M`.
    pub query_frequency: String,
    /// ISO 8601 duration of the lookback window.
    pub query_period: String,
    pub severity: Severity,
    pub trigger_operator: TriggerOperator,
    pub trigger_threshold: u32,
    pub suppression_duration: String,
    pub suppression_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Comparison applied between a scheduled query's result count and its
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerOperator {
    GreaterThan,
    LessThan,
    Equal,
    NotEqual,
}

/// Source product for incident-creation rules. Serialized as the display
/// names the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductFilter {
    #[serde(rename = "Azure Security Center")]
    AzureSecurityCenter,
    #[serde(rename = "Azure Security Center for IoT")]
    AzureSecurityCenterForIot,
    #[serde(rename = "Azure Advanced Threat Protection")]
    AzureAdvancedThreatProtection,
    #[serde(rename = "Azure Active Directory Identity Protection")]
    AzureActiveDirectoryIdentityProtection,
    #[serde(rename = "Microsoft Cloud App Security")]
    MicrosoftCloudAppSecurity,
    #[serde(rename = "Microsoft Defender Advanced Threat Protection")]
    MicrosoftDefenderAdvancedThreatProtection,
    #[serde(rename = "Office 365 Advanced Threat Protection")]
    Office365AdvancedThreatProtection,
}

/// Creates a rule under a generated id and records it as the last
/// created AlertRule. The body's `kind` follows the [`AlertRule`] variant.
///
/// # Errors
///
/// - `SentinelError::Api` with 400 — typically an invalid KQL query or
///   ISO 8601 duration in a scheduled rule.
/// - `SentinelError::Payload` — the rule could not be encoded.
/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn create_alert_rule(client: &SentinelClient, rule: &AlertRule) -> Result<Created> {
    resource::create(client, &Scope::top(ResourceKind::AlertRule), None, rule).await
}

/// Reads one rule, by id or last created.
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
pub async fn get_alert_rule(client: &SentinelClient, rule: ResourceRef<'_>) -> Result<ApiResponse> {
    resource::get(client, &Scope::top(ResourceKind::AlertRule), rule).await
}

/// Deletes a rule together with its actions.
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
pub async fn delete_alert_rule(
    client: &SentinelClient,
    rule: ResourceRef<'_>,
) -> Result<ApiResponse> {
    resource::delete(client, &Scope::top(ResourceKind::AlertRule), rule).await
}

/// Lists every alert rule of the workspace.
///
/// # Errors
///

/// - `SentinelError::Api` — non-success HTTP status other than 404 (e.g.
///   403 when the service principal lacks a Sentinel role).
/// - `SentinelError::Auth` — token acquisition failed; nothing was sent.
/// - `SentinelError::Transport` — network failure or timeout.
pub async fn list_alert_rules(client: &SentinelClient) -> Result<ApiResponse> {
    resource::list(client, &Scope::top(ResourceKind::AlertRule)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fusion_rule_is_tagged_with_kind() {
        let rule = AlertRule::Fusion(FusionAlertRuleProperties {
            alert_rule_template_name: "f71aba3d-28fb-450b-b192-4e76a83015c8".to_string(),
            enabled: true,
        });
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["kind"], "Fusion");
        assert_eq!(
            json["properties"]["alertRuleTemplateName"],
            "f71aba3d-28fb-450b-b192-4e76a83015c8"
        );
        assert_eq!(json["properties"]["enabled"], true);
    }

    #[test]
    fn incident_creation_rule_uses_product_display_name() {
        let rule = AlertRule::MicrosoftSecurityIncidentCreation(
            SecurityIncidentCreationAlertRuleProperties {
                display_name: "MSICR-1".to_string(),
                product_filter: ProductFilter::AzureSecurityCenter,
                enabled: true,
                severities_filter: Vec::new(),
            },
        );
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["kind"], "MicrosoftSecurityIncidentCreation");
        assert_eq!(json["properties"]["productFilter"], "Azure Security Center");
        assert!(json["properties"].get("severitiesFilter").is_none());
    }

    #[test]
    fn scheduled_rule_serializes_all_query_settings() {
        let rule = AlertRule::Scheduled(ScheduledAlertRuleProperties {
            display_name: "scheduled-alert-rule-1".to_string(),
            enabled: true,
            query: "Syslog".to_string(),
            query_frequency: "PT5M".to_string(),
            query_period: "PT5M".to_string(),
            severity: Severity::Low,
            trigger_operator: TriggerOperator::Equal,
            trigger_threshold: 1,
            suppression_duration: "PT5M".to_string(),
            suppression_enabled: true,
            description: None,
        });
        let json = serde_json::to_value(&rule).unwrap();
        let props = &json["properties"];
        assert_eq!(json["kind"], "Scheduled");
        assert_eq!(props["queryFrequency"], "PT5M");
        assert_eq!(props["triggerOperator"], "Equal");
        assert_eq!(props["triggerThreshold"], 1);
        assert_eq!(props["severity"], "Low");
        assert_eq!(props["suppressionEnabled"], true);
    }
}
