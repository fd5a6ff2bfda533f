//! Workspace and service principal configuration, loaded from TOML.
//!
//! ```toml
//! tenant_id = "00000000-0000-0000-0000-000000000000"
//! app_id = "11111111-1111-1111-1111-111111111111"
//! app_secret = "..."            # or SENTINEL_APP_SECRET
//! subscription_id = "22222222-2222-2222-2222-222222222222"
//! resource_group_name = "soc-rg"
//! workspace_name = "soc-workspace"
//! workflow_id = "/subscriptions/.../providers/Microsoft.Logic/workflows/playbook"
//! ```
//!
//! Everything else has a default. The library only consumes the loaded
//! struct; it never re-reads or mutates it.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::auth::{Credentials, DEFAULT_AUDIENCE, DEFAULT_AUTHORITY, TokenProvider};
use crate::client::{DEFAULT_API_VERSION, SentinelClient, Timeouts};
use crate::error::{Result, SentinelError};

/// ARM URL of a workspace's `Microsoft.SecurityInsights` provider.
pub const DEFAULT_URL_TEMPLATE: &str = "https://management.azure.com/subscriptions/{subscription_id}/resourceGroups/{resource_group_name}/providers/Microsoft.OperationalInsights/workspaces/{workspace_name}/providers/Microsoft.SecurityInsights";

#[derive(Clone, Deserialize)]
pub struct SentinelConfig {
    pub tenant_id: String,
    pub app_id: String,
    #[serde(default)]
    pub app_secret: String,
    pub subscription_id: String,
    pub resource_group_name: String,
    pub workspace_name: String,
    #[serde(default = "default_api_version")]
    pub api_version: String,
    /// Base URL template with `{subscription_id}`, `{resource_group_name}`
    /// and `{workspace_name}` placeholders.
    #[serde(default = "default_url_template")]
    pub url_template: String,
    /// ARM id of the Logic App used when creating actions.
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default = "default_authority")]
    pub authority: String,
    #[serde(default = "default_audience")]
    pub audience: String,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_url_template() -> String {
    DEFAULT_URL_TEMPLATE.to_string()
}

fn default_authority() -> String {
    DEFAULT_AUTHORITY.to_string()
}

fn default_audience() -> String {
    DEFAULT_AUDIENCE.to_string()
}

fn default_connect_timeout_secs() -> u64 {
    Timeouts::default().connect.as_secs()
}

fn default_request_timeout_secs() -> u64 {
    Timeouts::default().request.as_secs()
}

impl SentinelConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| SentinelError::config(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            SentinelError::config(format!("could not read {}: {err}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Rejects configurations with empty required fields.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("tenant_id", &self.tenant_id),
            ("app_id", &self.app_id),
            ("app_secret", &self.app_secret),
            ("subscription_id", &self.subscription_id),
            ("resource_group_name", &self.resource_group_name),
            ("workspace_name", &self.workspace_name),
            ("api_version", &self.api_version),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(SentinelError::config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// The workspace base URL with the template's placeholders filled in.
    pub fn base_url(&self) -> String {
        self.url_template
            .replace("{subscription_id}", &self.subscription_id)
            .replace("{resource_group_name}", &self.resource_group_name)
            .replace("{workspace_name}", &self.workspace_name)
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            tenant_id: self.tenant_id.clone(),
            client_id: self.app_id.clone(),
            client_secret: self.app_secret.clone(),
            audience: self.audience.clone(),
        }
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            connect: Duration::from_secs(self.connect_timeout_secs),
            request: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Validates the configuration and builds a client for its workspace.
    pub fn client(&self) -> Result<SentinelClient> {
        self.validate()?;
        let auth = TokenProvider::with_authority(self.credentials(), &self.authority)?;
        SentinelClient::with_timeouts(auth, &self.base_url(), &self.api_version, self.timeouts())
    }
}
