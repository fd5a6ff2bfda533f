//! CLI entry point for sentinel-mgmt.
//!
//! Loads the workspace configuration, authenticates as the configured
//! service principal and runs one resource operation. Response bodies go
//! to stdout (pretty-printed JSON), logs and errors to stderr.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (config, auth, transport, API error, ...)
//! - 2: argument validation error (clap handles this automatically)

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sentinel_mgmt::actions::{self, ActionProperties};
use sentinel_mgmt::alert_rule_templates;
use sentinel_mgmt::alert_rules::{
    self, AlertRule, FusionAlertRuleProperties, ProductFilter,
    ScheduledAlertRuleProperties, SecurityIncidentCreationAlertRuleProperties, TriggerOperator,
};
use sentinel_mgmt::bookmarks::{self, BookmarkProperties};
use sentinel_mgmt::client::{ApiResponse, SentinelClient};
use sentinel_mgmt::config::SentinelConfig;
use sentinel_mgmt::data_connectors::{
    self, AlertsDataTypes, AscDataConnectorProperties, DataConnectionState, DataConnector,
};
use sentinel_mgmt::error::Result;
use sentinel_mgmt::incidents::{
    self, IncidentCommentProperties, IncidentProperties, IncidentStatus,
};
use sentinel_mgmt::resource::{Created, ResourceRef, Severity};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "sentinel.toml")]
    config: PathBuf,

    /// Service principal secret. Overrides `app_secret` from the config
    /// file; prefer the environment variable over the flag.
    #[arg(long, env = "SENTINEL_APP_SECRET", hide_env_values = true)]
    secret: Option<String>,

    /// Log requests at debug level (RUST_LOG takes precedence).
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    resource: ResourceCommand,
}

#[derive(Subcommand)]
enum ResourceCommand {
    /// Logic App actions attached to an alert rule.
    Actions {
        #[command(subcommand)]
        op: ActionOp,
    },
    /// Built-in alert rule templates.
    AlertRuleTemplates {
        #[command(subcommand)]
        op: TemplateOp,
    },
    /// Analytics alert rules.
    AlertRules {
        #[command(subcommand)]
        op: AlertRuleOp,
    },
    /// Hunting bookmarks.
    Bookmarks {
        #[command(subcommand)]
        op: BookmarkOp,
    },
    /// Data connectors.
    DataConnectors {
        #[command(subcommand)]
        op: DataConnectorOp,
    },
    /// Incidents.
    Incidents {
        #[command(subcommand)]
        op: IncidentOp,
    },
    /// Comments on an incident.
    IncidentComments {
        #[command(subcommand)]
        op: CommentOp,
    },
}

#[derive(Subcommand)]
enum ActionOp {
    Create {
        /// Alert rule id (default: last created rule).
        #[arg(long)]
        rule: Option<String>,
        /// Trigger callback URL of the Logic App.
        #[arg(long)]
        trigger_uri: String,
    },
    Get {
        #[arg(long)]
        rule: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        rule: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    List {
        #[arg(long)]
        rule: Option<String>,
    },
}

#[derive(Subcommand)]
enum TemplateOp {
    Get {
        #[arg(long)]
        id: String,
    },
    List,
}

#[derive(Subcommand)]
enum AlertRuleOp {
    /// Enable the Fusion engine from a template.
    CreateFusion {
        #[arg(long)]
        template: String,
    },
    /// Raise incidents from another Microsoft security product's alerts.
    CreateIncidentCreation {
        #[arg(long)]
        display_name: String,
        #[arg(long, value_enum, default_value_t = ProductArg::AzureSecurityCenter)]
        product: ProductArg,
    },
    /// Run a KQL query on a schedule.
    CreateScheduled {
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        query: String,
        #[arg(long, value_enum, default_value_t = SeverityArg::Low)]
        severity: SeverityArg,
        #[arg(long, default_value = "PT5M")]
        frequency: String,
        #[arg(long, default_value = "PT5M")]
        period: String,
        #[arg(long, default_value_t = 1)]
        threshold: u32,
    },
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
enum BookmarkOp {
    Create {
        #[arg(long)]
        display_name: String,
        #[arg(long)]
        query: String,
        #[arg(long = "label")]
        labels: Vec<String>,
        #[arg(long)]
        query_result: Option<String>,
    },
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
enum DataConnectorOp {
    /// Connect Azure Security Center alerts of the configured subscription.
    Create {
        #[arg(long)]
        enabled: bool,
    },
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
enum IncidentOp {
    Create {
        /// Incident id, chosen by the caller.
        #[arg(long)]
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long, value_enum)]
        severity: SeverityArg,
        #[arg(long, value_enum, default_value_t = StatusArg::New)]
        status: StatusArg,
    },
    Get {
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        id: Option<String>,
    },
    List,
}

#[derive(Subcommand)]
enum CommentOp {
    Create {
        /// Incident id (default: last created incident).
        #[arg(long)]
        incident: Option<String>,
        #[arg(long)]
        message: String,
    },
    Get {
        #[arg(long)]
        incident: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    Delete {
        #[arg(long)]
        incident: Option<String>,
        #[arg(long)]
        id: Option<String>,
    },
    List {
        #[arg(long)]
        incident: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityArg {
    High,
    Medium,
    Low,
    Informational,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::High => Severity::High,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::Low => Severity::Low,
            SeverityArg::Informational => Severity::Informational,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum StatusArg {
    New,
    Active,
    Closed,
}

impl From<StatusArg> for IncidentStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::New => IncidentStatus::New,
            StatusArg::Active => IncidentStatus::Active,
            StatusArg::Closed => IncidentStatus::Closed,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ProductArg {
    AzureSecurityCenter,
    AzureSecurityCenterForIot,
    AzureAdvancedThreatProtection,
    AzureActiveDirectoryIdentityProtection,
    MicrosoftCloudAppSecurity,
    MicrosoftDefenderAdvancedThreatProtection,
    Office365AdvancedThreatProtection,
}

impl From<ProductArg> for ProductFilter {
    fn from(arg: ProductArg) -> Self {
        match arg {
            ProductArg::AzureSecurityCenter => ProductFilter::AzureSecurityCenter,
            ProductArg::AzureSecurityCenterForIot => ProductFilter::AzureSecurityCenterForIot,
            ProductArg::AzureAdvancedThreatProtection => ProductFilter::AzureAdvancedThreatProtection,
            ProductArg::AzureActiveDirectoryIdentityProtection => {
                ProductFilter::AzureActiveDirectoryIdentityProtection
            }
            ProductArg::MicrosoftCloudAppSecurity => ProductFilter::MicrosoftCloudAppSecurity,
            ProductArg::MicrosoftDefenderAdvancedThreatProtection => {
                ProductFilter::MicrosoftDefenderAdvancedThreatProtection
            }
            ProductArg::Office365AdvancedThreatProtection => {
                ProductFilter::Office365AdvancedThreatProtection
            }
        }
    }
}

/// What a command produced, for printing.
enum Outcome {
    Created(Created),
    Deleted(ApiResponse),
    Fetched(ApiResponse),
}

fn reference(id: &Option<String>) -> ResourceRef<'_> {
    ResourceRef::from(id.as_deref())
}

async fn run(client: &SentinelClient, config: &SentinelConfig, command: ResourceCommand) -> Result<Outcome> {
    let outcome = match command {
        ResourceCommand::Actions { op } => match op {
            ActionOp::Create { rule, trigger_uri } => {
                let properties = ActionProperties {
                    logic_app_resource_id: config.workflow_id.clone(),
                    trigger_uri,
                };
                Outcome::Created(actions::create_action(client, reference(&rule), &properties).await?)
            }
            ActionOp::Get { rule, id } => {
                Outcome::Fetched(actions::get_action(client, reference(&rule), reference(&id)).await?)
            }
            ActionOp::Delete { rule, id } => {
                Outcome::Deleted(actions::delete_action(client, reference(&rule), reference(&id)).await?)
            }
            ActionOp::List { rule } => {
                Outcome::Fetched(actions::list_actions(client, reference(&rule)).await?)
            }
        },

        ResourceCommand::AlertRuleTemplates { op } => match op {
            TemplateOp::Get { id } => {
                Outcome::Fetched(alert_rule_templates::get_alert_rule_template(client, &id).await?)
            }
            TemplateOp::List => {
                Outcome::Fetched(alert_rule_templates::list_alert_rule_templates(client).await?)
            }
        },

        ResourceCommand::AlertRules { op } => match op {
            AlertRuleOp::CreateFusion { template } => {
                let rule = AlertRule::Fusion(FusionAlertRuleProperties {
                    alert_rule_template_name: template,
                    enabled: true,
                });
                Outcome::Created(alert_rules::create_alert_rule(client, &rule).await?)
            }
            AlertRuleOp::CreateIncidentCreation { display_name, product } => {
                let rule = AlertRule::MicrosoftSecurityIncidentCreation(
                    SecurityIncidentCreationAlertRuleProperties {
                        display_name,
                        product_filter: product.into(),
                        enabled: true,
                        severities_filter: Vec::new(),
                    },
                );
                Outcome::Created(alert_rules::create_alert_rule(client, &rule).await?)
            }
            AlertRuleOp::CreateScheduled {
                display_name,
                query,
                severity,
                frequency,
                period,
                threshold,
            } => {
                let rule = AlertRule::Scheduled(ScheduledAlertRuleProperties {
                    display_name,
                    enabled: true,
                    query,
                    query_frequency: frequency.clone(),
                    query_period: period,
                    severity: severity.into(),
                    trigger_operator: TriggerOperator::GreaterThan,
                    trigger_threshold: threshold,
                    suppression_duration: frequency,
                    suppression_enabled: false,
                    description: None,
                });
                Outcome::Created(alert_rules::create_alert_rule(client, &rule).await?)
            }
            AlertRuleOp::Get { id } => {
                Outcome::Fetched(alert_rules::get_alert_rule(client, reference(&id)).await?)
            }
            AlertRuleOp::Delete { id } => {
                Outcome::Deleted(alert_rules::delete_alert_rule(client, reference(&id)).await?)
            }
            AlertRuleOp::List => Outcome::Fetched(alert_rules::list_alert_rules(client).await?),
        },

        ResourceCommand::Bookmarks { op } => match op {
            BookmarkOp::Create {
                display_name,
                query,
                labels,
                query_result,
            } => {
                let properties = BookmarkProperties {
                    display_name,
                    query,
                    labels,
                    query_result,
                    notes: None,
                };
                Outcome::Created(bookmarks::create_bookmark(client, &properties).await?)
            }
            BookmarkOp::Get { id } => {
                Outcome::Fetched(bookmarks::get_bookmark(client, reference(&id)).await?)
            }
            BookmarkOp::Delete { id } => {
                Outcome::Deleted(bookmarks::delete_bookmark(client, reference(&id)).await?)
            }
            BookmarkOp::List => Outcome::Fetched(bookmarks::list_bookmarks(client).await?),
        },

        ResourceCommand::DataConnectors { op } => match op {
            DataConnectorOp::Create { enabled } => {
                let state = if enabled {
                    DataConnectionState::Enabled
                } else {
                    DataConnectionState::Disabled
                };
                let connector = DataConnector::AzureSecurityCenter(AscDataConnectorProperties {
                    subscription_id: config.subscription_id.clone(),
                    data_types: AlertsDataTypes::alerts(state),
                });
                Outcome::Created(data_connectors::create_data_connector(client, &connector).await?)
            }
            DataConnectorOp::Get { id } => {
                Outcome::Fetched(data_connectors::get_data_connector(client, reference(&id)).await?)
            }
            DataConnectorOp::Delete { id } => Outcome::Deleted(
                data_connectors::delete_data_connector(client, reference(&id)).await?,
            ),
            DataConnectorOp::List => {
                Outcome::Fetched(data_connectors::list_data_connectors(client).await?)
            }
        },

        ResourceCommand::Incidents { op } => match op {
            IncidentOp::Create {
                id,
                title,
                severity,
                status,
            } => {
                let properties = IncidentProperties {
                    title,
                    severity: severity.into(),
                    status: status.into(),
                    description: None,
                };
                Outcome::Created(incidents::create_incident(client, &id, &properties).await?)
            }
            IncidentOp::Get { id } => {
                Outcome::Fetched(incidents::get_incident(client, reference(&id)).await?)
            }
            IncidentOp::Delete { id } => {
                Outcome::Deleted(incidents::delete_incident(client, reference(&id)).await?)
            }
            IncidentOp::List => Outcome::Fetched(incidents::list_incidents(client).await?),
        },

        ResourceCommand::IncidentComments { op } => match op {
            CommentOp::Create { incident, message } => {
                let properties = IncidentCommentProperties { message };
                Outcome::Created(
                    incidents::create_incident_comment(client, reference(&incident), &properties)
                        .await?,
                )
            }
            CommentOp::Get { incident, id } => Outcome::Fetched(
                incidents::get_incident_comment(client, reference(&incident), reference(&id))
                    .await?,
            ),
            CommentOp::Delete { incident, id } => Outcome::Deleted(
                incidents::delete_incident_comment(client, reference(&incident), reference(&id))
                    .await?,
            ),
            CommentOp::List { incident } => Outcome::Fetched(
                incidents::list_incident_comments(client, reference(&incident)).await?,
            ),
        },
    };
    Ok(outcome)
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Created(created) => {
            eprintln!("Created {}", created.id);
            if !created.response.is_empty() {
                println!("{}", created.response.pretty());
            }
        }
        Outcome::Deleted(ApiResponse::Empty) => println!("Deleted"),
        Outcome::Deleted(response) | Outcome::Fetched(response) => {
            println!("{}", response.pretty());
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "sentinel_mgmt=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut config = match SentinelConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(secret) = args.secret {
        config.app_secret = secret;
    }

    let client = match config.client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match run(&client, &config, args.resource).await {
        Ok(outcome) => {
            print_outcome(&outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        let mut full = vec!["sentinel-mgmt", "--config", "test.toml"];
        full.extend_from_slice(args);
        Cli::try_parse_from(full)
    }

    #[test]
    fn missing_resource_is_rejected() {
        assert!(parse(&[]).is_err());
    }

    #[test]
    fn bookmark_get_without_id_means_last_created() {
        let cli = parse(&["bookmarks", "get"]).unwrap();
        match cli.resource {
            ResourceCommand::Bookmarks {
                op: BookmarkOp::Get { id },
            } => assert_eq!(reference(&id), ResourceRef::LastCreated),
            _ => panic!("expected bookmarks get"),
        }
    }

    #[test]
    fn bookmark_create_collects_repeated_labels() {
        let cli = parse(&[
            "bookmarks",
            "create",
            "--display-name",
            "b",
            "--query",
            "SecurityEvent",
            "--label",
            "Tag1",
            "--label",
            "Tag2",
        ])
        .unwrap();
        match cli.resource {
            ResourceCommand::Bookmarks {
                op: BookmarkOp::Create { labels, .. },
            } => assert_eq!(labels, ["Tag1", "Tag2"]),
            _ => panic!("expected bookmarks create"),
        }
    }

    #[test]
    fn incident_create_requires_id_and_severity() {
        assert!(parse(&["incidents", "create", "--title", "t"]).is_err());
        let cli = parse(&[
            "incidents",
            "create",
            "--id",
            "incident-5",
            "--title",
            "t",
            "--severity",
            "high",
        ])
        .unwrap();
        match cli.resource {
            ResourceCommand::Incidents {
                op: IncidentOp::Create { id, status, .. },
            } => {
                assert_eq!(id, "incident-5");
                assert!(matches!(status, StatusArg::New));
            }
            _ => panic!("expected incidents create"),
        }
    }

    #[test]
    fn unknown_severity_is_rejected() {
        assert!(
            parse(&["incidents", "create", "--id", "i", "--title", "t", "--severity", "urgent"])
                .is_err()
        );
    }

    #[test]
    fn comment_list_accepts_explicit_incident() {
        let cli = parse(&["incident-comments", "list", "--incident", "inc-1"]).unwrap();
        match cli.resource {
            ResourceCommand::IncidentComments {
                op: CommentOp::List { incident },
            } => assert_eq!(reference(&incident), ResourceRef::Id("inc-1")),
            _ => panic!("expected incident-comments list"),
        }
    }

    #[test]
    fn secret_flag_overrides_and_verbose_is_short() {
        let cli = parse(&["--secret", "from-flag", "-v", "alert-rules", "list"]).unwrap();
        assert_eq!(cli.secret.as_deref(), Some("from-flag"));
        assert!(cli.verbose);
    }
}
