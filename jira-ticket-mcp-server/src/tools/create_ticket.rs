//! Create ticket tool
//!
//! Creates an issue in the configured project and returns the key JIRA
//! assigned to it.

use crate::config::JiraConfig;
use crate::error::{JiraToolError, JiraToolResult};
use crate::jira_adapter::JiraAdapter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for the create_ticket tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateTicketParams {
    /// Ticket summary/title (required)
    pub summary: String,

    /// Ticket description in plain text
    #[serde(default)]
    pub description: String,

    /// Issue type (defaults to the configured default, normally "Task")
    #[serde(default)]
    pub issue_type: Option<String>,
}

/// Result from the create_ticket tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreateTicketResult {
    /// The created ticket key (e.g. "PROJ-456")
    pub ticket_key: String,

    /// Direct URL to the ticket
    pub url: String,

    /// Project the ticket was created in
    pub project_key: String,

    /// Success message
    pub message: String,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for CreateTicketResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize CreateTicketResult\"}}"),
        }
    }
}

/// Tool for creating tickets
#[derive(Debug)]
pub struct CreateTicketTool {
    adapter: Arc<JiraAdapter>,
    config: Arc<JiraConfig>,
}

impl CreateTicketTool {
    pub fn new(adapter: Arc<JiraAdapter>, config: Arc<JiraConfig>) -> Self {
        Self { adapter, config }
    }

    #[instrument(skip(self), fields(summary = params.summary.as_str()))]
    pub async fn execute(&self, params: CreateTicketParams) -> JiraToolResult<CreateTicketResult> {
        validate_params(&params)?;

        info!("Creating ticket: {}", params.summary);

        let created = self
            .adapter
            .create_issue(
                &params.summary,
                &params.description,
                params.issue_type.as_deref(),
            )
            .await?;

        Ok(CreateTicketResult {
            message: format!(
                "Ticket {} successfully created in project {}",
                created.key, self.config.project_key
            ),
            ticket_key: created.key,
            url: created.url,
            project_key: self.config.project_key.clone(),
        })
    }
}

fn validate_params(params: &CreateTicketParams) -> JiraToolResult<()> {
    if params.summary.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "summary",
            "Summary cannot be empty",
        ));
    }

    if params.summary.len() > 255 {
        return Err(JiraToolError::invalid_param(
            "summary",
            "Summary cannot exceed 255 characters",
        ));
    }

    if let Some(issue_type) = &params.issue_type {
        if issue_type.trim().is_empty() {
            return Err(JiraToolError::invalid_param(
                "issue_type",
                "Issue type cannot be empty if provided",
            ));
        }
    }

    Ok(())
}
