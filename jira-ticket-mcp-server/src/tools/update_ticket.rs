//! Update ticket tool
//!
//! Replaces the summary and description of an existing ticket. JIRA keeps
//! the canonical copy; this tool never reads back what it wrote.

use super::validate_issue_key;
use crate::error::{JiraToolError, JiraToolResult};
use crate::jira_adapter::JiraAdapter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for the update_ticket tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateTicketParams {
    /// The JIRA issue key (e.g. "PROJ-123")
    pub issue_key: String,

    /// New summary/title
    pub summary: String,

    /// New description, replacing the current one
    #[serde(default)]
    pub description: String,
}

/// Result from the update_ticket tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateTicketResult {
    /// Whether the update was applied
    pub success: bool,

    /// The issue key that was updated
    pub issue_key: String,

    /// Success message
    pub message: String,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for UpdateTicketResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize UpdateTicketResult\"}}"),
        }
    }
}

/// Tool for updating ticket fields
#[derive(Debug)]
pub struct UpdateTicketTool {
    adapter: Arc<JiraAdapter>,
}

impl UpdateTicketTool {
    pub fn new(adapter: Arc<JiraAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self), fields(issue_key = params.issue_key.as_str()))]
    pub async fn execute(&self, params: UpdateTicketParams) -> JiraToolResult<UpdateTicketResult> {
        validate_params(&params)?;

        info!("Updating ticket {}", params.issue_key);

        self.adapter
            .update_issue(&params.issue_key, &params.summary, &params.description)
            .await?;

        Ok(UpdateTicketResult {
            success: true,
            message: format!("Ticket {} successfully updated", params.issue_key),
            issue_key: params.issue_key,
        })
    }
}

fn validate_params(params: &UpdateTicketParams) -> JiraToolResult<()> {
    validate_issue_key(&params.issue_key)?;

    if params.summary.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "summary",
            "Summary cannot be empty",
        ));
    }

    Ok(())
}
