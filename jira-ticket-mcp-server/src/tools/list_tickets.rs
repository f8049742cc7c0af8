//! List tickets tool
//!
//! Lists the configured project's tickets, newest first, straight from the
//! JIRA search API. Nothing is cached.

use crate::config::JiraConfig;
use crate::error::{JiraToolError, JiraToolResult};
use crate::jira_adapter::{JiraAdapter, TicketInfo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for the list_tickets tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListTicketsParams {
    /// Maximum number of tickets to fetch (default: configured max, cap: 100)
    #[serde(default)]
    pub max_results: Option<u32>,
}

/// Result from the list_tickets tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListTicketsResult {
    /// The tickets, in the order JIRA returned them
    pub tickets: Vec<TicketInfo>,

    /// Number of tickets returned
    pub count: usize,

    /// Project the listing was scoped to
    pub project_key: String,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for ListTicketsResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize ListTicketsResult\"}}"),
        }
    }
}

/// Tool for listing project tickets
#[derive(Debug)]
pub struct ListTicketsTool {
    adapter: Arc<JiraAdapter>,
    config: Arc<JiraConfig>,
}

impl ListTicketsTool {
    pub fn new(adapter: Arc<JiraAdapter>, config: Arc<JiraConfig>) -> Self {
        Self { adapter, config }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, params: ListTicketsParams) -> JiraToolResult<ListTicketsResult> {
        let max_results = params.max_results.unwrap_or(self.config.max_results);
        validate_max_results(max_results)?;

        let tickets = self.adapter.list_issues(max_results).await?;

        info!(
            "Listed {} tickets for project {}",
            tickets.len(),
            self.config.project_key
        );

        Ok(ListTicketsResult {
            count: tickets.len(),
            tickets,
            project_key: self.config.project_key.clone(),
        })
    }
}

fn validate_max_results(max_results: u32) -> JiraToolResult<()> {
    if max_results == 0 {
        return Err(JiraToolError::invalid_param(
            "max_results",
            "max_results must be greater than 0",
        ));
    }
    if max_results > 100 {
        return Err(JiraToolError::invalid_param(
            "max_results",
            "max_results cannot exceed 100",
        ));
    }
    Ok(())
}
