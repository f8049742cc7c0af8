//! Status transition tools
//!
//! JIRA does not allow direct status updates - a status change is executed
//! as a transition between workflow states. `list_statuses` reports the
//! transitions JIRA currently allows for a ticket; `update_status` resolves
//! a status name against that list and triggers the matching transition.

use super::validate_issue_key;
use crate::error::{JiraToolError, JiraToolResult};
use crate::jira_adapter::{JiraAdapter, TransitionInfo};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for the list_statuses tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ListStatusesParams {
    /// The JIRA issue key (e.g. "PROJ-123")
    pub issue_key: String,
}

/// Result from the list_statuses tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ListStatusesResult {
    /// The issue key that was queried
    pub issue_key: String,

    /// Available transitions, in the order JIRA reported them
    pub transitions: Vec<TransitionInfo>,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for ListStatusesResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize ListStatusesResult\"}}"),
        }
    }
}

/// Parameters for the update_status tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusParams {
    /// The JIRA issue key (e.g. "PROJ-123")
    pub issue_key: String,

    /// Target status name, matched case-insensitively against the
    /// transitions JIRA offers for this issue
    pub status: String,
}

/// Result from the update_status tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UpdateStatusResult {
    /// Whether the transition was executed
    pub success: bool,

    /// The issue key that was transitioned
    pub issue_key: String,

    /// The transition that was executed
    pub transition: TransitionInfo,

    /// Success message
    pub message: String,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for UpdateStatusResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize UpdateStatusResult\"}}"),
        }
    }
}

/// Tool for listing available status transitions
#[derive(Debug)]
pub struct ListStatusesTool {
    adapter: Arc<JiraAdapter>,
}

impl ListStatusesTool {
    pub fn new(adapter: Arc<JiraAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self), fields(issue_key = params.issue_key.as_str()))]
    pub async fn execute(&self, params: ListStatusesParams) -> JiraToolResult<ListStatusesResult> {
        validate_issue_key(&params.issue_key)?;

        let transitions = self.adapter.get_transitions(&params.issue_key).await?;

        info!(
            "Found {} available transitions for issue {}",
            transitions.len(),
            params.issue_key
        );

        Ok(ListStatusesResult {
            issue_key: params.issue_key,
            transitions,
        })
    }
}

/// Tool for moving a ticket to a new status
#[derive(Debug)]
pub struct UpdateStatusTool {
    adapter: Arc<JiraAdapter>,
}

impl UpdateStatusTool {
    pub fn new(adapter: Arc<JiraAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self), fields(issue_key = params.issue_key.as_str(), status = params.status.as_str()))]
    pub async fn execute(&self, params: UpdateStatusParams) -> JiraToolResult<UpdateStatusResult> {
        validate_params(&params)?;

        // Resolve the requested status against what JIRA allows right now
        let transitions = self.adapter.get_transitions(&params.issue_key).await?;
        let transition = resolve_transition(&transitions, &params.status)?;

        info!(
            "Using transition {} (id: {}) for issue {}",
            transition.name, transition.id, params.issue_key
        );

        self.adapter
            .transition_issue(&params.issue_key, &transition.id)
            .await?;

        Ok(UpdateStatusResult {
            success: true,
            message: format!(
                "Ticket {} status successfully updated to {}",
                params.issue_key, transition.name
            ),
            issue_key: params.issue_key,
            transition,
        })
    }
}

fn validate_params(params: &UpdateStatusParams) -> JiraToolResult<()> {
    validate_issue_key(&params.issue_key)?;

    if params.status.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "status",
            "Status cannot be empty",
        ));
    }

    Ok(())
}

/// Pick the transition whose name matches the requested status. Unknown
/// statuses are rejected with the valid choices and no transition request
/// is made.
fn resolve_transition(
    transitions: &[TransitionInfo],
    status: &str,
) -> JiraToolResult<TransitionInfo> {
    let wanted = status.to_lowercase();
    transitions
        .iter()
        .find(|t| t.name.to_lowercase() == wanted)
        .cloned()
        .ok_or_else(|| {
            JiraToolError::invalid_param(
                "status",
                format!(
                    "Status '{}' is not available for this issue. Available: {}",
                    status,
                    transitions
                        .iter()
                        .map(|t| t.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
            )
        })
}
