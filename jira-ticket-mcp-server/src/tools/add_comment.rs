//! Add comment tool
//!
//! Appends a comment to a ticket. Comments are append-only from this
//! server's perspective.

use super::validate_issue_key;
use crate::error::{JiraToolError, JiraToolResult};
use crate::jira_adapter::{CommentInfo, JiraAdapter};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

/// Parameters for the add_comment tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct AddCommentParams {
    /// The JIRA issue key (e.g. "PROJ-123")
    pub issue_key: String,

    /// Comment body text
    pub body: String,
}

/// Result from the add_comment tool
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AddCommentResult {
    /// The comment as JIRA stored it
    pub comment: CommentInfo,

    /// Issue key that was commented on
    pub issue_key: String,

    /// Success message
    pub message: String,
}

// Workaround for pulseengine-mcp-macros issue
impl std::fmt::Display for AddCommentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string(self) {
            Ok(json) => write!(f, "{}", json),
            Err(_) => write!(f, "{{\"error\": \"Failed to serialize AddCommentResult\"}}"),
        }
    }
}

/// Tool for adding comments to tickets
#[derive(Debug)]
pub struct AddCommentTool {
    adapter: Arc<JiraAdapter>,
}

impl AddCommentTool {
    pub fn new(adapter: Arc<JiraAdapter>) -> Self {
        Self { adapter }
    }

    #[instrument(skip(self), fields(
        issue_key = params.issue_key.as_str(),
        body_length = params.body.len(),
    ))]
    pub async fn execute(&self, params: AddCommentParams) -> JiraToolResult<AddCommentResult> {
        validate_params(&params)?;

        let comment = self
            .adapter
            .add_comment(&params.issue_key, &params.body)
            .await?;

        info!("Comment added to issue {}", params.issue_key);

        Ok(AddCommentResult {
            comment,
            message: format!("Comment successfully added to ticket {}", params.issue_key),
            issue_key: params.issue_key,
        })
    }
}

fn validate_params(params: &AddCommentParams) -> JiraToolResult<()> {
    validate_issue_key(&params.issue_key)?;

    if params.body.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "body",
            "Comment body cannot be empty",
        ));
    }

    // JIRA rejects oversized comment bodies
    if params.body.len() > 32_768 {
        return Err(JiraToolError::invalid_param(
            "body",
            "Comment body cannot exceed 32,768 characters",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn params(issue_key: &str, body: &str) -> AddCommentParams {
        AddCommentParams {
            issue_key: issue_key.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_empty_body_rejected() {
        assert_matches!(
            validate_params(&params("PROJ-123", "")),
            Err(JiraToolError::InvalidParameter { .. })
        );
    }

    #[test]
    fn test_oversized_body_rejected() {
        let body = "x".repeat(32_769);
        assert_matches!(
            validate_params(&params("PROJ-123", &body)),
            Err(JiraToolError::InvalidParameter { .. })
        );
    }

    #[test]
    fn test_malformed_key_rejected() {
        assert_matches!(
            validate_params(&params("PROJ123", "A comment")),
            Err(JiraToolError::InvalidParameter { .. })
        );
    }

    #[test]
    fn test_valid_params_accepted() {
        assert!(validate_params(&params("PROJ-123", "A comment")).is_ok());
    }
}
