//! Tools module for the JIRA ticket MCP server
//!
//! One module per exposed ticket operation. Every tool validates its
//! parameters before touching the network, then delegates to the adapter.

use crate::error::{JiraToolError, JiraToolResult};

pub mod add_comment;
pub mod create_ticket;
pub mod list_tickets;
pub mod transitions;
pub mod update_ticket;

pub use add_comment::*;
pub use create_ticket::*;
pub use list_tickets::*;
pub use transitions::*;
pub use update_ticket::*;

/// Reject issue keys that are not in the PROJECT-123 shape before any
/// network call is made
pub(crate) fn validate_issue_key(issue_key: &str) -> JiraToolResult<()> {
    if issue_key.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "issue_key",
            "Issue key cannot be empty",
        ));
    }

    let parts: Vec<&str> = issue_key.split('-').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(JiraToolError::invalid_param(
            "issue_key",
            "Issue key must be in format 'PROJECT-123'",
        ));
    }

    Ok(())
}
