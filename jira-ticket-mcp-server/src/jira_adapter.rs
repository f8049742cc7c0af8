//! JIRA API adapter built on gouqi
//!
//! Owns every outbound HTTP call to the JIRA REST API. Uses gouqi's typed
//! interfaces where they exist (comments, edits, session) and its raw
//! passthrough for endpoints they don't cover (create, search, transitions).
//! One request per call; failures become typed [`JiraToolError`]s with the
//! JIRA payload preserved.

use crate::config::JiraConfig;
use crate::error::{JiraToolError, JiraToolResult};
use gouqi::issues::{AddComment, EditIssue};
use gouqi::r#async::Jira;
use gouqi::{Comment, Issue, Session};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

/// Adapter wrapping the gouqi client with ticket-shaped operations
#[derive(Debug, Clone)]
pub struct JiraAdapter {
    client: Arc<Jira>,
    config: Arc<JiraConfig>,
}

/// Pass-through view of a JIRA issue; the remote instance stays canonical
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TicketInfo {
    pub key: String,
    pub project_key: String,
    pub summary: String,
    pub description: Option<String>,
    pub status: String,
    pub assignee: Option<String>,
    pub created: String,
    pub updated: String,
}

/// A comment as JIRA stored it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CommentInfo {
    pub id: String,
    pub author: String,
    pub body: String,
    pub created: String,
}

/// An allowed status change for an issue, in the order JIRA reports it
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransitionInfo {
    /// Transition id, the value POSTed to execute the transition
    pub id: String,

    /// Human-readable transition name (e.g. "In Progress")
    pub name: String,

    /// Target status, when JIRA includes it in the response
    pub to_status: Option<String>,
}

/// Key and location of a freshly created issue
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CreatedTicket {
    pub key: String,
    pub id: String,
    pub url: String,
}

/// The authenticated session user
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct UserInfo {
    pub name: String,
}

/// Raw shape of GET /search
#[derive(Debug, Deserialize)]
struct SearchPage {
    issues: Vec<Issue>,
}

/// Raw shape of GET /issue/{key}/transitions
#[derive(Debug, Deserialize)]
struct TransitionPage {
    transitions: Vec<TransitionOption>,
}

#[derive(Debug, Deserialize)]
struct TransitionOption {
    id: String,
    name: String,
    to: Option<TransitionTarget>,
}

#[derive(Debug, Deserialize)]
struct TransitionTarget {
    name: String,
}

/// Body of POST /issue/{key}/transitions
#[derive(Debug, Serialize)]
struct TransitionTrigger {
    transition: TransitionId,
}

#[derive(Debug, Serialize)]
struct TransitionId {
    id: String,
}

impl JiraAdapter {
    /// Create the adapter and verify the connection by fetching the
    /// authenticated session user
    #[instrument(skip_all)]
    pub async fn new(config: Arc<JiraConfig>) -> JiraToolResult<Self> {
        let jira_url = config.jira_url();
        info!("Initializing JIRA adapter for {}", jira_url);

        let client =
            Jira::new(&jira_url, config.credentials()).map_err(JiraToolError::from)?;

        let adapter = Self {
            client: Arc::new(client),
            config,
        };

        let user = adapter.verify_connection().await?;
        info!("JIRA adapter authenticated as {}", user.name);

        Ok(adapter)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.config.request_timeout_seconds)
    }

    /// Verify connectivity and authentication against the JIRA instance
    #[instrument(skip_all)]
    pub async fn verify_connection(&self) -> JiraToolResult<UserInfo> {
        match self.current_user().await {
            Ok(user) => {
                debug!("Connection check successful, authenticated as {}", user.name);
                Ok(user)
            }
            Err(e) => {
                error!("Connection check failed: {}", e);
                Err(e)
            }
        }
    }

    /// Get the authenticated session user
    #[instrument(skip_all)]
    pub async fn current_user(&self) -> JiraToolResult<UserInfo> {
        let session = timeout(self.request_timeout(), async { self.client.session().await })
            .await
            .map_err(|_| JiraToolError::network("Timeout getting current user"))?
            .map_err(JiraToolError::from)?;

        Ok(convert_session(&session))
    }

    /// Create an issue in the configured project. One POST, returns the key
    /// JIRA assigned.
    #[instrument(skip(self, description))]
    pub async fn create_issue(
        &self,
        summary: &str,
        description: &str,
        issue_type: Option<&str>,
    ) -> JiraToolResult<CreatedTicket> {
        if summary.trim().is_empty() {
            return Err(JiraToolError::invalid_param(
                "summary",
                "Summary cannot be empty",
            ));
        }

        let issue_type = issue_type.unwrap_or(&self.config.default_issue_type);

        let mut fields = serde_json::json!({
            "project": { "key": self.config.project_key },
            "summary": summary,
            "issuetype": { "name": issue_type }
        });
        if !description.is_empty() {
            fields["description"] = serde_json::json!(description);
        }

        let body = serde_json::json!({ "fields": fields });

        let response: serde_json::Value =
            timeout(self.request_timeout(), async {
                self.client.post("api", "/issue", body).await
            })
            .await
            .map_err(|_| JiraToolError::network("Timeout creating issue"))?
            .map_err(JiraToolError::from)?;

        let key = response["key"]
            .as_str()
            .ok_or_else(|| JiraToolError::internal("No issue key in create response"))?
            .to_string();
        let id = response["id"]
            .as_str()
            .ok_or_else(|| JiraToolError::internal("No issue id in create response"))?
            .to_string();

        info!("Created issue {}", key);

        Ok(CreatedTicket {
            url: self.browse_url(&key),
            key,
            id,
        })
    }

    /// List the most recently created issues of the configured project
    #[instrument(skip(self))]
    pub async fn list_issues(&self, max_results: u32) -> JiraToolResult<Vec<TicketInfo>> {
        if max_results == 0 {
            return Err(JiraToolError::invalid_param(
                "max_results",
                "max_results must be greater than 0",
            ));
        }
        let max = max_results.min(100);

        let jql = project_jql(&self.config.project_key);
        let endpoint = format!("/search?jql={}&maxResults={}", encode_query(&jql), max);
        debug!("Listing issues with JQL: {}", jql);

        let page: SearchPage = timeout(self.request_timeout(), async {
            self.client.get("api", &endpoint).await
        })
        .await
        .map_err(|_| JiraToolError::network("Timeout listing issues"))?
        .map_err(JiraToolError::from)?;

        Ok(page.issues.iter().map(convert_ticket_info).collect())
    }

    /// Fetch the transitions JIRA currently allows for an issue, preserving
    /// JIRA's order
    #[instrument(skip(self))]
    pub async fn get_transitions(&self, issue_key: &str) -> JiraToolResult<Vec<TransitionInfo>> {
        ensure_issue_key(issue_key)?;

        let endpoint = format!("/issue/{}/transitions", issue_key);

        let page: TransitionPage = timeout(self.request_timeout(), async {
            self.client.get("api", &endpoint).await
        })
        .await
        .map_err(|_| {
            JiraToolError::network(format!("Timeout getting transitions for {}", issue_key))
        })?
        .map_err(|e| issue_scoped_error(e, issue_key))?;

        Ok(page
            .transitions
            .into_iter()
            .map(|t| TransitionInfo {
                id: t.id,
                name: t.name,
                to_status: t.to.map(|to| to.name),
            })
            .collect())
    }

    /// Add a comment to an issue
    #[instrument(skip(self, body))]
    pub async fn add_comment(&self, issue_key: &str, body: &str) -> JiraToolResult<CommentInfo> {
        ensure_issue_key(issue_key)?;
        if body.trim().is_empty() {
            return Err(JiraToolError::invalid_param(
                "body",
                "Comment body cannot be empty",
            ));
        }

        let add_comment = AddComment {
            body: body.to_string(),
            visibility: None,
        };

        let comment = timeout(self.request_timeout(), async {
            self.client.issues().comment(issue_key, add_comment).await
        })
        .await
        .map_err(|_| {
            JiraToolError::network(format!("Timeout adding comment to {}", issue_key))
        })?
        .map_err(|e| issue_scoped_error(e, issue_key))?;

        info!("Added comment to issue {}", issue_key);
        Ok(convert_comment(&comment))
    }

    /// Replace the summary and description of an issue
    #[instrument(skip(self, description))]
    pub async fn update_issue(
        &self,
        issue_key: &str,
        summary: &str,
        description: &str,
    ) -> JiraToolResult<()> {
        ensure_issue_key(issue_key)?;
        if summary.trim().is_empty() {
            return Err(JiraToolError::invalid_param(
                "summary",
                "Summary cannot be empty",
            ));
        }

        let mut fields = BTreeMap::new();
        fields.insert("summary".to_string(), serde_json::json!(summary));
        fields.insert("description".to_string(), serde_json::json!(description));
        let edit = EditIssue { fields };

        timeout(self.request_timeout(), async {
            self.client.issues().edit(issue_key, edit).await
        })
        .await
        .map_err(|_| JiraToolError::network(format!("Timeout updating issue {}", issue_key)))?
        .map_err(|e| issue_scoped_error(e, issue_key))?;

        info!("Updated issue {}", issue_key);
        Ok(())
    }

    /// Execute a transition on an issue
    #[instrument(skip(self))]
    pub async fn transition_issue(
        &self,
        issue_key: &str,
        transition_id: &str,
    ) -> JiraToolResult<()> {
        ensure_issue_key(issue_key)?;
        if transition_id.trim().is_empty() {
            return Err(JiraToolError::invalid_param(
                "transition_id",
                "Transition id cannot be empty",
            ));
        }

        let endpoint = format!("/issue/{}/transitions", issue_key);
        let trigger = TransitionTrigger {
            transition: TransitionId {
                id: transition_id.to_string(),
            },
        };

        timeout(self.request_timeout(), async {
            self.client
                .post::<serde_json::Value, _>("api", &endpoint, trigger)
                .await
        })
        .await
        .map_err(|_| JiraToolError::network(format!("Timeout transitioning {}", issue_key)))?
        .map(|_| ())
        .or_else(|e| {
            // The transitions endpoint returns 204 No Content on success,
            // which trips gouqi's response deserialization. Treat that as
            // success.
            let msg = e.to_string();
            if msg.contains("expected value") || msg.contains("EOF while parsing") {
                debug!("Ignoring deserialization error from empty 204 response");
                Ok(())
            } else {
                Err(issue_scoped_error(e, issue_key))
            }
        })?;

        info!("Transitioned issue {} via transition {}", issue_key, transition_id);
        Ok(())
    }

    /// Browse URL for an issue key on the configured instance
    pub fn browse_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{}", self.config.jira_url(), issue_key)
    }
}

/// Map a gouqi error for an issue-scoped request, attaching the key to 404s
fn issue_scoped_error(err: gouqi::Error, issue_key: &str) -> JiraToolError {
    match err {
        gouqi::Error::NotFound => JiraToolError::not_found("issue", issue_key),
        gouqi::Error::Fault { code, .. } if code.as_u16() == 404 => {
            JiraToolError::not_found("issue", issue_key)
        }
        other => JiraToolError::from(other),
    }
}

fn ensure_issue_key(issue_key: &str) -> JiraToolResult<()> {
    if issue_key.trim().is_empty() {
        return Err(JiraToolError::invalid_param(
            "issue_key",
            "Issue key cannot be empty",
        ));
    }
    Ok(())
}

/// JQL listing a project's issues, newest first
fn project_jql(project_key: &str) -> String {
    format!("project = \"{}\" ORDER BY created DESC", project_key)
}

/// Percent-encode a query-string value
fn encode_query(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

fn convert_ticket_info(issue: &Issue) -> TicketInfo {
    TicketInfo {
        key: issue.key.clone(),
        project_key: issue.project().map(|p| p.key.clone()).unwrap_or_default(),
        summary: issue.summary().unwrap_or_default(),
        description: issue.description(),
        status: issue.status().map(|s| s.name.clone()).unwrap_or_default(),
        assignee: issue.assignee().map(|u| u.display_name.clone()),
        created: issue.created().map(|dt| dt.to_string()).unwrap_or_default(),
        updated: issue.updated().map(|dt| dt.to_string()).unwrap_or_default(),
    }
}

fn convert_session(session: &Session) -> UserInfo {
    UserInfo {
        name: session.name.clone(),
    }
}

fn convert_comment(comment: &Comment) -> CommentInfo {
    CommentInfo {
        id: comment.id.clone().unwrap_or_else(|| "unknown".to_string()),
        author: comment
            .author
            .as_ref()
            .map(|u| u.display_name.clone())
            .unwrap_or_else(|| "Unknown".to_string()),
        body: comment.body.to_string(),
        created: comment
            .created
            .as_ref()
            .map(|dt| dt.to_string())
            .unwrap_or_default(),
    }
}
