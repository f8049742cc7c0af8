//! Common utilities for JIRA ticket MCP server integration tests
//!
//! Holds the stdio JSON-RPC client used against a spawned server binary
//! (real-instance tests), the wiremock fixtures that simulate the JIRA REST
//! API (mocked tests), and the response-shape assertions shared by both so
//! the two suites stay in lockstep.
#![allow(dead_code)]

use jira_ticket_mcp_server::config::JiraConfig;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// MCP test client for sending JSON-RPC requests to a spawned server
pub struct McpTestClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

impl McpTestClient {
    /// Create a new test client by spawning the server binary.
    /// Requires JIRA_* environment variables (a .env file is honored).
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Tests run from the workspace root, so .env is in the current directory
        dotenv::from_filename(".env").ok();

        let jira_domain = std::env::var("JIRA_DOMAIN")?;
        let jira_email = std::env::var("JIRA_EMAIL")?;
        let jira_api_token = std::env::var("JIRA_API_TOKEN")?;
        let jira_project_key = std::env::var("JIRA_PROJECT_KEY")?;

        // Try multiple possible locations for the binary
        let binary_path = if std::path::Path::new("target/debug/jira-ticket-mcp-server").exists() {
            "target/debug/jira-ticket-mcp-server"
        } else if std::path::Path::new("target/release/jira-ticket-mcp-server").exists() {
            "target/release/jira-ticket-mcp-server"
        } else if std::path::Path::new("../target/debug/jira-ticket-mcp-server").exists() {
            "../target/debug/jira-ticket-mcp-server"
        } else if std::path::Path::new("../target/release/jira-ticket-mcp-server").exists() {
            "../target/release/jira-ticket-mcp-server"
        } else {
            let cwd = std::env::current_dir().unwrap_or_default();
            return Err(format!(
                "Server binary not found. Current dir: {:?}. Looked in target/debug and target/release",
                cwd
            )
            .into());
        };

        let mut child = Command::new(binary_path)
            .env("JIRA_DOMAIN", jira_domain)
            .env("JIRA_EMAIL", jira_email)
            .env("JIRA_API_TOKEN", jira_api_token)
            .env("JIRA_PROJECT_KEY", jira_project_key)
            .env("RUST_LOG", "error")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child.stdin.take().expect("Failed to open stdin");
        let stdout = child.stdout.take().expect("Failed to open stdout");
        let stdout = BufReader::new(stdout);

        let mut client = Self {
            child,
            stdin,
            stdout,
        };

        client.initialize()?;

        Ok(client)
    }

    /// Initialize the MCP session
    fn initialize(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 0,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": {
                    "name": "rust-test-client",
                    "version": "1.0.0"
                }
            }
        });

        self.send_request(&request)?;
        let response = self.read_response()?;

        if response.get("error").is_some() {
            return Err(format!("Initialization failed: {:?}", response["error"]).into());
        }

        Ok(())
    }

    /// Call an MCP tool
    pub fn call_tool(
        &mut self,
        tool_name: &str,
        arguments: Value,
    ) -> Result<Value, Box<dyn std::error::Error>> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::SeqCst);

        let request = json!({
            "jsonrpc": "2.0",
            "id": request_id,
            "method": "tools/call",
            "params": {
                "name": tool_name,
                "arguments": arguments
            }
        });

        self.send_request(&request)?;
        self.read_response()
    }

    fn send_request(&mut self, request: &Value) -> Result<(), Box<dyn std::error::Error>> {
        let request_str = serde_json::to_string(request)?;
        writeln!(self.stdin, "{}", request_str)?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_response(&mut self) -> Result<Value, Box<dyn std::error::Error>> {
        let mut line = String::new();
        self.stdout.read_line(&mut line)?;

        if line.is_empty() {
            return Err("Server closed connection".into());
        }

        let response: Value = serde_json::from_str(&line)?;
        Ok(response)
    }

    /// Extract the tool result from the JSON-RPC response
    pub fn extract_tool_result(response: &Value) -> Result<Value, String> {
        if let Some(error) = response.get("error") {
            return Err(format!("Tool call failed: {:?}", error));
        }

        let result = response.get("result").ok_or("No result in response")?;

        let content = result
            .get("content")
            .ok_or("No content in result")?
            .as_array()
            .ok_or("Content is not an array")?;

        let text_content = content
            .iter()
            .find(|item| item.get("type") == Some(&Value::String("text".to_string())))
            .ok_or("No text content found")?;

        let text = text_content
            .get("text")
            .ok_or("No text field in content")?
            .as_str()
            .ok_or("Text is not a string")?;

        let parsed: Value = serde_json::from_str(text).map_err(|e| {
            format!(
                "Failed to parse tool result JSON: {}. Text was: {}",
                e, text
            )
        })?;

        Ok(parsed)
    }
}

impl Drop for McpTestClient {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// True when the environment carries everything real-instance tests need
pub fn real_jira_available() -> bool {
    dotenv::from_filename(".env").ok();
    ["JIRA_DOMAIN", "JIRA_EMAIL", "JIRA_API_TOKEN", "JIRA_PROJECT_KEY"]
        .iter()
        .all(|var| std::env::var(var).is_ok())
}

// ---------------------------------------------------------------------------
// Mocked JIRA instance
// ---------------------------------------------------------------------------

/// Configuration pointing the adapter at a wiremock server
pub fn mock_config(server_uri: &str) -> JiraConfig {
    JiraConfig {
        domain: server_uri.to_string(),
        email: "test@example.com".to_string(),
        api_token: "test_token".to_string(),
        project_key: "TEST".to_string(),
        ..Default::default()
    }
}

/// Mount the session endpoint the adapter hits at startup to verify the
/// connection
pub async fn mount_session(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/rest/auth/latest/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "self": format!("{}/rest/auth/latest/session", server.uri()),
            "name": "test@example.com",
            "loginInfo": {
                "failedLoginCount": 0,
                "loginCount": 42,
                "lastFailedLoginTime": "2024-01-01T00:00:00.000+0000",
                "previousLoginTime": "2024-01-01T00:00:00.000+0000"
            }
        })))
        .mount(server)
        .await;
}

fn user_json(display_name: &str) -> Value {
    json!({
        "self": "https://test.example/rest/api/latest/user?accountId=5b10ac8d",
        "accountId": "5b10ac8d",
        "displayName": display_name,
        "emailAddress": "test@example.com",
        "active": true,
        "timeZone": "UTC",
        "avatarUrls": {
            "48x48": "https://avatar.example/48.png",
            "32x32": "https://avatar.example/32.png",
            "24x24": "https://avatar.example/24.png",
            "16x16": "https://avatar.example/16.png"
        }
    })
}

/// A realistic JIRA issue payload as GET /search returns it
pub fn issue_json(key: &str, summary: &str, status: &str, assignee: Option<&str>) -> Value {
    json!({
        "self": format!("https://test.example/rest/api/latest/issue/{}", key),
        "id": "10001",
        "key": key,
        "fields": {
            "summary": summary,
            "description": "Test description",
            "status": {
                "self": "https://test.example/rest/api/latest/status/1",
                "id": "1",
                "name": status,
                "description": "",
                "iconUrl": "https://test.example/images/icons/statuses/open.png",
                "statusCategory": {
                    "self": "https://test.example/rest/api/latest/statuscategory/2",
                    "id": 2,
                    "key": "new",
                    "colorName": "blue-gray",
                    "name": "To Do"
                }
            },
            "assignee": assignee.map(user_json),
            "reporter": user_json("Test Reporter"),
            "project": {
                "self": "https://test.example/rest/api/latest/project/10000",
                "id": "10000",
                "key": "TEST",
                "name": "Test Project",
                "projectTypeKey": "software",
                "avatarUrls": {
                    "48x48": "https://avatar.example/p48.png",
                    "32x32": "https://avatar.example/p32.png",
                    "24x24": "https://avatar.example/p24.png",
                    "16x16": "https://avatar.example/p16.png"
                }
            },
            "issuetype": {
                "self": "https://test.example/rest/api/latest/issuetype/10002",
                "id": "10002",
                "name": "Task",
                "description": "A task.",
                "iconUrl": "https://test.example/images/icons/issuetypes/task.png",
                "subtask": false
            },
            "created": "2024-01-15T10:30:00.000+0000",
            "updated": "2024-01-16T08:00:00.000+0000",
            "labels": []
        }
    })
}

/// A realistic comment payload as POST /issue/{key}/comment returns it
pub fn comment_json(id: &str, body: &str) -> Value {
    json!({
        "self": format!("https://test.example/rest/api/latest/issue/10001/comment/{}", id),
        "id": id,
        "author": user_json("Test User"),
        "updateAuthor": user_json("Test User"),
        "body": body,
        "created": "2024-02-01T12:00:00.000+0000",
        "updated": "2024-02-01T12:00:00.000+0000"
    })
}

/// The JIRA error body returned for unknown issue keys
pub fn not_found_body() -> Value {
    json!({
        "errorMessages": ["Issue does not exist or you do not have permission to see it."],
        "errors": {}
    })
}

// ---------------------------------------------------------------------------
// Response-shape assertions
//
// Mocked and real integration tests must produce the same response shape for
// the same logical operation; both suites funnel their results through these.
// ---------------------------------------------------------------------------

fn assert_fields(value: &Value, fields: &[&str], context: &str) {
    for field in fields {
        assert!(
            value.get(field).is_some(),
            "{} result is missing field '{}': {}",
            context,
            field,
            value
        );
    }
}

pub fn assert_create_ticket_shape(value: &Value) {
    assert_fields(
        value,
        &["ticket_key", "url", "project_key", "message"],
        "create_ticket",
    );
}

pub fn assert_update_ticket_shape(value: &Value) {
    assert_fields(value, &["success", "issue_key", "message"], "update_ticket");
}

pub fn assert_list_tickets_shape(value: &Value) {
    assert_fields(value, &["tickets", "count", "project_key"], "list_tickets");
    for ticket in value["tickets"].as_array().expect("tickets is an array") {
        assert_fields(
            ticket,
            &["key", "project_key", "summary", "status"],
            "list_tickets ticket",
        );
    }
}

pub fn assert_list_statuses_shape(value: &Value) {
    assert_fields(value, &["issue_key", "transitions"], "list_statuses");
    for transition in value["transitions"]
        .as_array()
        .expect("transitions is an array")
    {
        assert_fields(transition, &["id", "name"], "list_statuses transition");
    }
}

pub fn assert_update_status_shape(value: &Value) {
    assert_fields(
        value,
        &["success", "issue_key", "transition", "message"],
        "update_status",
    );
    assert_fields(&value["transition"], &["id", "name"], "update_status transition");
}

pub fn assert_add_comment_shape(value: &Value) {
    assert_fields(value, &["comment", "issue_key", "message"], "add_comment");
    assert_fields(
        &value["comment"],
        &["id", "author", "body", "created"],
        "add_comment comment",
    );
}
