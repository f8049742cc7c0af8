//! Configuration management for the JIRA ticket MCP server
//!
//! Handles loading configuration from environment variables and an optional
//! TOML file, and validates everything the JIRA adapter needs before the
//! server starts serving tools.

use crate::error::{JiraToolError, JiraToolResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Main configuration structure for the JIRA ticket MCP server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
    /// JIRA instance domain, e.g. "yourcompany.atlassian.net" (required).
    /// A full https:// URL is also accepted.
    pub domain: String,

    /// Account email used for basic authentication (required)
    pub email: String,

    /// API token paired with the email (required)
    pub api_token: String,

    /// Project key tickets are created in and listed from (required)
    pub project_key: String,

    /// Issue type used when create_ticket does not specify one
    pub default_issue_type: String,

    /// Maximum results for list_tickets (default: 50, max: 100)
    pub max_results: u32,

    /// HTTP request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for JiraConfig {
    fn default() -> Self {
        Self {
            domain: String::new(),
            email: String::new(),
            api_token: String::new(),
            project_key: String::new(),
            default_issue_type: "Task".to_string(),
            max_results: 50,
            request_timeout_seconds: 30,
        }
    }
}

impl JiraConfig {
    /// Load configuration from the TOML file (if present), then environment
    /// variables, then validate. Environment variables win.
    pub fn load() -> JiraToolResult<Self> {
        let mut config = Self::default();

        if let Ok(file_config) = Self::load_from_file("jira-ticket-mcp.toml") {
            info!("Loaded configuration from jira-ticket-mcp.toml");
            config = file_config;
        } else {
            debug!("No TOML configuration file found, using environment variables");
        }

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    fn load_from_file<P: AsRef<Path>>(path: P) -> JiraToolResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            JiraToolError::config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Override fields from environment variables
    fn load_from_env(&mut self) {
        if let Ok(domain) = env::var("JIRA_DOMAIN") {
            self.domain = domain;
            debug!("Loaded JIRA_DOMAIN from environment");
        }

        if let Ok(email) = env::var("JIRA_EMAIL") {
            self.email = email;
            debug!("Loaded JIRA_EMAIL from environment");
        }

        if let Ok(token) = env::var("JIRA_API_TOKEN") {
            self.api_token = token;
            debug!("Loaded JIRA_API_TOKEN from environment");
        }

        if let Ok(project_key) = env::var("JIRA_PROJECT_KEY") {
            self.project_key = project_key;
            debug!("Loaded JIRA_PROJECT_KEY from environment");
        }

        if let Ok(issue_type) = env::var("JIRA_DEFAULT_ISSUE_TYPE") {
            self.default_issue_type = issue_type;
        }

        if let Ok(max_results) = env::var("JIRA_MAX_RESULTS") {
            if let Ok(max) = max_results.parse::<u32>() {
                self.max_results = max.min(100);
                debug!("Set max results to {} from environment", self.max_results);
            }
        }

        if let Ok(timeout) = env::var("JIRA_REQUEST_TIMEOUT") {
            if let Ok(timeout_seconds) = timeout.parse::<u64>() {
                self.request_timeout_seconds = timeout_seconds;
                debug!(
                    "Set request timeout to {} seconds from environment",
                    timeout_seconds
                );
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> JiraToolResult<()> {
        if self.domain.is_empty() {
            return Err(JiraToolError::config(
                "JIRA domain is required. Set the JIRA_DOMAIN environment variable.",
            ));
        }

        if self.email.is_empty() {
            return Err(JiraToolError::config(
                "JIRA account email is required. Set the JIRA_EMAIL environment variable.",
            ));
        }

        if self.api_token.is_empty() {
            return Err(JiraToolError::config(
                "JIRA API token is required. Set the JIRA_API_TOKEN environment variable.",
            ));
        }

        if self.project_key.is_empty() {
            return Err(JiraToolError::config(
                "JIRA project key is required. Set the JIRA_PROJECT_KEY environment variable.",
            ));
        }

        if self.max_results == 0 || self.max_results > 100 {
            return Err(JiraToolError::config(
                "max_results must be between 1 and 100",
            ));
        }

        info!("Configuration validation successful");
        Ok(())
    }

    /// Base URL of the JIRA instance derived from the configured domain
    pub fn jira_url(&self) -> String {
        let url = if self.domain.starts_with("http://") || self.domain.starts_with("https://") {
            self.domain.clone()
        } else {
            format!("https://{}", self.domain)
        };
        url.trim_end_matches('/').to_string()
    }

    /// Basic auth credentials (email + API token) for gouqi
    pub fn credentials(&self) -> gouqi::Credentials {
        gouqi::Credentials::Basic(self.email.clone(), self.api_token.clone())
    }
}
