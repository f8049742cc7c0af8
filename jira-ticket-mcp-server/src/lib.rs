//! JIRA Ticket MCP Server Library
//!
//! Exposes JIRA ticket operations (create, list, comment, update,
//! status-transition) as callable tools over the Model Context Protocol.
//! The server is a façade: tools validate their arguments, delegate to the
//! JIRA API adapter, and reshape responses. The remote JIRA instance is
//! always the source of truth - nothing is cached or persisted locally.

use crate::config::JiraConfig;
use crate::error::JiraToolResult;
use crate::jira_adapter::JiraAdapter;
use crate::tools::{
    AddCommentParams, AddCommentResult, AddCommentTool, CreateTicketParams, CreateTicketResult,
    CreateTicketTool, ListStatusesParams, ListStatusesResult, ListStatusesTool, ListTicketsParams,
    ListTicketsResult, ListTicketsTool, UpdateStatusParams, UpdateStatusResult, UpdateStatusTool,
    UpdateTicketParams, UpdateTicketResult, UpdateTicketTool,
};

use pulseengine_mcp_macros::{mcp_server, mcp_tools};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument};

// Re-export modules for external use
pub mod config;
pub mod error;
pub mod jira_adapter;
pub mod tools;

/// Server status information
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JiraServerStatus {
    pub server_name: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub jira_url: String,
    pub project_key: String,
    pub jira_connection_status: String,
    pub authenticated_user: Option<String>,
    pub tools_count: usize,
}

/// JIRA Ticket MCP Server
///
/// Main server implementation exposing ticket operations as MCP tools.
/// Uses the #[mcp_server] macro for automatic MCP infrastructure generation.
#[mcp_server(
    name = "JIRA Ticket MCP Server",
    version = "0.1.0",
    description = "MCP server to create, list, comment, update and transition JIRA tickets",
    auth = "disabled"
)]
#[derive(Debug, Clone)]
pub struct JiraTicketServer {
    /// Server start time for uptime calculation
    start_time: Instant,

    /// JIRA adapter owning all outbound API calls
    adapter: Arc<JiraAdapter>,

    /// Configuration
    config: Arc<JiraConfig>,

    /// Tool implementations
    create_ticket_tool: Arc<CreateTicketTool>,
    update_ticket_tool: Arc<UpdateTicketTool>,
    list_tickets_tool: Arc<ListTicketsTool>,
    list_statuses_tool: Arc<ListStatusesTool>,
    update_status_tool: Arc<UpdateStatusTool>,
    add_comment_tool: Arc<AddCommentTool>,
}

impl Default for JiraTicketServer {
    fn default() -> Self {
        // The server needs configuration and a live adapter; there is no
        // meaningful default instance.
        panic!("JiraTicketServer cannot be created with default(). Use JiraTicketServer::new() instead.")
    }
}

impl JiraTicketServer {
    /// Create a new server, loading configuration from the environment
    #[instrument]
    pub async fn new() -> JiraToolResult<Self> {
        info!("Initializing JIRA Ticket MCP Server");

        let config = JiraConfig::load()?;
        info!("Configuration loaded successfully");

        Self::with_config(config).await
    }

    /// Create a server with the given configuration (used by tests)
    #[instrument(skip(config))]
    pub async fn with_config(config: JiraConfig) -> JiraToolResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        let adapter = Arc::new(JiraAdapter::new(Arc::clone(&config)).await?);
        info!("JIRA adapter initialized");

        let create_ticket_tool = Arc::new(CreateTicketTool::new(
            Arc::clone(&adapter),
            Arc::clone(&config),
        ));
        let update_ticket_tool = Arc::new(UpdateTicketTool::new(Arc::clone(&adapter)));
        let list_tickets_tool = Arc::new(ListTicketsTool::new(
            Arc::clone(&adapter),
            Arc::clone(&config),
        ));
        let list_statuses_tool = Arc::new(ListStatusesTool::new(Arc::clone(&adapter)));
        let update_status_tool = Arc::new(UpdateStatusTool::new(Arc::clone(&adapter)));
        let add_comment_tool = Arc::new(AddCommentTool::new(Arc::clone(&adapter)));

        info!("JIRA Ticket MCP Server initialized successfully");

        Ok(Self {
            start_time: Instant::now(),
            adapter,
            config,
            create_ticket_tool,
            update_ticket_tool,
            list_tickets_tool,
            list_statuses_tool,
            update_status_tool,
            add_comment_tool,
        })
    }

    /// Get server uptime in seconds
    fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// All public methods in this impl block become MCP tools automatically
#[mcp_tools]
impl JiraTicketServer {
    /// Create a new JIRA ticket in the configured project
    ///
    /// Returns the key JIRA assigned to the ticket (e.g. "PROJ-123") along
    /// with a browse URL.
    ///
    /// # Examples
    /// - `{"summary": "Fix login button", "description": "Steps to reproduce..."}`
    /// - `{"summary": "Crash on startup", "issue_type": "Bug"}`
    #[instrument(skip(self))]
    pub async fn create_ticket(
        &self,
        params: CreateTicketParams,
    ) -> anyhow::Result<CreateTicketResult> {
        self.create_ticket_tool.execute(params).await.map_err(|e| {
            error!("create_ticket failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Update the summary and description of an existing ticket
    ///
    /// Both fields are replaced with the provided values.
    #[instrument(skip(self))]
    pub async fn update_ticket(
        &self,
        params: UpdateTicketParams,
    ) -> anyhow::Result<UpdateTicketResult> {
        self.update_ticket_tool.execute(params).await.map_err(|e| {
            error!("update_ticket failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// List tickets of the configured project, newest first
    ///
    /// # Examples
    /// - `{}` - use the configured default page size
    /// - `{"max_results": 10}`
    #[instrument(skip(self))]
    pub async fn list_tickets(
        &self,
        params: ListTicketsParams,
    ) -> anyhow::Result<ListTicketsResult> {
        self.list_tickets_tool.execute(params).await.map_err(|e| {
            error!("list_tickets failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// List the statuses a ticket can currently transition to
    ///
    /// Returns the transitions exactly as JIRA reports them, in JIRA's
    /// order. Transitions depend on the project workflow and the ticket's
    /// current status, so they are fetched fresh on every call.
    #[instrument(skip(self))]
    pub async fn list_statuses(
        &self,
        params: ListStatusesParams,
    ) -> anyhow::Result<ListStatusesResult> {
        self.list_statuses_tool.execute(params).await.map_err(|e| {
            error!("list_statuses failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Move a ticket to a new status
    ///
    /// The status name is resolved against the transitions JIRA offers for
    /// the ticket (case-insensitive). An unknown status is rejected with
    /// the list of valid choices.
    ///
    /// # Examples
    /// - `{"issue_key": "PROJ-123", "status": "In Progress"}`
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        params: UpdateStatusParams,
    ) -> anyhow::Result<UpdateStatusResult> {
        self.update_status_tool.execute(params).await.map_err(|e| {
            error!("update_status failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Add a comment to a ticket
    #[instrument(skip(self))]
    pub async fn add_comment(
        &self,
        params: AddCommentParams,
    ) -> anyhow::Result<AddCommentResult> {
        self.add_comment_tool.execute(params).await.map_err(|e| {
            error!("add_comment failed: {}", e);
            anyhow::anyhow!(e)
        })
    }

    /// Get server status and connection information
    #[instrument(skip(self))]
    pub async fn get_server_status(&self) -> anyhow::Result<JiraServerStatus> {
        info!("Getting server status");

        let (connection_status, authenticated_user) = match self.adapter.current_user().await {
            Ok(user) => ("Connected".to_string(), Some(user.name)),
            Err(e) => (format!("Connection Error: {}", e), None),
        };

        Ok(JiraServerStatus {
            server_name: "JIRA Ticket MCP Server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.get_uptime_seconds(),
            jira_url: self.config.jira_url(),
            project_key: self.config.project_key.clone(),
            jira_connection_status: connection_status,
            authenticated_user,
            tools_count: 8,
        })
    }

    /// Test JIRA connection and authentication
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> anyhow::Result<String> {
        info!("Testing JIRA connection");

        match self.adapter.verify_connection().await {
            Ok(user) => Ok(format!(
                "Connection successful!\n\
                 JIRA URL: {}\n\
                 Authenticated as: {}",
                self.config.jira_url(),
                user.name
            )),
            Err(e) => Ok(format!(
                "Connection failed!\n\
                 JIRA URL: {}\n\
                 Error: {}\n\
                 \n\
                 Please check:\n\
                 - JIRA_DOMAIN is correct and accessible\n\
                 - JIRA_EMAIL and JIRA_API_TOKEN are valid\n\
                 - Network connectivity to the JIRA instance",
                self.config.jira_url(),
                e
            )),
        }
    }
}
