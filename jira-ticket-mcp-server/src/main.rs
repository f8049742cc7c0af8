//! JIRA Ticket MCP Server - ticket operations as MCP tools
//!
//! Speaks MCP over stdio; all JIRA access is configured through
//! environment variables (JIRA_DOMAIN, JIRA_EMAIL, JIRA_API_TOKEN,
//! JIRA_PROJECT_KEY).

use jira_ticket_mcp_server::JiraTicketServer;
use pulseengine_mcp_server::McpServerBuilder;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure logging for STDIO transport (logs go to stderr)
    JiraTicketServer::configure_stdio_logging();

    info!("Starting JIRA Ticket MCP Server...");

    let jira_server = match JiraTicketServer::new().await {
        Ok(server) => {
            info!("JIRA Ticket MCP Server created successfully");
            server
        }
        Err(e) => {
            error!("Failed to create JIRA Ticket MCP Server: {}", e);
            eprintln!("❌ Failed to start JIRA Ticket MCP Server: {}", e);
            eprintln!("\nPlease check:");
            eprintln!("  - JIRA_DOMAIN environment variable is set");
            eprintln!("  - JIRA_EMAIL and JIRA_API_TOKEN are set and valid");
            eprintln!("  - JIRA_PROJECT_KEY names an existing project");
            eprintln!("  - The JIRA instance is accessible");
            std::process::exit(1);
        }
    };

    info!("Starting MCP server with STDIO transport...");

    let mut server = jira_server.serve_stdio().await?;

    info!("🚀 JIRA Ticket MCP Server is running and ready to serve requests");

    server.run().await?;

    Ok(())
}
