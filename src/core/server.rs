//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol. Tool routing is delegated to the router built in
//! `domains/tools/router.rs`; adding a tool does not require changes here.

use rmcp::{
    ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler,
};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::build_tool_router;
use crate::domains::upstream::UpstreamClient;

/// The main MCP server handler.
///
/// Implements the `ServerHandler` trait from rmcp and owns the shared
/// configuration and upstream HTTP client handed to every tool route.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared client for the LuckyCola upstream endpoints.
    upstream: Arc<UpstreamClient>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        let upstream = Arc::new(UpstreamClient::new());

        Self {
            tool_router: build_tool_router::<Self>(config.clone(), upstream.clone()),
            config,
            upstream,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration (for tool access).
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Get the shared upstream client.
    pub fn upstream(&self) -> &Arc<UpstreamClient> {
        &self.upstream
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "LuckyCola open-platform MCP server. Provides image safety checking, \
                 recipe lookup, and sandboxed file operations (including OCR, \
                 spreadsheet conversion, and image compression)."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_reports_configured_name() {
        let mut config = Config::default();
        config.server.name = "test-server".to_string();
        let server = McpServer::new(config);
        assert_eq!(server.name(), "test-server");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_server_exposes_three_tools() {
        let server = McpServer::new(Config::default());
        let tools = server.tool_router.list_all();
        assert_eq!(tools.len(), 3);
    }
}
