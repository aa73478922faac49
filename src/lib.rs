//! LuckyCola Open MCP Server Library
//!
//! This crate provides a Model Context Protocol (MCP) server that exposes
//! the LuckyCola open-platform APIs (image safety checking, recipe lookup,
//! image OCR) together with a sandboxed file-operation tool.
//!
//! # Architecture
//!
//! - **core**: Configuration, error handling, sandbox path security, the
//!   server handler and the stdio transport
//! - **domains**: Business logic organized by bounded contexts
//!   - **tools**: MCP tools that can be executed by clients
//!   - **upstream**: HTTP client and wire types for the remote open API
//!   - **sandbox**: Local file adapters (docx, xlsx, image compression)
//!
//! # Example
//!
//! ```rust,no_run
//! use luckycola_open_mcp::core::{Config, McpServer, StdioTransport};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config);
//!     StdioTransport::run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
