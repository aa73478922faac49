//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, server lifecycle management,
//! sandbox path security, and the stdio transport.

pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use security::{SandboxPathError, resolve_sandbox_path};
pub use server::McpServer;
pub use transport::StdioTransport;
