//! Domains module containing business logic organized by bounded contexts.
//!
//! Each subdomain represents a specific area of functionality within the MCP
//! server:
//!
//! - `tools` - the MCP tools exposed to clients
//! - `upstream` - the HTTP client and wire types for the remote open API
//! - `sandbox` - local file adapters (docx, xlsx, image compression)

pub mod sandbox;
pub mod tools;
pub mod upstream;
