//! Transport layer for the MCP server.
//!
//! Only the STDIO transport is provided: the server is meant to be spawned
//! by an MCP client and spoken to over stdin/stdout.

mod error;
pub mod stdio;

pub use error::{TransportError, TransportResult};
pub use stdio::StdioTransport;
