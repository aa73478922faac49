//! Sandbox domain: local adapters used by the fileOperation tool.
//!
//! Each adapter consumes paths/bytes inside the sandbox root and either
//! returns text or writes a file; failures are reported as messages, never
//! panics. The adapters know nothing about MCP or the result envelope.

pub mod docx;
pub mod imaging;
pub mod spreadsheet;

use thiserror::Error;

/// Error type shared by the sandbox adapters.
///
/// Io errors are kept intact so the tool layer can special-case
/// permission-class failures; everything else is a message.
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl SandboxError {
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
