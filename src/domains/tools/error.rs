//! Tool failure taxonomy.
//!
//! Every caller-visible failure is one of these variants. The variants stay
//! structured inside the crate so tests can match on them; the `Display`
//! implementation is the exact text rendered into the one-text-block result
//! envelope at the tool boundary.

use rmcp::model::{CallToolResult, Content};
use thiserror::Error;

/// A failure a tool reports to the caller as human-readable text.
#[derive(Debug, Error)]
pub enum ToolFailure {
    /// API credentials are not configured.
    #[error(
        "Error: LUCKYCOLA_OPEN_KEY and LUCKYCOLA_OPEN_UID are not set, the API cannot be called."
    )]
    MissingCredentials,

    /// The sandbox root directory is not configured.
    #[error("Error: MCP_FILE_PATH is not set, file operations are unavailable.")]
    MissingSandboxRoot,

    /// The upstream could not be reached or answered with garbage.
    #[error("{0} failed, check the network connection and API credentials.")]
    Unreachable(&'static str),

    /// The upstream reported one of the reserved quota-exhaustion codes.
    /// The upstream's own message is deliberately not included.
    #[error("{0} failed: API quota exhausted. Top up in the account center to get more quota.")]
    QuotaExhausted(&'static str),

    /// The upstream reported any other nonzero code; code and message are
    /// passed through verbatim.
    #[error("{service} failed, error code: {code}, message: {msg}")]
    Upstream {
        service: &'static str,
        code: i64,
        msg: String,
    },

    /// A local precondition was not met (missing file, missing argument,
    /// unsupported format, empty result set).
    #[error("{0}")]
    Precondition(String),

    /// An underlying library or filesystem call failed; the message is
    /// passed through verbatim.
    #[error("{0}")]
    Library(String),

    /// The OS denied access; rendered as a remediation guide naming the
    /// sandbox root instead of the raw error.
    #[error(
        "Permission denied while accessing '{root}'.\n\
         Possible fixes:\n\
         1. Grant your user read/write access to the directory (chmod/chown)\n\
         2. Run the server as a user that owns the directory\n\
         3. Point MCP_FILE_PATH at a directory you can write to"
    )]
    PermissionDenied { root: String },
}

impl ToolFailure {
    /// Precondition failure from anything displayable.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Library failure from anything displayable.
    pub fn library(msg: impl Into<String>) -> Self {
        Self::Library(msg.into())
    }

    /// Render this failure into the uniform text envelope.
    pub fn into_result(self) -> CallToolResult {
        CallToolResult::error(vec![Content::text(self.to_string())])
    }
}

/// Wrap success text in the uniform one-text-block envelope.
pub fn success_result(text: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(text)])
}

/// Map an io error to the taxonomy: permission-class errors become the
/// remediation text, everything else passes through as a library failure.
pub fn map_io_error(err: std::io::Error, root: &std::path::Path, context: &str) -> ToolFailure {
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        ToolFailure::PermissionDenied {
            root: root.display().to_string(),
        }
    } else {
        ToolFailure::Library(format!("{}: {}", context, err))
    }
}
