//! Configuration management for the MCP server.
//!
//! All configuration is loaded once at startup and passed explicitly into
//! the server and tool handlers; nothing reads environment variables after
//! `Config::from_env` returns.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// LuckyCola open-platform API credentials.
    pub credentials: CredentialsConfig,

    /// File sandbox configuration.
    pub sandbox: SandboxConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// API credentials shared by all upstream calls.
///
/// Both values must be present for the upstream-dependent tools to work;
/// when either is missing those tools return a configuration-error text
/// instead of calling out.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// LuckyCola open-platform application key (`LUCKYCOLA_OPEN_KEY`).
    pub app_key: Option<String>,

    /// LuckyCola open-platform user id (`LUCKYCOLA_OPEN_UID`).
    pub uid: Option<String>,
}

impl CredentialsConfig {
    /// Both credentials, or `None` if either is missing.
    pub fn pair(&self) -> Option<(&str, &str)> {
        match (self.app_key.as_deref(), self.uid.as_deref()) {
            (Some(key), Some(uid)) => Some((key, uid)),
            _ => None,
        }
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("app_key", &self.app_key.as_ref().map(|_| "[REDACTED]"))
            .field("uid", &self.uid.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Configuration for the file sandbox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Root directory that bounds all file operations (`MCP_FILE_PATH`).
    /// If None, the fileOperation tool degrades to a configuration-error
    /// text response.
    pub root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "luckycola_open_mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            credentials: CredentialsConfig::default(),
            sandbox: SandboxConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Reads `LUCKYCOLA_OPEN_KEY`, `LUCKYCOLA_OPEN_UID` and `MCP_FILE_PATH`,
    /// plus the optional `MCP_SERVER_NAME` and `MCP_LOG_LEVEL` overrides.
    /// Missing credentials or sandbox root are warnings, not startup errors:
    /// the affected tools answer with a configuration-error text instead.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(key) = std::env::var("LUCKYCOLA_OPEN_KEY") {
            config.credentials.app_key = Some(key);
        }

        if let Ok(uid) = std::env::var("LUCKYCOLA_OPEN_UID") {
            config.credentials.uid = Some(uid);
        }

        if config.credentials.pair().is_some() {
            info!("LuckyCola API credentials loaded from environment");
        } else {
            warn!(
                "LUCKYCOLA_OPEN_KEY / LUCKYCOLA_OPEN_UID not set - the server \
                 will start but API-backed tools will report a configuration error"
            );
        }

        if let Ok(root) = std::env::var("MCP_FILE_PATH") {
            config.sandbox.root = Some(PathBuf::from(root));
            info!("File sandbox root set to {:?}", config.sandbox.root);
        } else {
            warn!(
                "MCP_FILE_PATH not set - the server will start but file \
                 operations will report a configuration error"
            );
        }

        config
    }
}
