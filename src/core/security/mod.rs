// Security module for sandbox path resolution
//
// This module provides utilities to ensure that file system operations
// are restricted to the configured sandbox root, preventing path traversal
// and unauthorized access.

pub mod sandbox;

pub use sandbox::{SandboxPathError, resolve_sandbox_path};
