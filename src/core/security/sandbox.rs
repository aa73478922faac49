use std::path::{Component, Path, PathBuf};

/// Errors that can occur during sandbox path resolution.
#[derive(Debug, thiserror::Error)]
pub enum SandboxPathError {
    #[error("Path '{name}' resolves outside the sandbox root directory")]
    OutsideRoot { name: String },
}

/// Resolves a user-supplied relative filename against the sandbox root.
///
/// The containment check is lexical: absolute paths and any `..` component
/// are rejected before the name is joined to the root. Canonicalization is
/// deliberately not used here because write and compress targets may not
/// exist yet.
///
/// # Arguments
///
/// * `root` - The configured sandbox root directory
/// * `name` - A filename relative to the root (subdirectories allowed)
///
/// # Returns
///
/// * `Ok(PathBuf)` - The resolved path inside the root
/// * `Err(SandboxPathError)` - If the name would escape the root
pub fn resolve_sandbox_path(root: &Path, name: &str) -> Result<PathBuf, SandboxPathError> {
    let relative = Path::new(name);

    if relative.is_absolute() {
        return Err(SandboxPathError::OutsideRoot {
            name: name.to_string(),
        });
    }

    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(SandboxPathError::OutsideRoot {
                    name: name.to_string(),
                });
            }
        }
    }

    Ok(root.join(relative))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_filename_resolves_under_root() {
        let root = Path::new("/srv/files");
        let resolved = resolve_sandbox_path(root, "notes.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/files/notes.txt"));
    }

    #[test]
    fn test_subdirectory_allowed() {
        let root = Path::new("/srv/files");
        let resolved = resolve_sandbox_path(root, "reports/q1.xlsx").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/files/reports/q1.xlsx"));
    }

    #[test]
    fn test_current_dir_component_allowed() {
        let root = Path::new("/srv/files");
        let resolved = resolve_sandbox_path(root, "./notes.txt").unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/files/notes.txt"));
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let root = Path::new("/srv/files");
        assert!(matches!(
            resolve_sandbox_path(root, "../etc/passwd"),
            Err(SandboxPathError::OutsideRoot { .. })
        ));
        assert!(matches!(
            resolve_sandbox_path(root, "reports/../../escape.txt"),
            Err(SandboxPathError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn test_absolute_path_rejected() {
        let root = Path::new("/srv/files");
        assert!(matches!(
            resolve_sandbox_path(root, "/etc/passwd"),
            Err(SandboxPathError::OutsideRoot { .. })
        ));
    }

    #[test]
    fn test_nonexistent_target_still_resolves() {
        // Write targets do not exist yet; resolution must not require them to.
        let root = Path::new("/srv/files");
        assert!(resolve_sandbox_path(root, "brand_new.txt").is_ok());
    }
}
