//! Path validation — resolve directive paths against the workspace root.
//!
//! Directive paths come straight out of model output. With traversal
//! rejection on, a path must stay below the root: no absolute paths, no `..`
//! components, and no symlinked directory that leads back out.

use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// How strictly directive paths are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathPolicy {
    /// Reject absolute paths, `..` components and symlink escapes.
    pub reject_traversal: bool,
}

impl PathPolicy {
    /// Join paths the way plain string concatenation would, with no checks.
    pub fn permissive() -> Self {
        Self {
            reject_traversal: false,
        }
    }
}

impl Default for PathPolicy {
    fn default() -> Self {
        Self {
            reject_traversal: true,
        }
    }
}

/// Error returned when path validation fails.
#[derive(Debug, thiserror::Error)]
pub enum PathValidationError {
    #[error("Path '{path}' is empty")]
    Empty { path: String },

    #[error("Path '{path}' is absolute; directive paths must be relative to the workspace")]
    Absolute { path: String },

    #[error("Path traversal detected in '{path}'")]
    PathTraversal { path: String },

    #[error("Path '{path}' resolves outside the workspace")]
    OutsideWorkspace { path: String },

    #[error("Failed to canonicalize path '{path}': {reason}")]
    CanonicalizeFailed { path: String, reason: String },
}

/// Resolve a workspace-relative directive path to the path to hand to the
/// file accessor.
///
/// With a permissive policy this is `root` + `relative` and nothing else.
pub fn resolve_in_workspace(
    root: &Path,
    relative: &str,
    policy: PathPolicy,
) -> Result<PathBuf, PathValidationError> {
    if relative.trim().is_empty() {
        return Err(PathValidationError::Empty {
            path: relative.into(),
        });
    }

    if !policy.reject_traversal {
        return Ok(root.join(relative.trim_start_matches(['/', '\\'])));
    }

    // Treat backslashes as separators so `..\secret` is caught everywhere.
    let normalized = relative.replace('\\', "/");
    let candidate = Path::new(&normalized);

    if normalized.starts_with('/') || candidate.is_absolute() || has_drive_prefix(&normalized) {
        warn!(path = %relative, "Rejected absolute directive path");
        return Err(PathValidationError::Absolute {
            path: relative.into(),
        });
    }

    if candidate
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        warn!(path = %relative, "Rejected directive path with traversal");
        return Err(PathValidationError::PathTraversal {
            path: relative.into(),
        });
    }

    let joined = root.join(candidate);
    ensure_no_symlink_escape(root, &joined, relative)?;
    Ok(joined)
}

/// `C:` style prefixes are absolute on Windows. On Unix `a:notes.txt` is an
/// ordinary relative name.
#[cfg(windows)]
fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(not(windows))]
fn has_drive_prefix(_path: &str) -> bool {
    false
}

/// Canonicalize the deepest existing ancestor of `joined` and make sure it is
/// still under the canonical root.
///
/// Existence is checked without following links, so a dangling symlink is
/// found too. Its target cannot be canonicalized, and it is rejected.
fn ensure_no_symlink_escape(
    root: &Path,
    joined: &Path,
    original: &str,
) -> Result<(), PathValidationError> {
    // Nothing on disk yet means nothing to escape through.
    let Ok(canonical_root) = root.canonicalize() else {
        return Ok(());
    };

    let Some((existing, meta)) = joined
        .ancestors()
        .find_map(|p| std::fs::symlink_metadata(p).ok().map(|m| (p, m)))
    else {
        return Ok(());
    };

    let canonical = match existing.canonicalize() {
        Ok(canonical) => canonical,
        Err(_) if meta.file_type().is_symlink() => {
            warn!(path = %original, link = %existing.display(), "Directive path goes through a dangling symlink");
            return Err(PathValidationError::OutsideWorkspace {
                path: original.into(),
            });
        }
        Err(e) => {
            return Err(PathValidationError::CanonicalizeFailed {
                path: original.into(),
                reason: e.to_string(),
            });
        }
    };

    if !canonical.starts_with(&canonical_root) {
        warn!(path = %original, resolved = %canonical.display(), "Directive path escapes workspace");
        return Err(PathValidationError::OutsideWorkspace {
            path: original.into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_workspace(dir.path(), "notes.txt", PathPolicy::default()).unwrap();
        assert_eq!(resolved, dir.path().join("notes.txt"));
    }

    #[test]
    fn nested_path_that_does_not_exist_yet_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let resolved =
            resolve_in_workspace(dir.path(), "new/dir/out.txt", PathPolicy::default()).unwrap();
        assert!(resolved.starts_with(dir.path()));
        assert!(resolved.ends_with("new/dir/out.txt"));
    }

    #[test]
    fn current_dir_components_are_allowed() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_in_workspace(dir.path(), "./src/lib.rs", PathPolicy::default()).is_ok());
    }

    #[test]
    fn path_traversal_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_in_workspace(dir.path(), "../../../etc/passwd", PathPolicy::default())
            .unwrap_err();
        match err {
            PathValidationError::PathTraversal { .. } => {}
            other => panic!("Expected PathTraversal, got: {other}"),
        }
    }

    #[test]
    fn path_traversal_mid_path_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_in_workspace(dir.path(), "src/../../secret", PathPolicy::default());
        assert!(matches!(
            result,
            Err(PathValidationError::PathTraversal { .. })
        ));
    }

    #[test]
    fn backslash_traversal_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_in_workspace(dir.path(), "..\\secret.txt", PathPolicy::default());
        assert!(matches!(
            result,
            Err(PathValidationError::PathTraversal { .. })
        ));
    }

    #[test]
    fn absolute_paths_blocked() {
        let dir = tempfile::tempdir().unwrap();
        for path in ["/etc/passwd", "\\etc\\passwd"] {
            let result = resolve_in_workspace(dir.path(), path, PathPolicy::default());
            assert!(
                matches!(result, Err(PathValidationError::Absolute { .. })),
                "{path} should be rejected as absolute"
            );
        }
    }

    #[cfg(windows)]
    #[test]
    fn drive_prefix_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let result = resolve_in_workspace(dir.path(), "C:/Windows/win.ini", PathPolicy::default());
        assert!(matches!(result, Err(PathValidationError::Absolute { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn colon_in_relative_name_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_in_workspace(dir.path(), "a:notes.txt", PathPolicy::default()).unwrap();
        assert_eq!(resolved, dir.path().join("a:notes.txt"));
    }

    #[test]
    fn empty_path_rejected_under_any_policy() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_in_workspace(dir.path(), "  ", PathPolicy::default()).is_err());
        assert!(resolve_in_workspace(dir.path(), "", PathPolicy::permissive()).is_err());
    }

    #[test]
    fn permissive_policy_concatenates() {
        let root = Path::new("/workspace");
        let resolved =
            resolve_in_workspace(root, "/etc/../passwd", PathPolicy::permissive()).unwrap();
        assert_eq!(resolved, PathBuf::from("/workspace/etc/../passwd"));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_escape_blocked() {
        let outside = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

        let result = resolve_in_workspace(dir.path(), "link/stolen.txt", PathPolicy::default());
        assert!(matches!(
            result,
            Err(PathValidationError::OutsideWorkspace { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_escape_blocked() {
        let outside = tempfile::tempdir().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let planted = outside.path().join("planted.txt");
        std::os::unix::fs::symlink(&planted, dir.path().join("evil.txt")).unwrap();

        let result = resolve_in_workspace(dir.path(), "evil.txt", PathPolicy::default());
        assert!(matches!(
            result,
            Err(PathValidationError::OutsideWorkspace { .. })
        ));
        assert!(!planted.exists());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_inside_workspace_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("real.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real.txt"), dir.path().join("alias.txt"))
            .unwrap();

        assert!(resolve_in_workspace(dir.path(), "alias.txt", PathPolicy::default()).is_ok());
    }
}
