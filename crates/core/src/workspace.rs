//! Workspace file access — the narrow capability the agent gets over files.
//!
//! The host supplies the accessor. The agent loop only ever hands it absolute
//! paths that it has already resolved against the workspace root.

use crate::error::WorkspaceError;
use async_trait::async_trait;
use std::path::Path;

/// Byte-level file access supplied by the host.
#[async_trait]
pub trait WorkspaceFileAccessor: Send + Sync {
    /// Read the whole file at `path`.
    async fn read(&self, path: &Path) -> std::result::Result<Vec<u8>, WorkspaceError>;

    /// Create or overwrite the file at `path`. Not atomic.
    async fn write(&self, path: &Path, bytes: &[u8]) -> std::result::Result<(), WorkspaceError>;

    /// Read the file and decode it as UTF-8.
    async fn read_text(&self, path: &Path) -> std::result::Result<String, WorkspaceError> {
        let bytes = self.read(path).await?;
        String::from_utf8(bytes).map_err(|_| WorkspaceError::InvalidUtf8 {
            path: path.to_path_buf(),
        })
    }

    /// Encode `text` as UTF-8 and write it.
    async fn write_text(&self, path: &Path, text: &str) -> std::result::Result<(), WorkspaceError> {
        self.write(path, text.as_bytes()).await
    }
}
