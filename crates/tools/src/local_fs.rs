//! Local filesystem accessor — read and write files with tokio.

use async_trait::async_trait;
use chatrelay_core::error::WorkspaceError;
use chatrelay_core::workspace::WorkspaceFileAccessor;
use std::path::Path;
use tracing::debug;

pub struct LocalWorkspace {
    /// Refuse reads of files larger than this. `None` = no limit.
    pub max_file_bytes: Option<u64>,
}

impl LocalWorkspace {
    /// Create an accessor with no read size limit.
    pub fn new() -> Self {
        Self {
            max_file_bytes: None,
        }
    }

    pub fn with_max_file_bytes(mut self, limit: Option<u64>) -> Self {
        self.max_file_bytes = limit;
        self
    }
}

impl Default for LocalWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WorkspaceFileAccessor for LocalWorkspace {
    async fn read(&self, path: &Path) -> Result<Vec<u8>, WorkspaceError> {
        if let Some(limit) = self.max_file_bytes {
            let meta = tokio::fs::metadata(path)
                .await
                .map_err(|e| WorkspaceError::from_io(path, &e))?;
            if meta.len() > limit {
                return Err(WorkspaceError::Other {
                    path: path.to_path_buf(),
                    reason: format!("file is {} bytes, limit is {limit}", meta.len()),
                });
            }
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| WorkspaceError::from_io(path, &e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Read workspace file");
        Ok(bytes)
    }

    async fn write(&self, path: &Path, bytes: &[u8]) -> Result<(), WorkspaceError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| WorkspaceError::from_io(parent, &e))?;
        }

        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| WorkspaceError::from_io(path, &e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "Wrote workspace file");
        Ok(())
    }
}
