//! Workspace lifecycle management
//!
//! Manages the allocation, use, and removal of per-job directories.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tempfile::TempDir;
use tracing::{debug, instrument, warn};

use crate::workspace::{WorkspaceError, validate_relative_path};

const DIR_PREFIX: &str = "texbox-";

/// An isolated directory owned by exactly one compilation job
///
/// # Cleanup
///
/// Call [`cleanup()`](Self::cleanup) once the artifact has been read so that
/// removal errors surface. Dropping the workspace without it still removes
/// the directory, but failures are only logged.
///
/// ```rust,ignore
/// let workspace = Workspace::create(None, false)?;
/// workspace.write_file("main.tex", source).await?;
/// // ... compile, read main.pdf ...
/// workspace.cleanup()?;
/// ```
#[derive(Debug)]
pub struct Workspace {
    /// Backing directory, taken on cleanup
    dir: Option<TempDir>,

    /// Path to the directory
    path: PathBuf,

    /// Leave the directory on disk when released
    keep: bool,
}

impl Workspace {
    /// Allocate a fresh, uniquely named directory
    ///
    /// The directory is created under `root`, or the system temp dir if `root`
    /// is `None`.
    #[instrument]
    pub fn create(root: Option<&Path>, keep: bool) -> Result<Self, WorkspaceError> {
        let root = root
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);

        let dir = tempfile::Builder::new()
            .prefix(DIR_PREFIX)
            .tempdir_in(&root)
            .map_err(|source| WorkspaceError::Create {
                root: root.clone(),
                source,
            })?;
        let path = dir.path().to_path_buf();

        debug!(?path, "workspace created");

        Ok(Self {
            dir: Some(dir),
            path,
            keep,
        })
    }

    /// Get the path to the workspace directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the host path to a file inside the workspace
    ///
    /// Returns an error if the path would resolve outside the workspace.
    pub fn file_path(&self, name: &str) -> Result<PathBuf, WorkspaceError> {
        Ok(self.path.join(validate_relative_path(name)?))
    }

    /// Write a file into the workspace, creating parent directories
    ///
    /// An existing file at the same path is overwritten.
    #[instrument(skip(self, content))]
    pub async fn write_file(&self, name: &str, content: &[u8]) -> Result<(), WorkspaceError> {
        let path = self.file_path(name)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&path, content).await?;
        debug!(?path, len = content.len(), "wrote file to workspace");
        Ok(())
    }

    /// Decode base64 file contents and write each into the workspace
    ///
    /// Whitespace inside the encoded text (line wrapping) is ignored. Every
    /// entry is decoded and its path checked before anything is written, so a
    /// bad entry leaves the workspace untouched.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn add_encoded_files(
        &self,
        files: &BTreeMap<String, String>,
    ) -> Result<(), WorkspaceError> {
        let mut decoded = Vec::with_capacity(files.len());
        for (name, encoded) in files {
            validate_relative_path(name)?;
            let compact: String = encoded
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            let content = STANDARD
                .decode(compact)
                .map_err(|source| WorkspaceError::Encoding {
                    path: name.clone(),
                    source,
                })?;
            decoded.push((name, content));
        }

        for (name, content) in decoded {
            self.write_file(name, &content).await?;
        }
        Ok(())
    }

    /// Read a file from the workspace
    #[instrument(skip(self))]
    pub async fn read_file(&self, name: &str) -> Result<Vec<u8>, WorkspaceError> {
        let path = self.file_path(name)?;
        let content = tokio::fs::read(&path).await?;
        debug!(?path, len = content.len(), "read file from workspace");
        Ok(content)
    }

    /// Check if a file exists in the workspace
    pub async fn file_exists(&self, name: &str) -> Result<bool, WorkspaceError> {
        let path = self.file_path(name)?;
        Ok(tokio::fs::metadata(&path).await.is_ok())
    }

    /// Check if the workspace has not been released yet
    pub fn is_active(&self) -> bool {
        self.dir.is_some()
    }

    /// Release the workspace, removing the directory unless it is kept
    #[must_use = "cleanup errors should be handled"]
    #[instrument(skip(self))]
    pub fn cleanup(mut self) -> Result<(), WorkspaceError> {
        let Some(dir) = self.dir.take() else {
            return Ok(());
        };

        if self.keep {
            let path = dir.keep();
            debug!(?path, "keeping workspace");
            return Ok(());
        }

        dir.close().map_err(|source| WorkspaceError::Cleanup {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "workspace removed");
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        if self.keep {
            let _ = dir.keep();
            return;
        }

        if let Err(e) = dir.close() {
            warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove workspace dropped without cleanup"
            );
        }
    }
}
