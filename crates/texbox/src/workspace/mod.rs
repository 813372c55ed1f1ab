//! Per-job compilation workspaces
//!
//! This module owns the filesystem side of a compilation: allocating a fresh
//! directory for each job, placing the primary source and auxiliary files in
//! it, building the compiler command line, and running the compiler with its
//! working directory set to the job's directory.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

pub use crate::workspace::command::CompilerCommand;
pub use crate::workspace::manager::Workspace;
pub use crate::workspace::process::{ProcessError, run_command};

mod command;
mod manager;
mod process;

/// Errors that occur while preparing or tearing down a workspace
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("failed to create workspace under {root}: {source}")]
    Create {
        root: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("file '{path}' is not valid base64: {source}")]
    Encoding {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("failed to remove workspace {path}: {source}")]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkspaceError {
    /// Check if the error was caused by the client's input rather than the host
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            WorkspaceError::InvalidPath(_) | WorkspaceError::Encoding { .. }
        )
    }
}

/// Check that a client-supplied path stays inside the workspace
///
/// Only plain relative paths are accepted. Absolute paths, parent directory
/// references, and empty paths are rejected; `.` components are dropped.
pub fn validate_relative_path(name: &str) -> Result<PathBuf, WorkspaceError> {
    let mut clean = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                return Err(WorkspaceError::InvalidPath(format!(
                    "path traversal not allowed: {name}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(WorkspaceError::InvalidPath(format!(
                    "absolute paths not allowed: {name}"
                )));
            }
        }
    }

    if clean.as_os_str().is_empty() {
        return Err(WorkspaceError::InvalidPath(format!(
            "path does not name a file: '{name}'"
        )));
    }

    Ok(clean)
}
