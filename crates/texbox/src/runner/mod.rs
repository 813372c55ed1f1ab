//! Compilation runner for texbox
//!
//! Provides high-level APIs for compiling TeX sources in throwaway workspaces.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;
use tracing::{info, instrument, warn};

pub use crate::runner::compile::{CompileResult, compile};

mod compile;

use crate::config::{Compiler, Config};
use crate::workspace::{Workspace, WorkspaceError};

/// Errors that occur during compilation
#[derive(Debug, Error)]
pub enum CompileError {
    /// The engine exited non-zero, or exited cleanly without producing a document
    #[error("compilation failed with exit code {exit_code:?}")]
    Failed {
        exit_code: Option<i32>,
        output: String,
    },

    #[error("compilation timed out after {:.1}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("failed to start compiler {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
}

impl CompileError {
    /// Compiler output attached to the error, if the engine ran to completion
    pub fn compiler_output(&self) -> Option<&str> {
        match self {
            CompileError::Failed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Everything needed to run one compilation
#[derive(Debug, Clone)]
pub struct CompileJob {
    /// Engine to run
    pub compiler: Compiler,
    /// Primary source, written to `main.tex`
    pub source: Vec<u8>,
    /// Auxiliary files keyed by relative path, base64 encoded
    pub files: BTreeMap<String, String>,
}

impl CompileJob {
    /// Create a job with no auxiliary files
    pub fn new(compiler: Compiler, source: impl Into<Vec<u8>>) -> Self {
        Self {
            compiler,
            source: source.into(),
            files: BTreeMap::new(),
        }
    }

    /// Attach base64 encoded auxiliary files
    pub fn with_files(mut self, files: BTreeMap<String, String>) -> Self {
        self.files = files;
        self
    }

    /// Attach one auxiliary file from raw bytes
    pub fn with_file(mut self, path: impl Into<String>, content: &[u8]) -> Self {
        self.files.insert(path.into(), STANDARD.encode(content));
        self
    }
}

/// High-level runner for compilations
#[derive(Debug, Clone)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new runner with the given configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Create a new runner with default configuration
    pub fn with_defaults() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Allocate a workspace according to the configuration
    pub fn create_workspace(&self) -> Result<Workspace, WorkspaceError> {
        Workspace::create(self.config.work_root.as_deref(), self.config.keep_workspaces)
    }

    /// Compile a primary source in an existing workspace
    pub async fn compile(
        &self,
        workspace: &Workspace,
        compiler: Compiler,
        source: &[u8],
    ) -> Result<CompileResult, CompileError> {
        compile::compile(workspace, &self.config, compiler, source).await
    }

    /// Run a whole job: allocate a workspace, add files, compile, release
    ///
    /// The workspace is released on every path once the artifact has been
    /// read into memory. A failure to remove it is logged but does not turn a
    /// finished compilation into an error.
    #[instrument(skip(self, job), fields(compiler = %job.compiler, files = job.files.len()))]
    pub async fn run_job(&self, job: &CompileJob) -> Result<CompileResult, CompileError> {
        let workspace = self.create_workspace()?;

        let result = self.run_in(&workspace, job).await;

        if let Err(e) = workspace.cleanup() {
            warn!(error = %e, "failed to release workspace");
        }

        match &result {
            Ok(compiled) => info!(
                artifact_len = compiled.artifact.len(),
                wall_time = ?compiled.process.wall_time,
                "job succeeded"
            ),
            Err(e) => info!(error = %e, "job failed"),
        }

        result
    }

    async fn run_in(
        &self,
        workspace: &Workspace,
        job: &CompileJob,
    ) -> Result<CompileResult, CompileError> {
        if !job.files.is_empty() {
            workspace.add_encoded_files(&job.files).await?;
        }
        self.compile(workspace, job.compiler, &job.source).await
    }
}
