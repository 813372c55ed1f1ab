//! Compilation step
//!
//! Writes the primary source, runs the engine in the workspace, and collects
//! the produced document.

use tracing::{debug, instrument, warn};

use crate::config::{ARTIFACT_NAME, Compiler, Config, SOURCE_NAME};
use crate::runner::CompileError;
use crate::types::ProcessOutput;
use crate::workspace::{CompilerCommand, ProcessError, Workspace, run_command};

/// Result of a successful compilation
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Engine that produced the artifact
    pub compiler: Compiler,

    /// Exit status and output of the engine
    pub process: ProcessOutput,

    /// Raw bytes of the produced document
    pub artifact: Vec<u8>,
}

impl CompileResult {
    /// Compiler output (the engine's log as printed to the terminal)
    pub fn output(&self) -> &str {
        &self.process.output
    }
}

/// Compile a primary source in a workspace
///
/// The source is written to `main.tex`, overwriting any auxiliary file of the
/// same name. A zero exit code is not trusted on its own: the compilation
/// only succeeds if `main.pdf` exists afterwards.
#[instrument(skip(workspace, config, source), fields(dir = %workspace.path().display()))]
pub async fn compile(
    workspace: &Workspace,
    config: &Config,
    compiler: Compiler,
    source: &[u8],
) -> Result<CompileResult, CompileError> {
    workspace.write_file(SOURCE_NAME, source).await?;
    debug!(len = source.len(), "wrote primary source");

    let command = CompilerCommand::new(config.compiler_binary(compiler))
        .source(SOURCE_NAME)
        .working_dir(workspace.path())
        .timeout(config.compile_timeout());

    let process = run_command(&command).await.map_err(|e| match e {
        ProcessError::Spawn { program, source } => CompileError::Spawn { program, source },
        ProcessError::Timeout { after } => CompileError::Timeout { after },
        ProcessError::Io(e) => CompileError::Workspace(e.into()),
    })?;

    if !process.is_success() {
        warn!(
            exit_code = ?process.exit_code,
            signal = ?process.signal,
            "compiler reported failure"
        );
        return Err(CompileError::Failed {
            exit_code: process.exit_code,
            output: process.output,
        });
    }

    if !workspace.file_exists(ARTIFACT_NAME).await? {
        warn!("compiler exited cleanly but produced no artifact");
        return Err(CompileError::Failed {
            exit_code: process.exit_code,
            output: process.output,
        });
    }

    let artifact = workspace.read_file(ARTIFACT_NAME).await?;

    debug!(
        artifact_len = artifact.len(),
        wall_time = ?process.wall_time,
        "compilation complete"
    );

    Ok(CompileResult {
        compiler,
        process,
        artifact,
    })
}
