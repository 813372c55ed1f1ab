//! Process spawning and output capture
//!
//! Runs a compiler command to completion (or until its timeout) and collects
//! its exit status and output.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::types::ProcessOutput;
use crate::workspace::command::CompilerCommand;

/// Errors that stop a process from producing an output
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to spawn {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("process timed out after {:.1}s", after.as_secs_f64())]
    Timeout { after: Duration },

    #[error("I/O error while waiting for process: {0}")]
    Io(#[from] std::io::Error),
}

/// Run a command and capture its exit status and combined output
///
/// Standard input is closed. If the command has a timeout and the process
/// outlives it, the process is killed and [`ProcessError::Timeout`] returned.
#[instrument(skip(command), fields(program = %command.program().display()))]
pub async fn run_command(command: &CompilerCommand) -> Result<ProcessOutput, ProcessError> {
    let mut process = Command::new(command.program());
    process
        .args(command.args())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = command.get_working_dir() {
        process.current_dir(dir);
    }
    for (key, value) in command.get_env() {
        process.env(key, value);
    }

    debug!(args = ?command.build(), cwd = ?command.get_working_dir(), "spawning process");

    let started = Instant::now();
    let child = process.spawn().map_err(|source| ProcessError::Spawn {
        program: command.program().to_path_buf(),
        source,
    })?;

    // Dropping the wait future on timeout drops the child, which kills it
    let output = match command.get_timeout() {
        Some(limit) => match tokio::time::timeout(limit, child.wait_with_output()).await {
            Ok(output) => output?,
            Err(_) => {
                warn!(timeout = ?limit, "process timed out, killing it");
                return Err(ProcessError::Timeout { after: limit });
            }
        },
        None => child.wait_with_output().await?,
    };

    let result = ProcessOutput::from_output(&output, started.elapsed());

    debug!(
        exit_code = ?result.exit_code,
        signal = ?result.signal,
        wall_time = ?result.wall_time,
        output_len = result.output.len(),
        "process finished"
    );

    Ok(result)
}
