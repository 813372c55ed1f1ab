use std::process::ExitStatus;
use std::time::Duration;

/// What a finished compiler process left behind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOutput {
    /// Exit code (None if killed by a signal)
    pub exit_code: Option<i32>,

    /// Signal that terminated the process, if any
    pub signal: Option<i32>,

    /// Standard output followed by standard error
    pub output: String,

    /// Wall clock time the process ran for
    pub wall_time: Duration,
}

impl ProcessOutput {
    /// Build from a finished process
    pub fn from_output(output: &std::process::Output, wall_time: Duration) -> Self {
        Self {
            exit_code: output.status.code(),
            signal: exit_signal(&output.status),
            output: combine_streams(&output.stdout, &output.stderr),
            wall_time,
        }
    }

    /// Check if the process exited cleanly
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Join stdout and stderr into one diagnostic string
///
/// TeX engines write their log to stdout, so it comes first. Invalid UTF-8 is
/// replaced rather than rejected since engines echo raw input bytes.
pub fn combine_streams(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    let stderr = String::from_utf8_lossy(stderr);
    if !combined.is_empty() && !stderr.is_empty() && !combined.ends_with('\n') {
        combined.push('\n');
    }
    combined.push_str(&stderr);
    combined
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
