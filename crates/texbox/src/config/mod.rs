use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::config::compiler::{ARTIFACT_NAME, Compiler, INTERACTION_FLAG, SOURCE_NAME};

pub mod compiler;
mod loader;

/// Example configuration embedded at compile time.
///
/// Library users can access this to generate a starter config file.
pub const EXAMPLE_CONFIG: &str = include_str!("../../texbox.example.toml");

/// Prefix for environment variable overrides (`TEXBOX_LISTEN_ADDR`, ...)
pub const ENV_PREFIX: &str = "TEXBOX";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("compiler '{0}' is not supported")]
    CompilerNotFound(String),

    #[error("failed to read config file at {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] config::ConfigError),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Config for texbox
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Compiler used when the request path is empty.
    #[serde(default)]
    pub default_compiler: Compiler,

    /// Directory holding the TeX binaries (uses PATH if not specified).
    #[serde(default)]
    pub tex_bin_dir: Option<PathBuf>,

    /// Parent directory for per-job workspaces (system temp dir if not specified).
    #[serde(default)]
    pub work_root: Option<PathBuf>,

    /// Leave job workspaces on disk instead of deleting them.
    ///
    /// Meant for debugging compiler failures. Directories accumulate without
    /// bound while this is on.
    #[serde(default)]
    pub keep_workspaces: bool,

    /// Seconds to wait for the compiler before killing it. `0` waits forever.
    #[serde(default = "default_compile_timeout")]
    pub compile_timeout: f64,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Answer a missing Content-Length with 411 instead of the legacy 200.
    #[serde(default)]
    pub strict_content_length: bool,
}

impl Config {
    /// Create a new config with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a compiler identifier taken from a request path
    ///
    /// An empty identifier selects [`Config::default_compiler`].
    pub fn get_compiler(&self, id: &str) -> Result<Compiler, ConfigError> {
        if id.is_empty() {
            return Ok(self.default_compiler);
        }
        id.parse()
    }

    /// Get the program to spawn for a compiler
    pub fn compiler_binary(&self, compiler: Compiler) -> PathBuf {
        match self.tex_bin_dir {
            Some(ref dir) => dir.join(compiler.binary_name()),
            None => PathBuf::from(compiler.binary_name()),
        }
    }

    /// Get the compile timeout, or `None` if compilation is unbounded
    pub fn compile_timeout(&self) -> Option<Duration> {
        if self.compile_timeout > 0.0 {
            Some(Duration::from_secs_f64(self.compile_timeout))
        } else {
            None
        }
    }

    /// Parse the listen address
    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr.parse().map_err(|_| {
            ConfigError::Invalid(format!(
                "listen_addr '{}' is not a socket address",
                self.listen_addr
            ))
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            default_compiler: Compiler::default(),
            tex_bin_dir: None,
            work_root: None,
            keep_workspaces: false,
            compile_timeout: default_compile_timeout(),
            max_body_bytes: default_max_body_bytes(),
            strict_content_length: false,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:7000".to_string()
}

fn default_compile_timeout() -> f64 {
    120.0
}

fn default_max_body_bytes() -> usize {
    32 * 1024 * 1024
}
