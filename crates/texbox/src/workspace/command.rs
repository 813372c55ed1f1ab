//! Command builder for TeX engine invocations
//!
//! Builds the command line `<engine> -interaction=nonstopmode <source>`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{INTERACTION_FLAG, SOURCE_NAME};

/// Builder for a compiler invocation
#[derive(Debug, Clone)]
pub struct CompilerCommand {
    /// Program to spawn
    program: PathBuf,
    /// Positional source argument, relative to the working directory
    source: String,
    /// Directory the process runs in
    working_dir: Option<PathBuf>,
    /// Extra environment variables
    env: BTreeMap<String, String>,
    /// Bounded wait for the process
    timeout: Option<Duration>,
}

impl CompilerCommand {
    /// Create a new command for the given program
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            source: SOURCE_NAME.to_string(),
            working_dir: None,
            env: BTreeMap::new(),
            timeout: None,
        }
    }

    /// Set the source file name passed to the engine
    pub fn source(mut self, name: impl Into<String>) -> Self {
        self.source = name.into();
        self
    }

    /// Set the working directory
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Set an environment variable
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the timeout
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn get_working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn get_env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn get_timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Build the argument list (excluding the program)
    pub fn args(&self) -> Vec<String> {
        vec![INTERACTION_FLAG.to_string(), self.source.clone()]
    }

    /// Build the full command line, program first
    pub fn build(&self) -> Vec<String> {
        let mut args = vec![self.program.to_string_lossy().into_owned()];
        args.extend(self.args());
        args
    }
}
