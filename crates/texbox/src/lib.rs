//! A library for compiling TeX documents over HTTP.
//!
//! Texbox accepts a TeX source (plus optional auxiliary files), runs one of
//! the standard TeX engines on it in a throwaway workspace, and hands back the
//! resulting PDF or the compiler log.
//!
//! # Features
//!
//! - **Engine selection**: `tex`, `latex`, `pdftex`, `pdflatex`, `xetex`, `xelatex`, `luatex`, `lualatex`.
//! - **Isolated jobs**: Every compilation gets its own temporary directory, removed afterwards.
//! - **Auxiliary files**: Base64-encoded inputs placed at relative paths beside `main.tex`.
//! - **Bounded runs**: The compiler is killed after a configurable timeout.
//! - **TOML configuration**: File settings with `TEXBOX_*` environment overrides.
//! - **HTTP front end**: An axum router returning raw PDFs or JSON envelopes.

pub use config::{Compiler, Config, ConfigError, EXAMPLE_CONFIG};
pub use runner::{CompileError, CompileJob, CompileResult, Runner};
pub use server::{ApiError, Envelope, EnvelopeStatus, ServerError, router, serve};
pub use types::ProcessOutput;
pub use workspace::{Workspace, WorkspaceError};

pub mod config;
pub mod runner;
pub mod server;
pub mod types;
pub mod workspace;

#[cfg(test)]
mod testutil;
