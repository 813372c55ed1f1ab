//! Integration tests for texbox
//!
//! These tests run the real TeX engines, which must be on PATH (or under
//! `TEXBOX_TEX_BIN_DIR`). Run with: cargo test -p texbox --features integration-tests
//!
//! Tests that need a TeX installation are marked `#[ignore]`. To include them:
//!    cargo test -p texbox --features integration-tests -- --include-ignored

#![cfg(feature = "integration-tests")]

use std::fs;

use texbox::config::Config;

mod config_loading;
mod http_api;
mod workspace_lifecycle;

const FIXTURES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Helper to get fixture file content
pub(crate) fn fixture_source(name: &str) -> Vec<u8> {
    let path = format!("{FIXTURES_PATH}/sources/{name}");
    fs::read(&path).unwrap_or_else(|e| panic!("Failed to read fixture {path}: {e}"))
}

/// Path to a config fixture
pub(crate) fn fixture_config(name: &str) -> String {
    format!("{FIXTURES_PATH}/configs/{name}")
}

/// Test config honoring `TEXBOX_*` overrides, with a shorter timeout
pub(crate) fn test_config() -> Config {
    let mut config = Config::load(None).expect("Failed to load config from environment");
    config.compile_timeout = 60.0;
    config
}
