use std::path::PathBuf;
use std::time::Duration;

use texbox::config::{Compiler, Config, ConfigError};

use crate::fixture_config;

#[test]
fn test_load_valid_config() {
    let config = Config::from_file(fixture_config("valid_full.toml")).expect("Failed to load config");

    assert_eq!(config.listen_addr, "127.0.0.1:8080");
    assert_eq!(config.default_compiler, Compiler::Xelatex);
    assert_eq!(
        config.compiler_binary(Compiler::Xelatex),
        PathBuf::from("/usr/local/texlive/bin/x86_64-linux/xelatex")
    );
    assert!(config.keep_workspaces);
    assert_eq!(config.compile_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(config.max_body_bytes, 1024 * 1024);
    assert!(config.strict_content_length);
}

#[test]
fn test_load_minimal_config() {
    let config =
        Config::from_file(fixture_config("valid_minimal.toml")).expect("Failed to load config");

    assert_eq!(config.default_compiler, Compiler::Lualatex);
    assert_eq!(config.listen_addr, Config::default().listen_addr);
}

#[test]
fn test_load_invalid_compiler() {
    let result = Config::from_file(fixture_config("invalid_compiler.toml"));
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_invalid_listen_addr() {
    let result = Config::from_file(fixture_config("invalid_listen_addr.toml"));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_invalid_timeout() {
    let result = Config::from_file(fixture_config("invalid_timeout.toml"));
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}

#[test]
fn test_load_missing_file() {
    let result = Config::from_file(fixture_config("does_not_exist.toml"));
    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}
