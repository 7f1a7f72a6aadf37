//! Configuration file loading with precedence handling.

use crate::connection::DEFAULT_RETRY_DELAY;
use crate::state::{DEFAULT_BOTTOM_EPSILON, DEFAULT_FONT_SIZE};
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

/// Server used when nothing else is configured.
pub const DEFAULT_SERVER: &str = "http://localhost:8300";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/ctail/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Base URL of the container server (e.g., "https://ops.example.com").
    #[serde(default)]
    pub server: Option<String>,

    /// Delay before a reconnect attempt, in milliseconds.
    #[serde(default)]
    pub retry_delay_ms: Option<u64>,

    /// Cap on retained log lines. 0 means unbounded.
    #[serde(default)]
    pub max_lines: Option<usize>,

    /// Distance from the bottom (in rows) still treated as "at the bottom".
    #[serde(default)]
    pub scroll_epsilon: Option<f64>,

    /// Initial font size in px.
    #[serde(default)]
    pub font_size: Option<u16>,

    /// Start with auto-follow enabled.
    #[serde(default)]
    pub follow: Option<bool>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Base URL of the container server.
    pub server: String,
    /// Reconnect delay in milliseconds.
    pub retry_delay_ms: u64,
    /// Retained line cap (None = unbounded).
    pub max_lines: Option<usize>,
    /// Bottom tolerance for auto-follow.
    pub scroll_epsilon: f64,
    /// Initial font size in px.
    pub font_size: u16,
    /// Auto-follow on start.
    pub follow: bool,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            retry_delay_ms: DEFAULT_RETRY_DELAY.as_millis() as u64,
            max_lines: None,
            scroll_epsilon: DEFAULT_BOTTOM_EPSILON,
            font_size: DEFAULT_FONT_SIZE,
            follow: true,
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/ctail/ctail.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("ctail").join("ctail.log")
    } else {
        PathBuf::from("ctail.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    // Missing file is not an error - use defaults
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/ctail/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ctail").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `CTAIL_CONFIG` environment variable
/// 3. Default path `~/.config/ctail/config.toml`
///
/// Missing config files are NOT errors - defaults are used.
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Some(env_path) = std::env::var_os("CTAIL_CONFIG") {
        if env_path.is_empty() {
            return Err(ConfigError::InvalidPath("CTAIL_CONFIG is empty".to_string()));
        }
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `CTAIL_SERVER`: Override server base URL
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(server) = std::env::var("CTAIL_SERVER") {
        if !server.trim().is_empty() {
            config.server = server;
        }
    }

    config
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        server: config.server.unwrap_or(defaults.server),
        retry_delay_ms: config.retry_delay_ms.unwrap_or(defaults.retry_delay_ms),
        max_lines: match config.max_lines {
            Some(0) => None,
            Some(n) => Some(n),
            None => defaults.max_lines,
        },
        scroll_epsilon: config
            .scroll_epsilon
            .filter(|e| e.is_finite() && *e >= 0.0)
            .unwrap_or(defaults.scroll_epsilon),
        font_size: config.font_size.unwrap_or(defaults.font_size),
        follow: config.follow.unwrap_or(defaults.follow),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Overrides taken from the command line. `None` means "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOverrides {
    /// Server base URL from `--server`.
    pub server: Option<String>,
    /// Line cap from `--max-lines` (0 means unbounded).
    pub max_lines: Option<usize>,
    /// `Some(false)` from `--no-follow`.
    pub follow: Option<bool>,
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(mut config: ResolvedConfig, cli: CliOverrides) -> ResolvedConfig {
    if let Some(server) = cli.server {
        config.server = server;
    }

    if let Some(max_lines) = cli.max_lines {
        config.max_lines = (max_lines > 0).then_some(max_lines);
    }

    if let Some(follow) = cli.follow {
        config.follow = follow;
    }

    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
