//! Error types for ctail.
//!
//! Errors use `thiserror` and compose through `From` conversions so the binary
//! can use `?` end to end.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - top-level failures that stop the program before or after a panel runs
//!   - `ConfigError` - config file could not be read or parsed
//!   - `LoggingError` - tracing subscriber could not be installed
//!   - [`InvalidContainerId`], [`EndpointError`] - bad target on the command line
//!   - `TuiError` - terminal setup, input or rendering failures
//!   - `std::io::Error` - runtime startup failures
//! - [`TransportError`] - socket failures. These never leave the panel runtime:
//!   they are reported inline as a notice and the reconnect timer takes over.
//!
//! Blank payloads are not errors at all; they are dropped where they arrive.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::model::{EndpointError, InvalidContainerId};
use crate::view::TuiError;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Config file could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Log file could not be set up.
    #[error("Logging setup failed: {0}")]
    Logging(#[from] LoggingError),

    /// Container id failed validation.
    #[error("Invalid container: {0}")]
    Container(#[from] InvalidContainerId),

    /// Server URL could not be parsed.
    #[error("Invalid server URL: {0}")]
    Endpoint(#[from] EndpointError),

    /// Raw mode, alternate screen, input or draw failures.
    #[error("Terminal error: {0}")]
    Tui(#[from] TuiError),

    /// Runtime or stdio failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure on the websocket transport.
///
/// Non-fatal by construction: the runtime converts it into an error notice
/// followed by a close event, and the connection manager schedules a retry.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The handshake with the server failed.
    #[error("failed to connect to {url}: {source}")]
    Connect {
        /// URL being opened.
        url: String,
        /// Handshake failure.
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },

    /// The open socket reported an error while reading or writing.
    #[error("websocket error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),
}
