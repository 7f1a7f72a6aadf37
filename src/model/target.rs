//! Stream targets and websocket URL derivation.
//!
//! A panel is bound to one [`StreamTarget`] for its whole lifetime. The
//! websocket URL is a pure function of the server [`Endpoint`] and the target,
//! so reconnect attempts always dial the same place.

use super::identifiers::ContainerId;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ===== StreamMode =====

/// Which backend stream a panel attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Line-oriented container log output.
    Logs,
    /// Interactive shell session (raw byte stream, ANSI included).
    Terminal,
}

impl StreamMode {
    /// Route segment used by the backend for this mode.
    pub fn route(self) -> &'static str {
        match self {
            StreamMode::Logs => "logs",
            StreamMode::Terminal => "terminal",
        }
    }
}

impl fmt::Display for StreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route())
    }
}

impl FromStr for StreamMode {
    type Err = UnknownStreamMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "logs" => Ok(StreamMode::Logs),
            "terminal" => Ok(StreamMode::Terminal),
            other => Err(UnknownStreamMode(other.to_string())),
        }
    }
}

/// Unrecognized stream mode name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown stream mode {0:?} (expected \"logs\" or \"terminal\")")]
pub struct UnknownStreamMode(pub String);

// ===== StreamTarget =====

/// The backend resource a panel streams from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StreamTarget {
    container: ContainerId,
    mode: StreamMode,
}

impl StreamTarget {
    /// Bind a container to a stream mode.
    pub fn new(container: ContainerId, mode: StreamMode) -> Self {
        Self { container, mode }
    }

    /// Container being streamed.
    pub fn container(&self) -> &ContainerId {
        &self.container
    }

    /// Logs or terminal.
    pub fn mode(&self) -> StreamMode {
        self.mode
    }
}

impl fmt::Display for StreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.mode, self.container)
    }
}

// ===== Endpoint =====

/// Server the streams are served from.
///
/// Built from the base URL the UI is served on; `https` selects `wss` and
/// anything else selects `ws`, mirroring the serving page's own scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    secure: bool,
    /// Host, optional port and optional path prefix, without trailing slash.
    authority: String,
}

impl Endpoint {
    /// Parse a base URL such as `http://localhost:8300` or `https://ops.example.com/dwui`.
    ///
    /// A bare `host:port` is treated as plain `http`.
    pub fn parse(base: &str) -> Result<Self, EndpointError> {
        let base = base.trim();
        let (secure, rest) = match base.split_once("://") {
            Some((scheme, rest)) => match scheme.to_ascii_lowercase().as_str() {
                "http" | "ws" => (false, rest),
                "https" | "wss" => (true, rest),
                _ => return Err(EndpointError::UnsupportedScheme(scheme.to_string())),
            },
            None => (false, base),
        };

        let authority = rest.trim_end_matches('/');
        if authority.is_empty() || authority.starts_with('/') {
            return Err(EndpointError::MissingHost(base.to_string()));
        }

        Ok(Self {
            secure,
            authority: authority.to_string(),
        })
    }

    /// Whether sockets use `wss`.
    pub fn is_secure(&self) -> bool {
        self.secure
    }

    /// Websocket URL for a target: `{ws|wss}://<host>/<mode>/stream/<container>`.
    pub fn stream_url(&self, target: &StreamTarget) -> String {
        let scheme = if self.secure { "wss" } else { "ws" };
        format!(
            "{scheme}://{}/{}/stream/{}",
            self.authority,
            target.mode().route(),
            target.container()
        )
    }
}

/// Rejected server base URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// Scheme other than http, https, ws or wss.
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),

    /// No host after the scheme.
    #[error("server URL {0:?} has no host")]
    MissingHost(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(mode: StreamMode) -> StreamTarget {
        StreamTarget::new(ContainerId::new("abc123").unwrap(), mode)
    }

    #[test]
    fn plain_http_maps_to_ws() {
        let endpoint = Endpoint::parse("http://localhost:8300").unwrap();
        assert!(!endpoint.is_secure());
        assert_eq!(
            endpoint.stream_url(&target(StreamMode::Logs)),
            "ws://localhost:8300/logs/stream/abc123"
        );
    }

    #[test]
    fn https_maps_to_wss() {
        let endpoint = Endpoint::parse("https://ops.example.com/").unwrap();
        assert!(endpoint.is_secure());
        assert_eq!(
            endpoint.stream_url(&target(StreamMode::Terminal)),
            "wss://ops.example.com/terminal/stream/abc123"
        );
    }

    #[test]
    fn bare_authority_is_plain() {
        let endpoint = Endpoint::parse("10.0.0.5:8300").unwrap();
        assert_eq!(
            endpoint.stream_url(&target(StreamMode::Logs)),
            "ws://10.0.0.5:8300/logs/stream/abc123"
        );
    }

    #[test]
    fn path_prefix_is_kept() {
        let endpoint = Endpoint::parse("https://example.com/dwui/").unwrap();
        assert_eq!(
            endpoint.stream_url(&target(StreamMode::Logs)),
            "wss://example.com/dwui/logs/stream/abc123"
        );
    }

    #[test]
    fn url_is_deterministic() {
        let endpoint = Endpoint::parse("http://h").unwrap();
        let t = target(StreamMode::Logs);
        assert_eq!(endpoint.stream_url(&t), endpoint.stream_url(&t));
    }

    #[test]
    fn rejects_unknown_scheme() {
        assert_eq!(
            Endpoint::parse("ftp://host"),
            Err(EndpointError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn rejects_missing_host() {
        assert!(matches!(
            Endpoint::parse("https://"),
            Err(EndpointError::MissingHost(_))
        ));
    }

    #[test]
    fn stream_mode_parses_route_names() {
        assert_eq!("logs".parse::<StreamMode>(), Ok(StreamMode::Logs));
        assert_eq!("terminal".parse::<StreamMode>(), Ok(StreamMode::Terminal));
        assert!("shell".parse::<StreamMode>().is_err());
    }
}
