//! Socket lifecycle and reconnect policy.
//!
//! [`ConnectionManager`] is a sans-IO state machine: it never touches a socket
//! or a timer itself. Every transition returns the [`ConnectionAction`]s the
//! host runtime must perform (open, close, send, arm or disarm the retry
//! timer) plus the [`Notice`]s the owning panel should show.
//!
//! ```text
//! Disconnected --connect()--> Connecting --open--> Connected
//!      ^                          |                    |
//!      +------ close (retry) -----+--------------------+
//! any state --destroy()--> Closed
//! ```
//!
//! Retries use a fixed delay with no backoff and no attempt limit. At most one
//! retry is live: every scheduled retry carries a fresh [`RetryToken`] and a
//! timer firing with a stale token is ignored.

mod event;

pub use event::{Payload, TransportEvent};

use crate::model::{Endpoint, StreamTarget};
use std::time::Duration;
use tracing::{debug, info, trace};

/// Delay between a close event and the next connection attempt.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(3);

// ===== ConnectionState =====

/// Lifecycle state of a panel's socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No socket; a retry may be pending.
    Disconnected,
    /// Handshake in flight.
    Connecting,
    /// Socket open and streaming.
    Connected,
    /// Terminal state after `destroy()`. Nothing leaves it.
    Closed,
}

impl ConnectionState {
    /// Short lowercase name for logs and the status bar.
    pub fn label(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Closed => "closed",
        }
    }
}

// ===== Actions and notices =====

/// Identifies one scheduled retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RetryToken(u64);

/// Lifecycle events the user should see inline in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    /// The socket opened.
    Connected,
    /// The socket closed; a retry is scheduled.
    ConnectionLost,
    /// The transport reported an error.
    ConnectionError,
}

/// Side effect the host runtime must execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionAction {
    /// Start opening a websocket to `url`.
    OpenTransport {
        /// Websocket URL.
        url: String,
    },
    /// Close the socket (or abandon the in-flight handshake).
    CloseTransport,
    /// Write raw bytes to the open socket.
    Send(Vec<u8>),
    /// Arm the single retry timer, replacing any armed one.
    ScheduleRetry {
        /// Identifies this retry; only the newest token is honored.
        token: RetryToken,
        /// How long to wait.
        delay: Duration,
    },
    /// Disarm the retry timer.
    CancelRetry,
    /// Show a lifecycle notice. Consumed by the panel, never by the transport.
    Notify(Notice),
}

// ===== ConnectionManager =====

/// Owns the connection state and reconnect policy for one panel.
#[derive(Debug)]
pub struct ConnectionManager {
    url: String,
    state: ConnectionState,
    retry_delay: Duration,
    pending_retry: Option<RetryToken>,
    next_token: u64,
    attempts: u64,
}

impl ConnectionManager {
    /// Create a manager for `target` served from `endpoint`. Starts `Disconnected`.
    pub fn new(endpoint: &Endpoint, target: &StreamTarget, retry_delay: Duration) -> Self {
        Self {
            url: endpoint.stream_url(target),
            state: ConnectionState::Disconnected,
            retry_delay,
            pending_retry: None,
            next_token: 0,
            attempts: 0,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Websocket URL derived from the endpoint and target.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether a retry timer is currently armed.
    pub fn retry_pending(&self) -> bool {
        self.pending_retry.is_some()
    }

    /// Number of connection attempts started so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Begin a connection attempt. No-op unless `Disconnected`.
    pub fn connect(&mut self) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Disconnected {
            trace!(state = self.state.label(), "connect ignored");
            return Vec::new();
        }

        self.state = ConnectionState::Connecting;
        self.attempts += 1;
        debug!(url = %self.url, attempt = self.attempts, "connecting");

        vec![ConnectionAction::OpenTransport {
            url: self.url.clone(),
        }]
    }

    /// The transport finished its handshake.
    pub fn on_open(&mut self) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connecting {
            trace!(state = self.state.label(), "open event ignored");
            return Vec::new();
        }

        self.state = ConnectionState::Connected;
        info!(url = %self.url, "connected");
        vec![ConnectionAction::Notify(Notice::Connected)]
    }

    /// Whether an inbound payload should be delivered to the panel.
    pub fn accepts_messages(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// The transport closed. Schedules exactly one retry after the fixed delay.
    pub fn on_close(&mut self) -> Vec<ConnectionAction> {
        match self.state {
            ConnectionState::Closed => return Vec::new(),
            ConnectionState::Disconnected if self.pending_retry.is_some() => {
                trace!("duplicate close event ignored");
                return Vec::new();
            }
            _ => {}
        }

        self.state = ConnectionState::Disconnected;
        let token = self.issue_token();
        self.pending_retry = Some(token);
        info!(url = %self.url, delay_ms = self.retry_delay.as_millis() as u64, "connection lost, retry scheduled");

        vec![
            ConnectionAction::Notify(Notice::ConnectionLost),
            ConnectionAction::ScheduleRetry {
                token,
                delay: self.retry_delay,
            },
        ]
    }

    /// The transport reported an error. Does not transition; the close event does.
    pub fn on_error(&mut self) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Closed {
            return Vec::new();
        }
        vec![ConnectionAction::Notify(Notice::ConnectionError)]
    }

    /// The retry timer fired.
    pub fn on_retry_elapsed(&mut self, token: RetryToken) -> Vec<ConnectionAction> {
        if self.pending_retry != Some(token) {
            trace!(?token, "stale retry timer ignored");
            return Vec::new();
        }
        self.pending_retry = None;
        self.connect()
    }

    /// The UI became visible again. Reconnects immediately when disconnected;
    /// the armed timer stays in place.
    pub fn on_visibility_regained(&mut self) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Disconnected {
            debug!("visibility regained while disconnected, reconnecting early");
            self.connect()
        } else {
            Vec::new()
        }
    }

    /// Forward user input. Dropped unless connected; input is never queued.
    pub fn send_input(&mut self, bytes: Vec<u8>) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connected || bytes.is_empty() {
            trace!(len = bytes.len(), state = self.state.label(), "input dropped");
            return Vec::new();
        }
        vec![ConnectionAction::Send(bytes)]
    }

    /// Tear down: cancel the retry timer, release the socket, enter `Closed`.
    pub fn destroy(&mut self) -> Vec<ConnectionAction> {
        if self.state == ConnectionState::Closed {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if self.pending_retry.take().is_some() {
            actions.push(ConnectionAction::CancelRetry);
        }
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            actions.push(ConnectionAction::CloseTransport);
        }

        self.state = ConnectionState::Closed;
        info!(url = %self.url, "connection manager destroyed");
        actions
    }

    fn issue_token(&mut self) -> RetryToken {
        self.next_token += 1;
        RetryToken(self.next_token)
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
