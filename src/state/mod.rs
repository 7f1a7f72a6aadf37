//! Panel state (pure core).
//!
//! One panel per open log or terminal view. A panel owns its connection
//! manager, its buffers and view state, and the sink it renders into. The
//! host runtime feeds it events one at a time and executes the
//! `ConnectionAction`s it returns.

pub mod content_buffer;
pub mod font_size;
pub mod log_panel;
pub mod scroll;
pub mod search;
pub mod terminal_panel;

pub use content_buffer::ContentBuffer;
pub use font_size::{FontSize, DEFAULT_FONT_SIZE, FONT_STEP};
pub use log_panel::LogPanel;
pub use scroll::{ScrollController, DEFAULT_BOTTOM_EPSILON};
pub use search::{SearchEngine, SearchMatch, SearchQuery};
pub use terminal_panel::TerminalPanel;

use crate::config::ResolvedConfig;
use crate::connection::{
    ConnectionAction, ConnectionState, RetryToken, TransportEvent, DEFAULT_RETRY_DELAY,
};
use std::time::Duration;

/// Event-driven surface shared by log and terminal panels.
///
/// Every method returns the actions the host must execute, in order.
pub trait StreamPanel {
    /// Initial render and first connection attempt.
    fn start(&mut self) -> Vec<ConnectionAction>;

    /// Socket opened, message, error or close.
    fn on_transport(&mut self, event: TransportEvent) -> Vec<ConnectionAction>;

    /// The retry timer fired with `token`.
    fn on_retry_elapsed(&mut self, token: RetryToken) -> Vec<ConnectionAction>;

    /// The hosting UI regained visibility/focus.
    fn on_visibility_regained(&mut self) -> Vec<ConnectionAction>;

    /// Tear the panel down. Afterwards every event is ignored.
    fn destroy(&mut self) -> Vec<ConnectionAction>;

    /// Current lifecycle state.
    fn connection_state(&self) -> ConnectionState;
}

/// Per-panel tunables.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelOptions {
    /// Delay before each reconnect attempt
    pub retry_delay: Duration,
    /// Bounded-buffer cap for log mode (None = unbounded)
    pub max_lines: Option<usize>,
    /// Initial auto-follow
    pub auto_follow: bool,
    /// At-bottom tolerance in viewport units
    pub scroll_epsilon: f64,
    /// Initial font size in pixels
    pub font_size: u16,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            retry_delay: DEFAULT_RETRY_DELAY,
            max_lines: None,
            auto_follow: true,
            scroll_epsilon: DEFAULT_BOTTOM_EPSILON,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl From<&ResolvedConfig> for PanelOptions {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            max_lines: config.max_lines,
            auto_follow: config.follow,
            scroll_epsilon: config.scroll_epsilon,
            font_size: config.font_size,
        }
    }
}

/// Split notices out of an action list, passing the rest through in order.
pub(crate) fn split_notices(
    actions: Vec<ConnectionAction>,
    mut on_notice: impl FnMut(crate::connection::Notice),
) -> Vec<ConnectionAction> {
    actions
        .into_iter()
        .filter_map(|action| match action {
            ConnectionAction::Notify(notice) => {
                on_notice(notice);
                None
            }
            other => Some(other),
        })
        .collect()
}
