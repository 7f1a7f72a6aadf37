//! Log-mode panel: connection, line buffer, auto-follow and search wired to a sink.
//!
//! Every content change funnels through one refresh path: render (plain or
//! highlighted) into the sink, then let the scroll controller decide whether
//! to pin the viewport to the bottom. User actions mutate scroll or search
//! state and take the same path.

use super::{split_notices, PanelOptions, StreamPanel};
use crate::connection::{
    ConnectionAction, ConnectionManager, ConnectionState, Notice, RetryToken, TransportEvent,
};
use crate::model::{Endpoint, StreamTarget};
use crate::sink::DisplaySink;
use crate::state::{ContentBuffer, FontSize, ScrollController, SearchEngine};
use tracing::{debug, trace, warn};

/// Line appended when the socket opens.
pub const CONNECTED_LINE: &str = "--- Connected ---";
/// Line appended when the socket closes.
pub const CONNECTION_LOST_LINE: &str = "--- Connection lost. Attempting to reconnect... ---";
/// Line appended when the socket reports an error.
pub const CONNECTION_ERROR_LINE: &str = "--- Connection error occurred ---";

fn notice_line(notice: Notice) -> &'static str {
    match notice {
        Notice::Connected => CONNECTED_LINE,
        Notice::ConnectionLost => CONNECTION_LOST_LINE,
        Notice::ConnectionError => CONNECTION_ERROR_LINE,
    }
}

/// One log view bound to one container.
#[derive(Debug)]
pub struct LogPanel<S: DisplaySink> {
    target: StreamTarget,
    connection: ConnectionManager,
    buffer: ContentBuffer,
    scroll: ScrollController,
    search: SearchEngine,
    font: FontSize,
    search_visible: bool,
    sink: S,
}

impl<S: DisplaySink> LogPanel<S> {
    /// Build a panel for `target`. Nothing happens until `start`.
    pub fn new(endpoint: &Endpoint, target: StreamTarget, options: &PanelOptions, sink: S) -> Self {
        Self {
            connection: ConnectionManager::new(endpoint, &target, options.retry_delay),
            target,
            buffer: ContentBuffer::with_max_lines(options.max_lines),
            scroll: ScrollController::new(options.auto_follow).with_epsilon(options.scroll_epsilon),
            search: SearchEngine::new(),
            font: FontSize::for_logs(options.font_size),
            search_visible: false,
            sink,
        }
    }

    // ===== Accessors =====

    /// Container and mode this panel streams.
    pub fn target(&self) -> &StreamTarget {
        &self.target
    }

    /// Line history.
    pub fn buffer(&self) -> &ContentBuffer {
        &self.buffer
    }

    /// Auto-follow state.
    pub fn scroll(&self) -> &ScrollController {
        &self.scroll
    }

    /// Query and match set.
    pub fn search(&self) -> &SearchEngine {
        &self.search
    }

    /// Current font size in pixels.
    pub fn font_size(&self) -> u16 {
        self.font.px()
    }

    /// Whether the search bar is shown.
    pub fn search_visible(&self) -> bool {
        self.search_visible
    }

    /// The display this panel renders into.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable access for the host's own viewport control.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ===== Content =====

    /// Append a payload (or notice) and refresh.
    ///
    /// An active search is rescanned before the render so matches always
    /// reflect the grown buffer.
    fn append(&mut self, text: &str) {
        let appended = self.buffer.append_chunk(text);
        if appended == 0 {
            return;
        }
        trace!(appended, total = self.buffer.len(), "lines appended");

        if self.search.is_active() {
            self.search.resync(&self.buffer);
        }
        self.refresh();
    }

    /// Write the current content to the sink: highlighted when a search has
    /// matches, plain otherwise.
    fn render(&mut self) {
        if self.search.has_matches() {
            let text = self.search.highlight(&self.buffer);
            self.sink.set_highlighted(&text);
        } else {
            self.sink.set_plain_text(&self.buffer.joined());
        }
    }

    /// Render, then apply the auto-follow decision.
    fn refresh(&mut self) {
        self.render();
        self.scroll.on_content_updated(&mut self.sink);
    }

    fn route(&mut self, actions: Vec<ConnectionAction>) -> Vec<ConnectionAction> {
        split_notices(actions, |notice| self.append(notice_line(notice)))
    }

    // ===== Scrolling =====

    /// Viewport geometry reported by the host after any scroll.
    pub fn on_user_scroll(&mut self, viewport_top: f64, viewport_height: f64, content_height: f64) {
        self.scroll
            .on_user_scroll(viewport_top, viewport_height, content_height);
    }

    /// Flip auto-follow; turning it on jumps to the bottom.
    pub fn toggle_auto_follow(&mut self) {
        self.scroll.toggle_auto_follow(&mut self.sink);
    }

    // ===== Font =====

    /// One step larger, clamped.
    pub fn increase_font_size(&mut self) {
        if self.font.increase() {
            self.sink.set_font_size(self.font.px());
        }
    }

    /// One step smaller, clamped.
    pub fn decrease_font_size(&mut self) {
        if self.font.decrease() {
            self.sink.set_font_size(self.font.px());
        }
    }

    // ===== Search =====

    /// Show the search bar, or hide it (clearing the query).
    pub fn toggle_search(&mut self) {
        if self.search_visible {
            self.hide_search();
        } else {
            self.search_visible = true;
        }
    }

    /// Hide the search bar, clear the query and return to plain rendering.
    pub fn hide_search(&mut self) {
        self.search_visible = false;
        if self.search.is_active() {
            self.search.clear();
            self.refresh();
        }
    }

    /// Replace the query, rescan and bring the first match into view.
    pub fn set_query(&mut self, query: &str) {
        self.search.set_query(query, &self.buffer);
        debug!(query, matches = self.search.matches().len(), "query changed");

        self.render();
        match self.search.current_index() {
            Some(index) => self.sink.scroll_into_view(index),
            None => self.scroll.on_content_updated(&mut self.sink),
        }
    }

    /// Move to the next match (wrapping) and bring it into view.
    pub fn next_match(&mut self) {
        if self.search.next() {
            self.show_current_match();
        }
    }

    /// Move to the previous match (wrapping) and bring it into view.
    pub fn previous_match(&mut self) {
        if self.search.previous() {
            self.show_current_match();
        }
    }

    fn show_current_match(&mut self) {
        self.render();
        if let Some(index) = self.search.current_index() {
            self.sink.scroll_into_view(index);
        }
    }
}

impl<S: DisplaySink> StreamPanel for LogPanel<S> {
    fn start(&mut self) -> Vec<ConnectionAction> {
        self.sink.set_font_size(self.font.px());
        self.refresh();
        let actions = self.connection.connect();
        self.route(actions)
    }

    fn on_transport(&mut self, event: TransportEvent) -> Vec<ConnectionAction> {
        match event {
            TransportEvent::Opened => {
                let actions = self.connection.on_open();
                self.route(actions)
            }
            TransportEvent::Message(payload) => {
                if !self.connection.accepts_messages() {
                    trace!(state = self.connection.state().label(), "message outside connection dropped");
                } else if payload.is_blank() {
                    trace!("blank payload dropped");
                } else {
                    self.append(&payload.to_text());
                }
                Vec::new()
            }
            TransportEvent::Closed => {
                let actions = self.connection.on_close();
                self.route(actions)
            }
            TransportEvent::Error(detail) => {
                warn!(target = %self.target, %detail, "transport error");
                let actions = self.connection.on_error();
                self.route(actions)
            }
        }
    }

    fn on_retry_elapsed(&mut self, token: RetryToken) -> Vec<ConnectionAction> {
        let actions = self.connection.on_retry_elapsed(token);
        self.route(actions)
    }

    fn on_visibility_regained(&mut self) -> Vec<ConnectionAction> {
        let actions = self.connection.on_visibility_regained();
        self.route(actions)
    }

    fn destroy(&mut self) -> Vec<ConnectionAction> {
        let actions = self.connection.destroy();
        self.route(actions)
    }

    fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }
}

#[cfg(test)]
#[path = "log_panel_tests.rs"]
mod tests;
