//! Terminal-mode panel.
//!
//! Shares the connection design with log mode but keeps no history: inbound
//! bytes go straight to the terminal sink, and keystrokes go straight to the
//! socket while connected.

use super::{split_notices, PanelOptions, StreamPanel};
use crate::connection::{
    ConnectionAction, ConnectionManager, ConnectionState, Notice, RetryToken, TransportEvent,
};
use crate::model::{Endpoint, StreamTarget};
use crate::sink::TerminalSink;
use crate::state::FontSize;
use tracing::{trace, warn};

/// Written when the socket opens.
pub const CONNECTED_BANNER: &[u8] = b"\x1b[32mConnected to container terminal...\x1b[0m\r\n\r\n";
/// Written when the socket closes.
pub const CONNECTION_LOST_BANNER: &[u8] =
    b"\r\n\x1b[31mConnection lost. Attempting to reconnect...\x1b[0m\r\n";
/// Written when the socket reports an error.
pub const CONNECTION_ERROR_BANNER: &[u8] = b"\r\n\x1b[31mConnection error occurred.\x1b[0m\r\n";

fn banner(notice: Notice) -> &'static [u8] {
    match notice {
        Notice::Connected => CONNECTED_BANNER,
        Notice::ConnectionLost => CONNECTION_LOST_BANNER,
        Notice::ConnectionError => CONNECTION_ERROR_BANNER,
    }
}

/// One interactive shell view bound to one container.
#[derive(Debug)]
pub struct TerminalPanel<T: TerminalSink> {
    target: StreamTarget,
    connection: ConnectionManager,
    font: FontSize,
    sink: T,
}

impl<T: TerminalSink> TerminalPanel<T> {
    /// Build a panel for `target`. Nothing happens until `start`.
    pub fn new(endpoint: &Endpoint, target: StreamTarget, options: &PanelOptions, sink: T) -> Self {
        Self {
            connection: ConnectionManager::new(endpoint, &target, options.retry_delay),
            target,
            font: FontSize::for_terminal(options.font_size),
            sink,
        }
    }

    /// Container and mode this panel streams.
    pub fn target(&self) -> &StreamTarget {
        &self.target
    }

    /// Current font size in pixels.
    pub fn font_size(&self) -> u16 {
        self.font.px()
    }

    /// The emulator this panel writes into.
    pub fn sink(&self) -> &T {
        &self.sink
    }

    /// Mutable access to the emulator.
    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    /// Keystrokes from the terminal. Sent only while connected, dropped otherwise.
    pub fn send_input(&mut self, bytes: Vec<u8>) -> Vec<ConnectionAction> {
        self.connection.send_input(bytes)
    }

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

    fn route(&mut self, actions: Vec<ConnectionAction>) -> Vec<ConnectionAction> {
        split_notices(actions, |notice| self.sink.write(banner(notice)))
    }
}

impl<T: TerminalSink> StreamPanel for TerminalPanel<T> {
    fn start(&mut self) -> Vec<ConnectionAction> {
        self.sink.set_font_size(self.font.px());
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
                let bytes = payload.as_bytes();
                if self.connection.accepts_messages() && !bytes.is_empty() {
                    self.sink.write(bytes);
                } else {
                    trace!(len = bytes.len(), "terminal payload dropped");
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
