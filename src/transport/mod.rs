//! Websocket transport (impure shell).
//!
//! [`TransportDriver`] executes the `ConnectionAction`s a panel returns and
//! turns socket activity and the retry timer into events for the panel. It
//! holds at most one socket (or in-flight handshake) and at most one armed
//! retry timer.
//!
//! Runs on a single-threaded runtime: the panel and the driver are only ever
//! touched from the one task that owns them, so no locking is involved.

use crate::connection::{ConnectionAction, Payload, RetryToken, TransportEvent};
use crate::model::TransportError;
use crate::state::StreamPanel;
use futures_util::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::future::{pending, Future};
use std::pin::Pin;
use tokio::net::TcpStream;
use tokio::time::{sleep, Sleep};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

/// Client websocket over plain TCP or TLS.
pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

type ConnectFuture = Pin<Box<dyn Future<Output = Result<WsStream, TransportError>>>>;

/// Something the panel must react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverEvent {
    /// Socket activity.
    Transport(TransportEvent),
    /// The armed retry timer fired.
    RetryElapsed(RetryToken),
}

/// Open a websocket to `url`.
pub async fn open(url: String) -> Result<WsStream, TransportError> {
    debug!(%url, "opening websocket");
    let (stream, _response) = connect_async(url.as_str())
        .await
        .map_err(|source| TransportError::Connect { url, source })?;
    Ok(stream)
}

/// Owns the socket and the retry timer for one panel.
#[derive(Default)]
pub struct TransportDriver {
    connecting: Option<ConnectFuture>,
    socket: Option<WsStream>,
    retry: Option<(RetryToken, Pin<Box<Sleep>>)>,
    /// Events produced together (error then close) waiting to be handed out
    queued: VecDeque<DriverEvent>,
}

impl TransportDriver {
    /// Driver with no socket and no timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a socket is open.
    pub fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Whether a handshake is in flight.
    pub fn is_connecting(&self) -> bool {
        self.connecting.is_some()
    }

    /// Whether the retry timer is armed.
    pub fn retry_armed(&self) -> bool {
        self.retry.is_some()
    }

    /// Perform actions in order.
    pub async fn execute(&mut self, actions: Vec<ConnectionAction>) {
        for action in actions {
            match action {
                ConnectionAction::OpenTransport { url } => {
                    self.socket = None;
                    self.connecting = Some(Box::pin(open(url)));
                }
                ConnectionAction::CloseTransport => {
                    self.connecting = None;
                    if let Some(mut socket) = self.socket.take() {
                        if let Err(e) = socket.close(None).await {
                            debug!(error = %e, "close handshake failed");
                        }
                    }
                }
                ConnectionAction::Send(bytes) => self.send(bytes).await,
                ConnectionAction::ScheduleRetry { token, delay } => {
                    self.retry = Some((token, Box::pin(sleep(delay))));
                }
                ConnectionAction::CancelRetry => self.retry = None,
                ConnectionAction::Notify(_) => {}
            }
        }
    }

    /// Wait for the next event. Cancel-safe: dropping the future loses nothing.
    ///
    /// Pends forever when there is no socket, no handshake and no timer.
    pub async fn next_event(&mut self) -> DriverEvent {
        loop {
            if let Some(event) = self.queued.pop_front() {
                return event;
            }

            let event = tokio::select! {
                result = wait_connecting(&mut self.connecting) => Some(self.on_connected(result)),
                frame = wait_frame(&mut self.socket) => self.on_frame(frame),
                token = wait_retry(&mut self.retry) => Some(DriverEvent::RetryElapsed(token)),
            };

            if let Some(event) = event {
                return event;
            }
        }
    }

    async fn send(&mut self, bytes: Vec<u8>) {
        let Some(socket) = self.socket.as_mut() else {
            return;
        };
        let message = match String::from_utf8(bytes) {
            Ok(text) => Message::Text(text),
            Err(e) => Message::Binary(e.into_bytes()),
        };
        if let Err(e) = socket.send(message).await {
            self.fail(TransportError::Socket(e));
        }
    }

    fn on_connected(&mut self, result: Result<WsStream, TransportError>) -> DriverEvent {
        match result {
            Ok(stream) => {
                self.socket = Some(stream);
                DriverEvent::Transport(TransportEvent::Opened)
            }
            Err(e) => {
                self.queued
                    .push_back(DriverEvent::Transport(TransportEvent::Closed));
                DriverEvent::Transport(TransportEvent::Error(e.to_string()))
            }
        }
    }

    fn on_frame(
        &mut self,
        frame: Option<Result<Message, tokio_tungstenite::tungstenite::Error>>,
    ) -> Option<DriverEvent> {
        match frame {
            Some(Ok(Message::Text(text))) => Some(DriverEvent::Transport(TransportEvent::Message(
                Payload::Text(text),
            ))),
            Some(Ok(Message::Binary(bytes))) => Some(DriverEvent::Transport(
                TransportEvent::Message(Payload::Binary(bytes)),
            )),
            Some(Ok(Message::Close(frame))) => {
                debug!(?frame, "server closed the socket");
                self.socket = None;
                Some(DriverEvent::Transport(TransportEvent::Closed))
            }
            Some(Ok(_)) => None,
            Some(Err(e)) => {
                self.fail(TransportError::Socket(e));
                self.queued.pop_front()
            }
            None => {
                self.socket = None;
                Some(DriverEvent::Transport(TransportEvent::Closed))
            }
        }
    }

    /// Drop the socket and queue error-then-close.
    fn fail(&mut self, error: TransportError) {
        warn!(error = %error, "websocket failed");
        self.socket = None;
        self.queued
            .push_back(DriverEvent::Transport(TransportEvent::Error(error.to_string())));
        self.queued
            .push_back(DriverEvent::Transport(TransportEvent::Closed));
    }
}

async fn wait_connecting(slot: &mut Option<ConnectFuture>) -> Result<WsStream, TransportError> {
    match slot {
        Some(future) => {
            let result = future.as_mut().await;
            *slot = None;
            result
        }
        None => pending().await,
    }
}

async fn wait_frame(
    slot: &mut Option<WsStream>,
) -> Option<Result<Message, tokio_tungstenite::tungstenite::Error>> {
    match slot {
        Some(socket) => socket.next().await,
        None => pending().await,
    }
}

async fn wait_retry(slot: &mut Option<(RetryToken, Pin<Box<Sleep>>)>) -> RetryToken {
    match slot {
        Some((token, timer)) => {
            timer.as_mut().await;
            let token = *token;
            *slot = None;
            token
        }
        None => pending().await,
    }
}

/// Route one driver event into the panel and execute what it asks for.
pub async fn dispatch<P: StreamPanel + ?Sized>(
    panel: &mut P,
    driver: &mut TransportDriver,
    event: DriverEvent,
) {
    let actions = match event {
        DriverEvent::Transport(event) => panel.on_transport(event),
        DriverEvent::RetryElapsed(token) => panel.on_retry_elapsed(token),
    };
    driver.execute(actions).await;
}
