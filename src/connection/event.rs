//! Transport-agnostic socket events delivered to a panel.

/// Body of one inbound websocket message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// UTF-8 text frame.
    Text(String),
    /// Binary frame.
    Binary(Vec<u8>),
}

impl Payload {
    /// Text view of the payload; binary frames are decoded lossily.
    pub fn to_text(&self) -> std::borrow::Cow<'_, str> {
        match self {
            Payload::Text(s) => std::borrow::Cow::Borrowed(s.as_str()),
            Payload::Binary(b) => String::from_utf8_lossy(b),
        }
    }

    /// Raw bytes, untouched.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Text(s) => s.as_bytes(),
            Payload::Binary(b) => b,
        }
    }

    /// Empty or whitespace-only payloads carry nothing to display.
    pub fn is_blank(&self) -> bool {
        self.to_text().trim().is_empty()
    }
}

/// What the socket did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake complete.
    Opened,
    /// A frame arrived.
    Message(Payload),
    /// The socket is gone (peer close, handshake failure, or read error).
    Closed,
    /// Reported before `Closed` when the socket failed; carries a description for logs.
    Error(String),
}
