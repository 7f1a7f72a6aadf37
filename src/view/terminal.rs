//! Terminal mode: raw pass-through between the local tty and a container shell.
//!
//! Output bytes go to stdout uninterpreted; the local terminal is the
//! emulator. Keystrokes are encoded back into the byte sequences a shell
//! expects. Ctrl+] detaches.

use super::{TerminalGuard, TuiError};
use crate::model::{Endpoint, StreamTarget};
use crate::sink::TerminalSink;
use crate::state::{PanelOptions, StreamPanel, TerminalPanel};
use crate::transport::{dispatch, TransportDriver};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures_util::StreamExt;
use std::io::{self, Write};
use tracing::{debug, info, warn};

/// `TerminalSink` writing straight to stdout.
pub struct StdoutTerminal {
    out: io::Stdout,
    font_px: Option<u16>,
}

impl Default for StdoutTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl StdoutTerminal {
    /// Sink on the process's stdout.
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            font_px: None,
        }
    }

    /// Last font size the panel asked for.
    pub fn font_px(&self) -> Option<u16> {
        self.font_px
    }
}

impl TerminalSink for StdoutTerminal {
    fn write(&mut self, bytes: &[u8]) {
        let result = self.out.write_all(bytes).and_then(|()| self.out.flush());
        if let Err(e) = result {
            warn!(error = %e, len = bytes.len(), "stdout write failed");
        }
    }

    /// The host terminal owns its font; the size is only recorded.
    fn set_font_size(&mut self, px: u16) {
        debug!(px, "terminal font size");
        self.font_px = Some(px);
    }
}

/// Ctrl+]. Raw-mode terminals report it either as `]` or, from the 0x1d
/// byte, as `5`.
pub fn is_detach(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(']') | KeyCode::Char('5'))
}

fn control_byte(c: char) -> Option<u8> {
    match c {
        'a'..='z' => Some(c as u8 - b'a' + 1),
        'A'..='Z' => Some(c as u8 - b'A' + 1),
        '@' | ' ' | '2' => Some(0x00),
        '[' | '3' => Some(0x1b),
        '\\' | '4' => Some(0x1c),
        ']' | '5' => Some(0x1d),
        '^' | '6' => Some(0x1e),
        '_' | '7' => Some(0x1f),
        '?' | '8' => Some(0x7f),
        _ => None,
    }
}

fn function_key(n: u8) -> Option<&'static [u8]> {
    let seq: &'static [u8] = match n {
        1 => b"\x1bOP",
        2 => b"\x1bOQ",
        3 => b"\x1bOR",
        4 => b"\x1bOS",
        5 => b"\x1b[15~",
        6 => b"\x1b[17~",
        7 => b"\x1b[18~",
        8 => b"\x1b[19~",
        9 => b"\x1b[20~",
        10 => b"\x1b[21~",
        11 => b"\x1b[23~",
        12 => b"\x1b[24~",
        _ => return None,
    };
    Some(seq)
}

/// Bytes a VT100-style terminal would send for `key`, or `None` for keys
/// with no encoding.
pub fn encode_key(key: &KeyEvent) -> Option<Vec<u8>> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let bytes = match key.code {
        KeyCode::Char(c) if ctrl => vec![control_byte(c)?],
        KeyCode::Char(c) => {
            let mut buf = [0u8; 4];
            c.encode_utf8(&mut buf).as_bytes().to_vec()
        }
        KeyCode::Enter => b"\r".to_vec(),
        KeyCode::Backspace => vec![0x7f],
        KeyCode::Tab => b"\t".to_vec(),
        KeyCode::BackTab => b"\x1b[Z".to_vec(),
        KeyCode::Esc => vec![0x1b],
        KeyCode::Up => b"\x1b[A".to_vec(),
        KeyCode::Down => b"\x1b[B".to_vec(),
        KeyCode::Right => b"\x1b[C".to_vec(),
        KeyCode::Left => b"\x1b[D".to_vec(),
        KeyCode::Home => b"\x1b[H".to_vec(),
        KeyCode::End => b"\x1b[F".to_vec(),
        KeyCode::PageUp => b"\x1b[5~".to_vec(),
        KeyCode::PageDown => b"\x1b[6~".to_vec(),
        KeyCode::Insert => b"\x1b[2~".to_vec(),
        KeyCode::Delete => b"\x1b[3~".to_vec(),
        KeyCode::F(n) => function_key(n)?.to_vec(),
        _ => return None,
    };

    if alt {
        let mut prefixed = Vec::with_capacity(bytes.len() + 1);
        prefixed.push(0x1b);
        prefixed.extend(bytes);
        Some(prefixed)
    } else {
        Some(bytes)
    }
}

/// Attach the local terminal to a container shell until Ctrl+] or EOF.
pub async fn run_terminal(
    endpoint: &Endpoint,
    target: StreamTarget,
    options: &PanelOptions,
) -> Result<(), TuiError> {
    let _guard = TerminalGuard::enter(false)?;
    let mut panel = TerminalPanel::new(endpoint, target, options, StdoutTerminal::new());
    let mut driver = TransportDriver::new();
    let mut events = EventStream::new();

    info!(target = %panel.target(), "attaching terminal");
    let actions = panel.start();
    driver.execute(actions).await;

    let result = loop {
        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind != KeyEventKind::Release => {
                    if is_detach(&key) {
                        break Ok(());
                    }
                    if let Some(bytes) = encode_key(&key) {
                        let actions = panel.send_input(bytes);
                        driver.execute(actions).await;
                    }
                }
                Some(Ok(Event::Paste(text))) => {
                    let actions = panel.send_input(text.into_bytes());
                    driver.execute(actions).await;
                }
                Some(Ok(Event::FocusGained)) => {
                    let actions = panel.on_visibility_regained();
                    driver.execute(actions).await;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => break Err(TuiError::from(e)),
                None => break Ok(()),
            },
            event = driver.next_event() => dispatch(&mut panel, &mut driver, event).await,
        }
    };

    info!(target = %panel.target(), "detaching terminal");
    let actions = panel.destroy();
    driver.execute(actions).await;
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn printable_chars_are_utf8() {
        assert_eq!(
            encode_key(&press(KeyCode::Char('é'), KeyModifiers::NONE)),
            Some("é".as_bytes().to_vec())
        );
        assert_eq!(
            encode_key(&press(KeyCode::Char('L'), KeyModifiers::SHIFT)),
            Some(b"L".to_vec())
        );
    }

    #[test]
    fn control_letters_map_to_c0() {
        assert_eq!(encode_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(vec![0x03]));
        assert_eq!(encode_key(&press(KeyCode::Char('d'), KeyModifiers::CONTROL)), Some(vec![0x04]));
        assert_eq!(encode_key(&press(KeyCode::Char('@'), KeyModifiers::CONTROL)), Some(vec![0x00]));
    }

    #[test]
    fn enter_is_carriage_return() {
        assert_eq!(encode_key(&press(KeyCode::Enter, KeyModifiers::NONE)), Some(b"\r".to_vec()));
    }

    #[test]
    fn arrows_and_function_keys_are_escape_sequences() {
        assert_eq!(encode_key(&press(KeyCode::Up, KeyModifiers::NONE)), Some(b"\x1b[A".to_vec()));
        assert_eq!(encode_key(&press(KeyCode::F(1), KeyModifiers::NONE)), Some(b"\x1bOP".to_vec()));
        assert_eq!(encode_key(&press(KeyCode::F(12), KeyModifiers::NONE)), Some(b"\x1b[24~".to_vec()));
        assert_eq!(encode_key(&press(KeyCode::F(13), KeyModifiers::NONE)), None);
    }

    #[test]
    fn alt_prefixes_escape() {
        assert_eq!(
            encode_key(&press(KeyCode::Char('b'), KeyModifiers::ALT)),
            Some(b"\x1bb".to_vec())
        );
    }

    #[test]
    fn ctrl_bracket_detaches_in_both_spellings() {
        assert!(is_detach(&press(KeyCode::Char(']'), KeyModifiers::CONTROL)));
        assert!(is_detach(&press(KeyCode::Char('5'), KeyModifiers::CONTROL)));
        assert!(!is_detach(&press(KeyCode::Char(']'), KeyModifiers::NONE)));
    }

    #[test]
    fn keys_without_encoding_are_skipped() {
        assert_eq!(encode_key(&press(KeyCode::CapsLock, KeyModifiers::NONE)), None);
        assert_eq!(encode_key(&press(KeyCode::Char('é'), KeyModifiers::CONTROL)), None);
    }
}
