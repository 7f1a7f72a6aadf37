//! In-memory sinks that record every call.
//!
//! Used to drive panels headlessly and to assert on what a panel told its
//! display to do.

use super::{DisplaySink, TerminalSink};

/// One call made on a [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    /// `set_plain_text`
    PlainText(String),
    /// `set_markup`, or `set_highlighted` serialized
    Markup(String),
    /// `scroll_to_bottom`
    ScrollToBottom,
    /// `scroll_into_view`
    ScrollIntoView(usize),
    /// `set_font_size`
    FontSize(u16),
}

/// [`DisplaySink`] that keeps a call log and the latest content.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<SinkCall>,
}

impl RecordingSink {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call so far, oldest first.
    pub fn calls(&self) -> &[SinkCall] {
        &self.calls
    }

    /// Forget the recorded calls, e.g. between test phases.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Most recent content written, plain or markup.
    pub fn content(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::PlainText(s) | SinkCall::Markup(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// How many times the viewport was pinned to the bottom.
    pub fn scroll_to_bottom_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SinkCall::ScrollToBottom))
            .count()
    }

    /// Most recent font size set, if any.
    pub fn last_font_size(&self) -> Option<u16> {
        self.calls.iter().rev().find_map(|c| match c {
            SinkCall::FontSize(px) => Some(*px),
            _ => None,
        })
    }
}

impl DisplaySink for RecordingSink {
    fn set_plain_text(&mut self, text: &str) {
        self.calls.push(SinkCall::PlainText(text.to_string()));
    }

    fn set_markup(&mut self, markup: &str) {
        self.calls.push(SinkCall::Markup(markup.to_string()));
    }

    fn scroll_to_bottom(&mut self) {
        self.calls.push(SinkCall::ScrollToBottom);
    }

    fn scroll_into_view(&mut self, marker_index: usize) {
        self.calls.push(SinkCall::ScrollIntoView(marker_index));
    }

    fn set_font_size(&mut self, px: u16) {
        self.calls.push(SinkCall::FontSize(px));
    }
}

/// [`TerminalSink`] that accumulates written bytes.
#[derive(Debug, Default)]
pub struct RecordingTerminal {
    output: Vec<u8>,
    writes: usize,
    font_size: Option<u16>,
}

impl RecordingTerminal {
    /// Empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All bytes written, concatenated.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Output decoded as lossy UTF-8.
    pub fn output_lossy(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Number of `write` calls.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Most recent font size set, if any.
    pub fn font_size(&self) -> Option<u16> {
        self.font_size
    }
}

impl TerminalSink for RecordingTerminal {
    fn write(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
        self.writes += 1;
    }

    fn set_font_size(&mut self, px: u16) {
        self.font_size = Some(px);
    }
}
