//! Display boundary.
//!
//! The panel core writes through these traits and never reads layout state
//! back; scroll geometry only comes in through `LogPanel::on_user_scroll`.

pub mod markup;
pub mod recording;

pub use markup::{escape_markup, HighlightedLine, HighlightedText, Segment, SegmentKind};
pub use recording::{RecordingSink, RecordingTerminal, SinkCall};

/// Write-only rendering target for log mode.
pub trait DisplaySink {
    /// Replace the content with unhighlighted text.
    fn set_plain_text(&mut self, text: &str);

    /// Replace the content with markup (escaped text plus match spans).
    fn set_markup(&mut self, markup: &str);

    /// Replace the content with a highlighted render.
    ///
    /// Sinks that can style segments directly override this; the default
    /// serializes to markup.
    fn set_highlighted(&mut self, text: &HighlightedText) {
        self.set_markup(&text.to_markup());
    }

    /// Pin the viewport to the newest content.
    fn scroll_to_bottom(&mut self);

    /// Bring the `marker_index`-th match marker into view, centered.
    fn scroll_into_view(&mut self, marker_index: usize);

    /// Apply a new font size in pixels.
    fn set_font_size(&mut self, px: u16);
}

/// Opaque terminal emulator for terminal mode.
///
/// Bytes are written through uninterpreted. Keystrokes travel the other way
/// through `TerminalPanel::send_input`.
pub trait TerminalSink {
    /// Write bytes to the emulator as received.
    fn write(&mut self, bytes: &[u8]);

    /// Apply a new font size in pixels.
    fn set_font_size(&mut self, px: u16);
}
