//! `DisplaySink` backed by an in-memory line model that ratatui draws from.
//!
//! The sink keeps the rendered lines, the top visible line and the viewport
//! height. Geometry handed back to the panel is in pixel-like units (rows
//! times font size) so the bottom tolerance means the same thing it does in
//! a browser.

use crate::sink::{DisplaySink, HighlightedLine, HighlightedText, Segment};
use tracing::trace;

/// `DisplaySink` that keeps rendered lines and a viewport for ratatui.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuiSink {
    lines: Vec<HighlightedLine>,
    /// Line index of each match marker, in marker order
    marker_lines: Vec<usize>,
    offset: usize,
    viewport_height: usize,
    /// Re-pin to the bottom when the viewport changes size
    pinned: bool,
    font_px: u16,
}

impl Default for TuiSink {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiSink {
    /// Empty sink with a zero-height viewport.
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            marker_lines: Vec::new(),
            offset: 0,
            viewport_height: 0,
            pinned: false,
            font_px: crate::state::DEFAULT_FONT_SIZE,
        }
    }

    // ===== Read side (renderer) =====

    /// All rendered lines.
    pub fn lines(&self) -> &[HighlightedLine] {
        &self.lines
    }

    /// Number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Index of the top visible line.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Visible rows.
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Font size last set by the panel.
    pub fn font_px(&self) -> u16 {
        self.font_px
    }

    /// Lines currently inside the viewport.
    pub fn visible_lines(&self) -> &[HighlightedLine] {
        let start = self.offset.min(self.lines.len());
        let end = (start + self.viewport_height).min(self.lines.len());
        &self.lines[start..end]
    }

    /// `(viewport_top, viewport_height, content_height)` for `on_user_scroll`.
    pub fn geometry(&self) -> (f64, f64, f64) {
        let px = f64::from(self.font_px.max(1));
        (
            self.offset as f64 * px,
            self.viewport_height as f64 * px,
            self.lines.len() as f64 * px,
        )
    }

    // ===== Viewport control (user input) =====

    /// Resize the viewport. Stays on the newest line while pinned.
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
        if self.pinned {
            self.offset = self.max_offset();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Move the viewport by `delta` lines (negative is up).
    pub fn scroll_by(&mut self, delta: isize) {
        self.pinned = false;
        let target = if delta < 0 {
            self.offset.saturating_sub(delta.unsigned_abs())
        } else {
            self.offset.saturating_add(delta.unsigned_abs())
        };
        self.offset = target.min(self.max_offset());
    }

    /// Up one page.
    pub fn page_up(&mut self) {
        self.scroll_by(-(self.page_size() as isize));
    }

    /// Down one page.
    pub fn page_down(&mut self) {
        self.scroll_by(self.page_size() as isize);
    }

    /// Jump to the first line.
    pub fn scroll_to_top(&mut self) {
        self.pinned = false;
        self.offset = 0;
    }

    /// User-driven jump to the end. Unlike `scroll_to_bottom` this does not
    /// pin; the panel decides about following from the reported geometry.
    pub fn scroll_to_end(&mut self) {
        self.pinned = false;
        self.offset = self.max_offset();
    }

    /// Stop re-pinning to the bottom on resize. Used once auto-follow is off.
    pub fn unpin(&mut self) {
        self.pinned = false;
    }

    /// Whether resizes keep the viewport on the newest line.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    fn page_size(&self) -> usize {
        self.viewport_height.saturating_sub(1).max(1)
    }

    fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.viewport_height)
    }

    fn replace_lines(&mut self, lines: Vec<HighlightedLine>, marker_lines: Vec<usize>) {
        self.lines = lines;
        self.marker_lines = marker_lines;
        self.offset = self.offset.min(self.max_offset());
    }
}

fn plain_lines(text: &str) -> Vec<HighlightedLine> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(|line| vec![Segment::plain(line)]).collect()
}

impl DisplaySink for TuiSink {
    fn set_plain_text(&mut self, text: &str) {
        self.replace_lines(plain_lines(text), Vec::new());
    }

    /// Markup can't be styled cell by cell; shown verbatim.
    fn set_markup(&mut self, markup: &str) {
        self.replace_lines(plain_lines(markup), Vec::new());
    }

    fn set_highlighted(&mut self, text: &HighlightedText) {
        self.replace_lines(text.lines().to_vec(), text.marker_lines());
    }

    fn scroll_to_bottom(&mut self) {
        self.pinned = true;
        self.offset = self.max_offset();
    }

    fn scroll_into_view(&mut self, marker_index: usize) {
        let Some(&line) = self.marker_lines.get(marker_index) else {
            return;
        };
        self.pinned = false;
        self.offset = line
            .saturating_sub(self.viewport_height / 2)
            .min(self.max_offset());
        trace!(marker_index, line, offset = self.offset, "match scrolled into view");
    }

    fn set_font_size(&mut self, px: u16) {
        self.font_px = px;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::SegmentKind;

    fn sink_with(lines: usize, height: usize) -> TuiSink {
        let mut sink = TuiSink::new();
        sink.set_viewport_height(height);
        let text: Vec<String> = (0..lines).map(|i| format!("line {i}")).collect();
        sink.set_plain_text(&text.join("\n"));
        sink
    }

    #[test]
    fn empty_text_has_no_lines() {
        let mut sink = TuiSink::new();
        sink.set_plain_text("");
        assert_eq!(sink.line_count(), 0);
    }

    #[test]
    fn scroll_to_bottom_shows_last_page_and_survives_resize() {
        let mut sink = sink_with(100, 10);
        sink.scroll_to_bottom();
        assert_eq!(sink.offset(), 90);

        sink.set_viewport_height(20);
        assert_eq!(sink.offset(), 80, "pinned viewport follows a resize");
    }

    #[test]
    fn scroll_by_clamps_both_ends() {
        let mut sink = sink_with(30, 10);
        sink.scroll_by(-5);
        assert_eq!(sink.offset(), 0);
        sink.scroll_by(500);
        assert_eq!(sink.offset(), 20);
    }

    #[test]
    fn geometry_scales_rows_by_font() {
        let mut sink = sink_with(100, 10);
        sink.set_font_size(10);
        sink.scroll_by(40);
        assert_eq!(sink.geometry(), (400.0, 100.0, 1000.0));
    }

    #[test]
    fn visible_lines_window() {
        let mut sink = sink_with(5, 2);
        sink.scroll_by(1);
        let visible: Vec<&str> = sink
            .visible_lines()
            .iter()
            .map(|l| l[0].text.as_str())
            .collect();
        assert_eq!(visible, vec!["line 1", "line 2"]);
    }

    #[test]
    fn scroll_into_view_centers_marker_line() {
        let mut sink = sink_with(0, 10);
        let mut lines: Vec<HighlightedLine> =
            (0..100).map(|i| vec![Segment::plain(format!("l{i}"))]).collect();
        lines[60] = vec![Segment {
            text: "hit".to_string(),
            kind: SegmentKind::CurrentMatch,
        }];
        sink.set_highlighted(&HighlightedText::new(lines));

        sink.scroll_into_view(0);

        assert_eq!(sink.offset(), 55);
    }

    #[test]
    fn scroll_into_view_unknown_marker_is_ignored() {
        let mut sink = sink_with(50, 10);
        sink.scroll_to_top();
        sink.scroll_into_view(3);
        assert_eq!(sink.offset(), 0);
    }

    #[test]
    fn unpinned_sink_keeps_offset_on_resize() {
        let mut sink = sink_with(50, 10);
        sink.scroll_to_bottom();
        assert!(sink.is_pinned());

        sink.unpin();
        sink.set_plain_text(&(0..80).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n"));
        sink.set_viewport_height(10);

        assert_eq!(sink.offset(), 40);
    }

    #[test]
    fn highlighted_markers_map_to_their_lines() {
        let mut sink = sink_with(0, 10);
        let marker = |kind| Segment {
            text: "e".to_string(),
            kind,
        };
        let lines: Vec<HighlightedLine> = (0..1_000)
            .map(|i| {
                if i % 100 == 0 {
                    vec![marker(SegmentKind::Match), Segment::plain(" "), marker(SegmentKind::Match)]
                } else {
                    vec![Segment::plain(format!("l{i}"))]
                }
            })
            .collect();
        sink.set_highlighted(&HighlightedText::new(lines));

        sink.scroll_into_view(19);
        assert_eq!(sink.offset(), 900 - 5);
        sink.scroll_into_view(1);
        assert_eq!(sink.offset(), 0);
    }

    #[test]
    fn user_jump_to_end_does_not_pin() {
        let mut sink = sink_with(50, 10);
        sink.scroll_to_end();
        assert_eq!(sink.offset(), 40);
        sink.set_viewport_height(5);
        assert_eq!(sink.offset(), 40);
    }
}
