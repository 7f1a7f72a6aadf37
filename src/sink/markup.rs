//! Highlighted render model and its markup serialization.
//!
//! The search engine produces a [`HighlightedText`]: the buffer's lines split
//! into plain and marked segments. Sinks that understand structure (the TUI)
//! style the segments directly; sinks that only take markup use
//! [`HighlightedText::to_markup`].

/// Class attribute for the match at the current index.
pub const CURRENT_MATCH_CLASS: &str = "match current";
/// Class attribute for every other match.
pub const OTHER_MATCH_CLASS: &str = "match";

/// How a segment should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Ordinary text.
    Plain,
    /// A match other than the current one.
    Match,
    /// The match at the current index.
    CurrentMatch,
}

/// A run of text with a single style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Raw (unescaped) text.
    pub text: String,
    /// Style of this run.
    pub kind: SegmentKind,
}

impl Segment {
    /// Unstyled segment.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: SegmentKind::Plain,
        }
    }

    /// Whether this segment is a match marker.
    pub fn is_marker(&self) -> bool {
        self.kind != SegmentKind::Plain
    }
}

/// One display line made of segments, in left-to-right order.
pub type HighlightedLine = Vec<Segment>;

/// The whole buffer, line by line, with match markers.
///
/// Markers appear in the same order as the match set they were built from, so
/// the Nth marker in reading order is match N.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightedText {
    lines: Vec<HighlightedLine>,
}

impl HighlightedText {
    /// Wrap rendered lines.
    pub fn new(lines: Vec<HighlightedLine>) -> Self {
        Self { lines }
    }

    /// Rendered lines in buffer order.
    pub fn lines(&self) -> &[HighlightedLine] {
        &self.lines
    }

    /// Number of match markers across all lines.
    pub fn marker_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|line| line.iter())
            .filter(|s| s.is_marker())
            .count()
    }

    /// Line index of every marker, in marker order. One pass over the lines.
    pub fn marker_lines(&self) -> Vec<usize> {
        self.lines
            .iter()
            .enumerate()
            .flat_map(|(line_index, line)| {
                line.iter()
                    .filter(|s| s.is_marker())
                    .map(move |_| line_index)
            })
            .collect()
    }

    /// Serialize to markup: text escaped, markers wrapped in classed spans,
    /// lines joined with `\n`.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            for segment in line {
                match segment.kind {
                    SegmentKind::Plain => escape_into(&segment.text, &mut out),
                    SegmentKind::Match | SegmentKind::CurrentMatch => {
                        let class = if segment.kind == SegmentKind::CurrentMatch {
                            CURRENT_MATCH_CLASS
                        } else {
                            OTHER_MATCH_CLASS
                        };
                        out.push_str("<span class=\"");
                        out.push_str(class);
                        out.push_str("\">");
                        escape_into(&segment.text, &mut out);
                        out.push_str("</span>");
                    }
                }
            }
        }
        out
    }
}

/// Escape the characters with syntactic meaning in the output markup.
pub fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marked(text: &str, kind: SegmentKind) -> Segment {
        Segment {
            text: text.to_string(),
            kind,
        }
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_markup("a<b> & c"), "a&lt;b&gt; &amp; c");
    }

    #[test]
    fn markup_wraps_markers_with_distinct_classes() {
        let text = HighlightedText::new(vec![vec![
            marked("err", SegmentKind::CurrentMatch),
            Segment::plain(" <x> "),
            marked("ERR", SegmentKind::Match),
        ]]);

        assert_eq!(
            text.to_markup(),
            "<span class=\"match current\">err</span> &lt;x&gt; <span class=\"match\">ERR</span>"
        );
    }

    #[test]
    fn lines_are_joined_with_newline() {
        let text = HighlightedText::new(vec![
            vec![Segment::plain("one")],
            vec![Segment::plain("two")],
        ]);
        assert_eq!(text.to_markup(), "one\ntwo");
    }

    #[test]
    fn marker_lines_follow_marker_order() {
        let text = HighlightedText::new(vec![
            vec![marked("a", SegmentKind::Match), marked("a", SegmentKind::Match)],
            vec![Segment::plain("none")],
            vec![marked("a", SegmentKind::CurrentMatch)],
        ]);

        assert_eq!(text.marker_count(), 3);
        assert_eq!(text.marker_lines(), vec![0, 0, 2]);
    }
}
