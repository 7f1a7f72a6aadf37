//! Live full-text search over the line buffer.
//!
//! Case-insensitive literal substring matching, non-overlapping and
//! left-to-right within each line. The match set is recomputed from scratch
//! whenever the query or the buffer changes; nothing is diffed.
//!
//! Highlighting is a tokenizing scan driven by the match set: text between
//! matches is emitted plain, matches are emitted as markers. Since markers
//! come straight from the match set, marker N in reading order is match N.

use crate::sink::{HighlightedLine, HighlightedText, Segment, SegmentKind};
use crate::state::ContentBuffer;
use std::ops::Range;
use tracing::debug;

// ===== SearchQuery =====

/// Validated search query. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Smart constructor: the empty string means "no search" and yields `None`.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let s = raw.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// The query as typed.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// ===== SearchMatch =====

/// One occurrence of the query in the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    /// Index of the line in the buffer.
    pub line: usize,
    /// Character offset of the match within the line.
    pub offset: usize,
    /// Byte range of the match within the original line text.
    pub byte_range: Range<usize>,
}

// ===== Case folding =====

/// Lowercased copy of a line with a map back to the original bytes.
struct FoldedText {
    folded: String,
    /// For each byte of `folded`, the start byte of the original char it came from.
    origin: Vec<usize>,
}

impl FoldedText {
    fn new(text: &str) -> Self {
        let mut folded = String::with_capacity(text.len());
        let mut origin = Vec::with_capacity(text.len());
        for (start, ch) in text.char_indices() {
            for lower in ch.to_lowercase() {
                folded.push(lower);
                origin.extend(std::iter::repeat(start).take(lower.len_utf8()));
            }
        }
        Self { folded, origin }
    }

    /// Map a folded byte range back to a byte range of `original`, widened to
    /// whole original chars.
    fn original_range(&self, folded: Range<usize>, original: &str) -> Range<usize> {
        let start = self.origin[folded.start];
        let end = if folded.end >= self.folded.len() {
            original.len()
        } else if self.origin[folded.end] != self.origin[folded.end - 1] {
            self.origin[folded.end]
        } else {
            // Match ends inside one char's lowercase expansion.
            let last = self.origin[folded.end - 1];
            last + original[last..].chars().next().map_or(0, char::len_utf8)
        };
        start..end
    }
}

fn fold_query(query: &str) -> String {
    query.chars().flat_map(char::to_lowercase).collect()
}

/// Find all non-overlapping, case-insensitive occurrences of `folded_query` in `line`.
fn find_in_line(line_index: usize, line: &str, folded_query: &str, out: &mut Vec<SearchMatch>) {
    let text = FoldedText::new(line);
    let mut cursor = 0;
    let mut last_end = 0;

    while let Some(pos) = text.folded[cursor..].find(folded_query) {
        let start = cursor + pos;
        let end = start + folded_query.len();
        let byte_range = text.original_range(start..end, line);

        if byte_range.start >= last_end {
            out.push(SearchMatch {
                line: line_index,
                offset: line[..byte_range.start].chars().count(),
                byte_range: byte_range.clone(),
            });
            last_end = byte_range.end;
        }
        cursor = end;
    }
}

// ===== SearchEngine =====

/// Match set, current match, and highlighted rendering for one log panel.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    query: Option<SearchQuery>,
    folded_query: String,
    matches: Vec<SearchMatch>,
    current: usize,
    /// Buffer revision the match set was computed against
    scanned_revision: Option<u64>,
}

impl SearchEngine {
    /// Inactive engine with no query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the query and rescan. An empty query clears the search.
    ///
    /// Resets the current match to the first one.
    pub fn set_query(&mut self, raw: &str, buffer: &ContentBuffer) {
        match SearchQuery::new(raw) {
            None => self.clear(),
            Some(query) => {
                self.folded_query = fold_query(query.as_str());
                self.query = Some(query);
                self.rescan(buffer);
            }
        }
    }

    /// Rescan with the current query (no-op when inactive).
    pub fn resync(&mut self, buffer: &ContentBuffer) {
        if self.query.is_some() {
            self.rescan(buffer);
        }
    }

    /// Whether the match set was computed against an older buffer.
    pub fn is_stale(&self, buffer: &ContentBuffer) -> bool {
        self.query.is_some() && self.scanned_revision != Some(buffer.revision())
    }

    /// Drop the query and all matches.
    pub fn clear(&mut self) {
        self.query = None;
        self.folded_query.clear();
        self.matches.clear();
        self.current = 0;
        self.scanned_revision = None;
    }

    /// Whether a non-empty query is set.
    pub fn is_active(&self) -> bool {
        self.query.is_some()
    }

    /// Active query text, or `""` when inactive.
    pub fn query(&self) -> &str {
        self.query.as_ref().map_or("", SearchQuery::as_str)
    }

    /// All matches in reading order.
    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    /// Whether the match set is non-empty.
    pub fn has_matches(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Index of the current match, `None` when the match set is empty.
    pub fn current_index(&self) -> Option<usize> {
        (!self.matches.is_empty()).then_some(self.current)
    }

    /// The match at the current index.
    pub fn current_match(&self) -> Option<&SearchMatch> {
        self.current_index().map(|i| &self.matches[i])
    }

    /// Advance to the next match, wrapping to the first.
    ///
    /// Returns false (and does nothing) when there are no matches.
    pub fn next(&mut self) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        self.current = (self.current + 1) % self.matches.len();
        true
    }

    /// Retreat to the previous match, wrapping to the last.
    ///
    /// Returns false (and does nothing) when there are no matches.
    pub fn previous(&mut self) -> bool {
        if self.matches.is_empty() {
            return false;
        }
        self.current = if self.current == 0 {
            self.matches.len() - 1
        } else {
            self.current - 1
        };
        true
    }

    /// Render the buffer with match markers.
    ///
    /// Resynchronizes first if the buffer changed since the last scan. With no
    /// active query every line is a single plain segment.
    pub fn highlight(&mut self, buffer: &ContentBuffer) -> HighlightedText {
        if self.is_stale(buffer) {
            self.rescan(buffer);
        }

        let mut pending = self.matches.iter().enumerate().peekable();
        let lines = buffer
            .iter()
            .enumerate()
            .map(|(line_index, text)| {
                let mut segments: HighlightedLine = Vec::new();
                let mut cursor = 0;

                while let Some((match_index, m)) = pending.next_if(|(_, m)| m.line == line_index) {
                    if m.byte_range.start > cursor {
                        segments.push(Segment::plain(&text[cursor..m.byte_range.start]));
                    }
                    let kind = if match_index == self.current {
                        SegmentKind::CurrentMatch
                    } else {
                        SegmentKind::Match
                    };
                    segments.push(Segment {
                        text: text[m.byte_range.clone()].to_string(),
                        kind,
                    });
                    cursor = m.byte_range.end;
                }

                if cursor < text.len() {
                    segments.push(Segment::plain(&text[cursor..]));
                }
                segments
            })
            .collect();

        HighlightedText::new(lines)
    }

    /// Markup rendering of the whole buffer: text escaped, matches wrapped in
    /// current/other match spans.
    pub fn highlight_render(&mut self, buffer: &ContentBuffer) -> String {
        self.highlight(buffer).to_markup()
    }

    fn rescan(&mut self, buffer: &ContentBuffer) {
        self.matches.clear();
        self.current = 0;
        for (line_index, line) in buffer.iter().enumerate() {
            find_in_line(line_index, line, &self.folded_query, &mut self.matches);
        }
        self.scanned_revision = Some(buffer.revision());
        debug!(query = %self.query(), matches = self.matches.len(), lines = buffer.len(), "search rescanned");
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
