//! Line history for log mode.
//!
//! Turns raw message payloads into an ordered, append-only sequence of lines.
//! Optionally bounded: when a maximum is configured the oldest lines are
//! dropped first, silently.

use std::collections::VecDeque;

/// Ordered sequence of log lines. Arrival order is display order.
#[derive(Debug, Clone, Default)]
pub struct ContentBuffer {
    lines: VecDeque<String>,
    /// Keep at most this many lines (None = unbounded)
    max_lines: Option<usize>,
    /// Bumped on every mutation so dependents can tell the buffer changed
    revision: u64,
}

impl ContentBuffer {
    /// Create an unbounded buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer that keeps only the newest `max_lines` lines.
    ///
    /// A limit of zero means unbounded.
    pub fn bounded(max_lines: usize) -> Self {
        Self {
            max_lines: (max_lines > 0).then_some(max_lines),
            ..Self::default()
        }
    }

    /// Bounded when `max_lines` is `Some`, unbounded otherwise.
    pub fn with_max_lines(max_lines: Option<usize>) -> Self {
        match max_lines {
            Some(n) => Self::bounded(n),
            None => Self::new(),
        }
    }

    /// Append one payload.
    ///
    /// Splits on `\n` (a trailing `\r` is stripped), drops empty and
    /// whitespace-only fragments, appends the rest in order, then trims to
    /// the configured maximum.
    ///
    /// # Returns
    /// Number of lines appended (before trimming).
    pub fn append_chunk(&mut self, raw: &str) -> usize {
        let before = self.lines.len();
        self.lines.extend(
            raw.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
        let appended = self.lines.len() - before;

        if let Some(max) = self.max_lines {
            while self.lines.len() > max {
                self.lines.pop_front();
            }
        }

        if appended > 0 {
            self.revision += 1;
        }
        appended
    }

    /// Number of stored lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line has been kept.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Line at `index`, oldest first.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// Lines, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.lines.iter().map(String::as_str)
    }

    /// All lines joined with `\n`.
    pub fn joined(&self) -> String {
        self.iter().collect::<Vec<_>>().join("\n")
    }

    /// Configured cap, if any.
    pub fn max_lines(&self) -> Option<usize> {
        self.max_lines
    }

    /// Bumped on every append that changed the lines.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}
