//! Search bar: the editable query line and its widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Editable query text with a cursor counted in chars.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchInput {
    query: String,
    cursor: usize,
}

impl SearchInput {
    /// Empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text typed so far.
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.query
            .char_indices()
            .nth(char_index)
            .map_or(self.query.len(), |(i, _)| i)
    }

    /// Insert at the cursor.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_index(self.cursor);
        self.query.insert(at, ch);
        self.cursor += 1;
    }

    /// Delete the char before the cursor. Returns whether the query changed.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_index(self.cursor);
        self.query.remove(at);
        true
    }

    /// Cursor one char left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Cursor one char right.
    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.query.chars().count());
    }

    /// Empty the input.
    pub fn clear(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }
}

/// Search bar widget showing the query, a block cursor and `current/total`.
pub struct SearchBar<'a> {
    input: &'a SearchInput,
    current: Option<usize>,
    total: usize,
}

impl<'a> SearchBar<'a> {
    /// Bar for `input` showing `current` of `total` matches.
    pub fn new(input: &'a SearchInput, current: Option<usize>, total: usize) -> Self {
        Self {
            input,
            current,
            total,
        }
    }

    fn title(&self) -> String {
        match self.current {
            Some(index) => format!("Search {}/{}", index + 1, self.total),
            None if self.input.query().is_empty() => "Search".to_string(),
            None => "Search (no matches)".to_string(),
        }
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let query = self.input.query();
        let cursor = self.input.cursor();

        let before: String = query.chars().take(cursor).collect();
        let mut rest = query.chars().skip(cursor);
        let under_cursor = rest.next().map_or_else(|| " ".to_string(), String::from);
        let after: String = rest.collect();

        let line = Line::from(vec![
            Span::raw(before),
            Span::styled(
                under_cursor,
                Style::default()
                    .bg(Color::White)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(after),
        ]);

        Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL).title(self.title()))
            .render(area, buf);
    }
}
