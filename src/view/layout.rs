//! Log view layout and rendering.
//!
//! Pure: reads the panel and sink, draws into a frame. The viewport height
//! the sink needs is computed from the same split so the two never disagree.

use super::search_input::{SearchBar, SearchInput};
use super::status_bar::{status_line, StatusInfo};
use super::styles::LogStyles;
use super::tui_sink::TuiSink;
use crate::sink::HighlightedLine;
use crate::state::{LogPanel, StreamPanel};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SEARCH_BAR_HEIGHT: u16 = 3;

/// Areas of the log view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLayout {
    /// Bordered log view.
    pub content: Rect,
    /// Search bar, when shown.
    pub search: Option<Rect>,
    /// One-row status bar.
    pub status: Rect,
}

impl LogLayout {
    /// Divide `area` top to bottom.
    pub fn split(area: Rect, search_visible: bool) -> Self {
        let search_height = if search_visible { SEARCH_BAR_HEIGHT } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),                // Log content
                Constraint::Length(search_height), // Search bar
                Constraint::Length(1),             // Status bar
            ])
            .split(area);

        Self {
            content: chunks[0],
            search: search_visible.then_some(chunks[1]),
            status: chunks[2],
        }
    }

    /// Rows of log text visible inside the bordered content block.
    pub fn viewport_rows(&self) -> usize {
        usize::from(self.content.height.saturating_sub(2))
    }
}

fn is_notice(line: &HighlightedLine) -> bool {
    match line.as_slice() {
        [only] => only.text.starts_with("--- ") && only.text.ends_with(" ---"),
        _ => false,
    }
}

fn to_line(line: &HighlightedLine, styles: &LogStyles) -> Line<'static> {
    if is_notice(line) {
        return Line::styled(line[0].text.clone(), styles.notice());
    }
    Line::from(
        line.iter()
            .map(|segment| Span::styled(segment.text.clone(), styles.segment(segment.kind)))
            .collect::<Vec<_>>(),
    )
}

/// Draw the whole log view.
pub fn render_log_view(
    frame: &mut Frame,
    panel: &LogPanel<TuiSink>,
    input: &SearchInput,
    styles: &LogStyles,
) {
    let layout = LogLayout::split(frame.area(), panel.search_visible());
    let sink = panel.sink();

    let lines: Vec<Line<'static>> = sink
        .visible_lines()
        .iter()
        .map(|line| to_line(line, styles))
        .collect();

    let title = format!(" {} ", panel.target());
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title)),
        layout.content,
    );

    if let Some(search_area) = layout.search {
        let search = panel.search();
        frame.render_widget(
            SearchBar::new(input, search.current_index(), search.matches().len()),
            search_area,
        );
    }

    let info = StatusInfo {
        target: panel.target().to_string(),
        state: panel.connection_state(),
        following: panel.scroll().is_following(),
        line_count: panel.buffer().len(),
        font_px: panel.font_size(),
    };
    frame.render_widget(Paragraph::new(status_line(&info, styles)), layout.status);
}
