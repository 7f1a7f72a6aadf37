//! Status bar: connection indicator, follow state, line count and font size.

use super::styles::LogStyles;
use crate::connection::ConnectionState;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

/// Everything the status bar shows, gathered from the panel before drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    /// `mode:container` label
    pub target: String,
    /// Connection lifecycle state
    pub state: ConnectionState,
    /// Whether new lines pull the view down
    pub following: bool,
    /// Lines in the buffer
    pub line_count: usize,
    /// Font size in pixels
    pub font_px: u16,
}

/// Indicator text for a connection state.
pub fn indicator_text(state: ConnectionState) -> &'static str {
    match state {
        ConnectionState::Connected => "● connected",
        ConnectionState::Connecting => "◌ connecting",
        ConnectionState::Disconnected => "○ reconnecting",
        ConnectionState::Closed => "■ closed",
    }
}

/// Render the one-row status line.
pub fn status_line(info: &StatusInfo, styles: &LogStyles) -> Line<'static> {
    let follow = if info.following {
        Span::styled("FOLLOW", Style::default().add_modifier(Modifier::BOLD))
    } else {
        Span::raw("PAUSED")
    };

    Line::from(vec![
        Span::styled(
            format!("[{}]", indicator_text(info.state)),
            styles.connection(info.state),
        ),
        Span::raw(format!(" {} │ ", info.target)),
        follow,
        Span::raw(format!(
            " │ {} lines │ {}px │ q quit  a follow  / search  +/- font",
            info.line_count, info.font_px
        )),
    ])
}
