//! Log view styling.
//!
//! Match highlights, notice lines and the connection indicator.

use crate::connection::ConnectionState;
use crate::sink::SegmentKind;
use ratatui::style::{Color, Modifier, Style};

// ===== ColorConfig =====

/// Whether color output is enabled.
///
/// Disabled by the `--no-color` flag or a `NO_COLOR` environment variable
/// (any value).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorConfig {
    enabled: bool,
}

impl ColorConfig {
    /// Colors on unless `--no-color` or `NO_COLOR` is set.
    pub fn from_env_and_args(no_color_flag: bool) -> Self {
        let enabled = !no_color_flag && std::env::var_os("NO_COLOR").is_none();
        Self { enabled }
    }

    /// Whether styles carry colors.
    pub fn colors_enabled(self) -> bool {
        self.enabled
    }
}

// ===== LogStyles =====

/// Styles for the log view. Without colors, matches fall back to
/// reverse/underline so they stay visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogStyles {
    current_match: Style,
    other_match: Style,
    notice: Style,
    connected: Style,
    connecting: Style,
    disconnected: Style,
    closed: Style,
}

impl LogStyles {
    /// Palette for `config`.
    pub fn with_color_config(config: ColorConfig) -> Self {
        if config.colors_enabled() {
            Self {
                current_match: Style::default()
                    .bg(Color::Rgb(255, 150, 50))
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
                other_match: Style::default().bg(Color::Yellow).fg(Color::Black),
                notice: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                connected: Style::default().fg(Color::Green),
                connecting: Style::default().fg(Color::Yellow),
                disconnected: Style::default().fg(Color::Red),
                closed: Style::default().fg(Color::DarkGray),
            }
        } else {
            Self {
                current_match: Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
                other_match: Style::default().add_modifier(Modifier::UNDERLINED),
                notice: Style::default().add_modifier(Modifier::ITALIC),
                connected: Style::default(),
                connecting: Style::default(),
                disconnected: Style::default().add_modifier(Modifier::BOLD),
                closed: Style::default(),
            }
        }
    }

    /// Style for a highlighted segment.
    pub fn segment(&self, kind: SegmentKind) -> Style {
        match kind {
            SegmentKind::Plain => Style::default(),
            SegmentKind::Match => self.other_match,
            SegmentKind::CurrentMatch => self.current_match,
        }
    }

    /// Style for connection notice lines (`--- ... ---`).
    pub fn notice(&self) -> Style {
        self.notice
    }

    /// Style of the connection indicator.
    pub fn connection(&self, state: ConnectionState) -> Style {
        match state {
            ConnectionState::Connected => self.connected,
            ConnectionState::Connecting => self.connecting,
            ConnectionState::Disconnected => self.disconnected,
            ConnectionState::Closed => self.closed,
        }
    }
}

impl Default for LogStyles {
    fn default() -> Self {
        Self::with_color_config(ColorConfig::from_env_and_args(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(no_color)]
    fn color_config_respects_no_color_flag() {
        let config = ColorConfig::from_env_and_args(true);
        assert!(!config.colors_enabled(), "--no-color flag should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_no_color_env_any_value_disables() {
        std::env::set_var("NO_COLOR", "");
        let config = ColorConfig::from_env_and_args(false);
        std::env::remove_var("NO_COLOR");
        assert!(!config.colors_enabled(), "NO_COLOR with empty string should disable colors");
    }

    #[test]
    #[serial(no_color)]
    fn color_config_enables_colors_by_default() {
        std::env::remove_var("NO_COLOR");
        assert!(ColorConfig::from_env_and_args(false).colors_enabled());
    }

    #[test]
    fn current_and_other_matches_differ_with_and_without_color() {
        for enabled in [true, false] {
            let styles = LogStyles::with_color_config(ColorConfig { enabled });
            assert_ne!(
                styles.segment(SegmentKind::CurrentMatch),
                styles.segment(SegmentKind::Match)
            );
            assert_ne!(styles.segment(SegmentKind::Match), Style::default());
        }
    }

    #[test]
    fn connection_colors_follow_state() {
        let styles = LogStyles::with_color_config(ColorConfig { enabled: true });
        assert_eq!(styles.connection(ConnectionState::Connected).fg, Some(Color::Green));
        assert_eq!(styles.connection(ConnectionState::Disconnected).fg, Some(Color::Red));
    }
}
