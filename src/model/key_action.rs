//! Domain-level keyboard actions independent of key bindings.

/// Domain-level actions for the log viewer.
///
/// These represent user intent, not specific keys. The mapping from
/// `crossterm::event::KeyEvent` to `KeyAction` is handled by `KeyBindings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Scrolling
    /// Scroll up by one line. Default: k/↑
    ScrollUp,
    /// Scroll down by one line. Default: j/↓
    ScrollDown,
    /// Scroll up by one page. Default: Ctrl+u/Page Up
    PageUp,
    /// Scroll down by one page. Default: Ctrl+d/Page Down
    PageDown,
    /// Jump to the oldest line. Default: g/Home
    ScrollToTop,
    /// Jump to the newest line. Default: G/End
    ScrollToBottom,
    /// Flip auto-follow. Default: a
    ToggleAutoFollow,

    // Font
    /// Increase the font size by one step. Default: +/=
    IncreaseFontSize,
    /// Decrease the font size by one step. Default: -
    DecreaseFontSize,

    // Search
    /// Show or hide the search bar. Default: Ctrl+f and /
    ToggleSearch,
    /// Move to the next match. Default: n
    NextMatch,
    /// Move to the previous match. Default: N
    PrevMatch,

    // Application
    /// Destroy the panel and exit. Default: q/Ctrl+c
    Quit,
}
