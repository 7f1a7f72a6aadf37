//! TUI rendering and terminal management (impure shell)
//!
//! One task owns the terminal, the panel and the transport driver.
//! `tokio::select!` multiplexes crossterm input with socket and timer events,
//! feeds each into the panel, executes the returned actions, then redraws.

mod layout;
mod search_input;
mod status_bar;
mod styles;
pub mod terminal;
mod tui_sink;

pub use layout::{render_log_view, LogLayout};
pub use search_input::{SearchBar, SearchInput};
pub use status_bar::{indicator_text, status_line, StatusInfo};
pub use styles::{ColorConfig, LogStyles};
pub use terminal::{encode_key, run_terminal, StdoutTerminal};
pub use tui_sink::TuiSink;

use crate::config::KeyBindings;
use crate::connection::ConnectionAction;
use crate::model::{Endpoint, KeyAction, StreamTarget};
use crate::state::{LogPanel, PanelOptions, StreamPanel};
use crate::transport::{dispatch, TransportDriver};
use crossterm::{
    event::{
        DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
        EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::io;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Lines moved per mouse wheel notch.
const WHEEL_STEP: isize = 3;

/// Errors that can occur during TUI operations
#[derive(Debug, Error)]
pub enum TuiError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

// ===== Terminal guard =====

/// Raw mode (and optionally the alternate screen) for as long as it lives.
///
/// Restores the terminal on drop, including on early return and panic unwind.
pub struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    /// Enter raw mode, plus the alternate screen and mouse capture when asked.
    pub fn enter(alternate_screen: bool) -> Result<Self, TuiError> {
        enable_raw_mode()?;
        // Constructed before the remaining steps so a failure below still restores.
        let guard = Self { alternate_screen };
        let mut stdout = io::stdout();
        if alternate_screen {
            stdout.execute(EnterAlternateScreen)?;
            stdout.execute(EnableMouseCapture)?;
        }
        stdout.execute(EnableFocusChange)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore_terminal(self.alternate_screen) {
            warn!(error = %e, "failed to restore terminal");
        }
    }
}

/// Restore terminal to normal state
fn restore_terminal(alternate_screen: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(DisableFocusChange)?;
    if alternate_screen {
        stdout.execute(DisableMouseCapture)?;
        stdout.execute(LeaveAlternateScreen)?;
    }
    disable_raw_mode()
}

// ===== Log app =====

/// What the loop should do after an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep running; execute these actions first.
    Continue(Vec<ConnectionAction>),
    /// Leave the loop.
    Quit,
}

impl Flow {
    fn idle() -> Self {
        Flow::Continue(Vec::new())
    }
}

/// Log-mode TUI.
///
/// Generic over backend to support testing with TestBackend
pub struct LogApp<B: Backend> {
    terminal: Terminal<B>,
    panel: LogPanel<TuiSink>,
    keys: KeyBindings,
    input: SearchInput,
    styles: LogStyles,
}

impl<B: Backend> LogApp<B> {
    /// Wire a terminal, a panel and a palette with the default key bindings.
    pub fn new(terminal: Terminal<B>, panel: LogPanel<TuiSink>, styles: LogStyles) -> Self {
        Self {
            terminal,
            panel,
            keys: KeyBindings::default(),
            input: SearchInput::new(),
            styles,
        }
    }

    /// The log panel.
    pub fn panel(&self) -> &LogPanel<TuiSink> {
        &self.panel
    }

    /// Mutable access to the log panel.
    pub fn panel_mut(&mut self) -> &mut LogPanel<TuiSink> {
        &mut self.panel
    }

    /// The ratatui terminal.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Search bar text.
    pub fn search_input(&self) -> &SearchInput {
        &self.input
    }

    /// Size the viewport and start the panel.
    pub fn start(&mut self) -> Result<Vec<ConnectionAction>, TuiError> {
        self.sync_viewport()?;
        Ok(self.panel.start())
    }

    /// Open the search bar with `query` already typed.
    pub fn open_search_with(&mut self, query: &str) {
        if !self.panel.search_visible() {
            self.panel.toggle_search();
        }
        self.input.clear();
        query.chars().for_each(|c| self.input.insert(c));
        self.panel.set_query(self.input.query());
    }

    /// Route one crossterm event.
    pub fn handle_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                Flow::idle()
            }
            Event::FocusGained => {
                debug!("focus regained");
                Flow::Continue(self.panel.on_visibility_regained())
            }
            _ => Flow::idle(),
        }
    }

    /// Route a key press: search bar first, then bindings.
    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if self.panel.search_visible() {
            if let Some(flow) = self.handle_search_key(key) {
                return flow;
            }
        }

        let Some(action) = self.keys.get(key) else {
            return Flow::idle();
        };

        match action {
            KeyAction::ScrollUp => self.user_scroll(|s| s.scroll_by(-1)),
            KeyAction::ScrollDown => self.user_scroll(|s| s.scroll_by(1)),
            KeyAction::PageUp => self.user_scroll(TuiSink::page_up),
            KeyAction::PageDown => self.user_scroll(TuiSink::page_down),
            KeyAction::ScrollToTop => self.user_scroll(TuiSink::scroll_to_top),
            KeyAction::ScrollToBottom => self.user_scroll(TuiSink::scroll_to_end),
            KeyAction::ToggleAutoFollow => self.panel.toggle_auto_follow(),
            KeyAction::IncreaseFontSize => self.panel.increase_font_size(),
            KeyAction::DecreaseFontSize => self.panel.decrease_font_size(),
            KeyAction::ToggleSearch => {
                self.panel.toggle_search();
                if !self.panel.search_visible() {
                    self.input.clear();
                }
            }
            KeyAction::NextMatch => self.panel.next_match(),
            KeyAction::PrevMatch => self.panel.previous_match(),
            KeyAction::Quit => return Flow::Quit,
        }
        Flow::idle()
    }

    /// Keys the search bar consumes while visible. `None` falls through to
    /// the regular bindings (Ctrl+F, Ctrl+C, arrows, paging).
    fn handle_search_key(&mut self, key: KeyEvent) -> Option<Flow> {
        let plain = key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT;
        match key.code {
            KeyCode::Esc => {
                self.panel.hide_search();
                self.input.clear();
            }
            KeyCode::Enter if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.panel.previous_match()
            }
            KeyCode::Enter => self.panel.next_match(),
            KeyCode::Backspace => {
                if self.input.backspace() {
                    self.panel.set_query(self.input.query());
                }
            }
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Char(c) if plain => {
                self.input.insert(c);
                self.panel.set_query(self.input.query());
            }
            _ => return None,
        }
        Some(Flow::idle())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.user_scroll(|s| s.scroll_by(-WHEEL_STEP)),
            MouseEventKind::ScrollDown => self.user_scroll(|s| s.scroll_by(WHEEL_STEP)),
            _ => {}
        }
    }

    /// Move the viewport, then report the new geometry to the panel.
    fn user_scroll(&mut self, scroll: impl FnOnce(&mut TuiSink)) {
        scroll(self.panel.sink_mut());
        let (top, height, content) = self.panel.sink().geometry();
        self.panel.on_user_scroll(top, height, content);
    }

    fn sync_viewport(&mut self) -> Result<(), TuiError> {
        let size = self.terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        let rows = LogLayout::split(area, self.panel.search_visible()).viewport_rows();
        let following = self.panel.scroll().is_following();
        let sink = self.panel.sink_mut();
        if !following {
            sink.unpin();
        }
        sink.set_viewport_height(rows);
        Ok(())
    }

    /// Resize the viewport and redraw.
    pub fn draw(&mut self) -> Result<(), TuiError> {
        self.sync_viewport()?;
        let panel = &self.panel;
        let input = &self.input;
        let styles = &self.styles;
        self.terminal
            .draw(|frame| render_log_view(frame, panel, input, styles))?;
        Ok(())
    }

    /// Run until the user quits, then destroy the panel.
    pub async fn run(
        &mut self,
        driver: &mut TransportDriver,
        initial_query: Option<&str>,
    ) -> Result<(), TuiError> {
        let mut events = EventStream::new();

        let actions = self.start()?;
        driver.execute(actions).await;
        if let Some(query) = initial_query {
            self.open_search_with(query);
        }
        self.draw()?;

        loop {
            tokio::select! {
                maybe_event = events.next() => match maybe_event {
                    Some(Ok(event)) => match self.handle_event(event) {
                        Flow::Continue(actions) => driver.execute(actions).await,
                        Flow::Quit => break,
                    },
                    Some(Err(e)) => {
                        self.shutdown(driver).await;
                        return Err(e.into());
                    }
                    None => break,
                },
                event = driver.next_event() => dispatch(&mut self.panel, driver, event).await,
            }
            self.draw()?;
        }

        self.shutdown(driver).await;
        Ok(())
    }

    async fn shutdown(&mut self, driver: &mut TransportDriver) {
        info!(target = %self.panel.target(), "closing log panel");
        let actions = self.panel.destroy();
        driver.execute(actions).await;
    }
}

/// Open a log panel in the alternate screen and run it to completion.
pub async fn run_logs(
    endpoint: &Endpoint,
    target: StreamTarget,
    options: &PanelOptions,
    colors: ColorConfig,
    initial_query: Option<&str>,
) -> Result<(), TuiError> {
    let _guard = TerminalGuard::enter(true)?;
    let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    let panel = LogPanel::new(endpoint, target, options, TuiSink::new());
    let mut app = LogApp::new(terminal, panel, LogStyles::with_color_config(colors));
    let mut driver = TransportDriver::new();

    app.run(&mut driver, initial_query).await
}
