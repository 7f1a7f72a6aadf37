//! Auto-follow heuristic.
//!
//! Decides after each content refresh whether the viewport jumps to the newest
//! content or stays where the user put it. Scrolling up is an implicit
//! opt-out of auto-follow; toggling it back on jumps to the bottom.

use crate::sink::DisplaySink;
use tracing::debug;

/// Tolerance, in viewport units, when deciding whether the viewport is at the bottom.
pub const DEFAULT_BOTTOM_EPSILON: f64 = 5.0;

/// Auto-follow state for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollController {
    auto_follow: bool,
    user_has_scrolled_up: bool,
    epsilon: f64,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScrollController {
    /// Controller starting with the given auto-follow setting.
    pub fn new(auto_follow: bool) -> Self {
        Self {
            auto_follow,
            user_has_scrolled_up: false,
            epsilon: DEFAULT_BOTTOM_EPSILON,
        }
    }

    /// Override the at-bottom tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon.max(0.0);
        self
    }

    /// Whether auto-follow is switched on.
    pub fn auto_follow(&self) -> bool {
        self.auto_follow
    }

    /// Whether the last reported viewport was above the bottom.
    pub fn user_has_scrolled_up(&self) -> bool {
        self.user_has_scrolled_up
    }

    /// Whether new content should pull the viewport to the bottom.
    pub fn is_following(&self) -> bool {
        self.auto_follow && !self.user_has_scrolled_up
    }

    /// Called after every content refresh.
    pub fn on_content_updated<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        if self.is_following() {
            sink.scroll_to_bottom();
            self.user_has_scrolled_up = false;
        }
    }

    /// Called with the viewport geometry whenever the viewport scrolls.
    ///
    /// A scroll produced by `scroll_to_bottom` itself reports an at-bottom
    /// geometry, so it never reads as the user scrolling up.
    pub fn on_user_scroll(&mut self, viewport_top: f64, viewport_height: f64, content_height: f64) {
        let at_bottom = viewport_top + viewport_height >= content_height - self.epsilon;
        self.user_has_scrolled_up = !at_bottom;

        if self.user_has_scrolled_up && self.auto_follow {
            debug!(viewport_top, viewport_height, content_height, "scrolled up, auto-follow off");
            self.auto_follow = false;
        }
    }

    /// Flip auto-follow. Turning it on jumps to the bottom immediately.
    pub fn toggle_auto_follow<S: DisplaySink + ?Sized>(&mut self, sink: &mut S) {
        self.auto_follow = !self.auto_follow;
        if self.auto_follow {
            self.user_has_scrolled_up = false;
            sink.scroll_to_bottom();
        }
        debug!(auto_follow = self.auto_follow, "auto-follow toggled");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{RecordingSink, SinkCall};

    #[test]
    fn follows_by_default() {
        let mut scroll = ScrollController::default();
        let mut sink = RecordingSink::new();

        scroll.on_content_updated(&mut sink);

        assert_eq!(sink.calls(), &[SinkCall::ScrollToBottom]);
        assert!(!scroll.user_has_scrolled_up());
    }

    #[test]
    fn scrolling_up_opts_out() {
        let mut scroll = ScrollController::default();
        let mut sink = RecordingSink::new();

        scroll.on_user_scroll(0.0, 100.0, 1000.0);
        assert!(scroll.user_has_scrolled_up());
        assert!(!scroll.auto_follow());

        scroll.on_content_updated(&mut sink);
        assert!(sink.calls().is_empty(), "must not scroll after opt-out");
    }

    #[test]
    fn within_epsilon_counts_as_bottom() {
        let mut scroll = ScrollController::default();
        scroll.on_user_scroll(896.0, 100.0, 1000.0);

        assert!(!scroll.user_has_scrolled_up());
        assert!(scroll.auto_follow());
    }

    #[test]
    fn just_outside_epsilon_is_scrolled_up() {
        let mut scroll = ScrollController::default();
        scroll.on_user_scroll(894.0, 100.0, 1000.0);
        assert!(scroll.user_has_scrolled_up());
    }

    #[test]
    fn programmatic_scroll_to_bottom_is_not_an_opt_out() {
        let mut scroll = ScrollController::default();
        // Geometry reported after scroll_to_bottom: top = content - height.
        scroll.on_user_scroll(900.0, 100.0, 1000.0);
        assert!(scroll.is_following());
    }

    #[test]
    fn returning_to_bottom_does_not_reenable_follow() {
        let mut scroll = ScrollController::default();
        scroll.on_user_scroll(0.0, 100.0, 1000.0);
        scroll.on_user_scroll(900.0, 100.0, 1000.0);

        assert!(!scroll.user_has_scrolled_up());
        assert!(!scroll.auto_follow(), "only the toggle turns follow back on");
    }

    #[test]
    fn toggle_on_scrolls_and_clears_flag() {
        let mut scroll = ScrollController::default();
        let mut sink = RecordingSink::new();
        scroll.on_user_scroll(0.0, 100.0, 1000.0);

        scroll.toggle_auto_follow(&mut sink);

        assert!(scroll.auto_follow());
        assert!(!scroll.user_has_scrolled_up());
        assert_eq!(sink.calls(), &[SinkCall::ScrollToBottom]);
    }

    #[test]
    fn toggle_off_does_not_scroll() {
        let mut scroll = ScrollController::default();
        let mut sink = RecordingSink::new();

        scroll.toggle_auto_follow(&mut sink);

        assert!(!scroll.auto_follow());
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn disabled_follow_with_viewport_at_bottom_does_not_scroll() {
        let mut scroll = ScrollController::new(false);
        let mut sink = RecordingSink::new();
        scroll.on_content_updated(&mut sink);
        assert!(sink.calls().is_empty());
    }

    #[test]
    fn custom_epsilon_is_used() {
        let mut scroll = ScrollController::default().with_epsilon(0.0);
        scroll.on_user_scroll(899.0, 100.0, 1000.0);
        assert!(scroll.user_has_scrolled_up());
    }
}
