//! Clamped font size with a fixed step.

/// Step applied by increase/decrease.
pub const FONT_STEP: u16 = 2;
/// Initial size for both panel kinds.
pub const DEFAULT_FONT_SIZE: u16 = 12;

/// Font size in pixels, kept within `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontSize {
    px: u16,
    min: u16,
    max: u16,
}

impl FontSize {
    /// Log panels allow 8..=24.
    pub fn for_logs(initial: u16) -> Self {
        Self::new(initial, 8, 24)
    }

    /// Terminal panels allow 6..=24.
    pub fn for_terminal(initial: u16) -> Self {
        Self::new(initial, 6, 24)
    }

    /// Build a size, clamping `initial` into range.
    pub fn new(initial: u16, min: u16, max: u16) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            px: initial.clamp(min, max),
            min,
            max,
        }
    }

    /// Current size in pixels.
    pub fn px(self) -> u16 {
        self.px
    }

    /// Grow by one step. Returns false when already at the maximum.
    pub fn increase(&mut self) -> bool {
        if self.px >= self.max {
            return false;
        }
        self.px = (self.px + FONT_STEP).min(self.max);
        true
    }

    /// Shrink by one step. Returns false when already at the minimum.
    pub fn decrease(&mut self) -> bool {
        if self.px <= self.min {
            return false;
        }
        self.px = self.px.saturating_sub(FONT_STEP).max(self.min);
        true
    }
}
