//! Clock face color cycling

use chronolume_display::{Rgb565, RgbColor};

use crate::config::ColorCycleConfig;

/// Colors the face steps through, in order
pub const PALETTE: [Rgb565; 7] = [
    Rgb565::WHITE,
    Rgb565::RED,
    Rgb565::GREEN,
    Rgb565::BLUE,
    Rgb565::YELLOW,
    Rgb565::CYAN,
    Rgb565::MAGENTA,
];

/// Face color when cycling is disabled
pub const DEFAULT_COLOR: Rgb565 = Rgb565::WHITE;

/// Palette position driven by elapsed time
///
/// Advances one step per full interval elapsed. When the caller polls late,
/// the missed steps are taken at once so the index never drifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorCycle {
    enabled: bool,
    interval_ms: u32,
    index: usize,
    last_change_ms: u64,
}

impl ColorCycle {
    pub fn new(config: &ColorCycleConfig, now_ms: u64) -> Self {
        Self {
            enabled: config.enabled && config.interval_ms > 0,
            interval_ms: config.interval_ms,
            index: 0,
            last_change_ms: now_ms,
        }
    }

    /// Advance for the time elapsed up to `now_ms`
    ///
    /// Returns true if the color changed.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if !self.enabled {
            return false;
        }
        let interval = self.interval_ms as u64;
        let steps = now_ms.saturating_sub(self.last_change_ms) / interval;
        if steps == 0 {
            return false;
        }
        self.index = (self.index + (steps % PALETTE.len() as u64) as usize) % PALETTE.len();
        self.last_change_ms += steps * interval;
        true
    }

    /// Palette index (always 0 when disabled)
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Color to paint the face with
    pub fn current(&self) -> Rgb565 {
        if self.enabled {
            PALETTE[self.index]
        } else {
            DEFAULT_COLOR
        }
    }
}
