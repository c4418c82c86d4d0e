//! Minute-change render engine

use chronolume_display::{ClockDisplay, DisplayError};

use super::colors::ColorCycle;
use super::layout::{ANCHOR, BACKGROUND, CLOCK_FACE, CLOCK_FONT};
use crate::config::ColorCycleConfig;
use crate::text::{MinuteText, TimeText};
use crate::time::LocalTime;

/// What was last put on the clock face
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderCache {
    /// Minute of the last repaint; `None` forces the next one
    pub last_minute: Option<MinuteText>,
}

/// Result of a render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Same minute as the last repaint; nothing drawn
    Unchanged,
    /// The face was repainted with this text
    Repainted(TimeText),
}

/// Clock face renderer
pub struct RenderEngine {
    cache: RenderCache,
    colors: ColorCycle,
}

impl RenderEngine {
    pub fn new(config: &ColorCycleConfig, now_ms: u64) -> Self {
        Self {
            cache: RenderCache::default(),
            colors: ColorCycle::new(config, now_ms),
        }
    }

    /// Advance the color cycle and repaint if the minute changed
    ///
    /// A color change alone does not repaint; the new color shows up at the
    /// next minute. A failed repaint leaves the cache invalid so the next
    /// pass tries again.
    pub fn render<D: ClockDisplay>(
        &mut self,
        display: &mut D,
        time: &LocalTime,
        now_ms: u64,
    ) -> Result<RenderOutcome, DisplayError> {
        if self.colors.tick(now_ms) {
            debug!("Clock color now palette entry {}", self.colors.index());
        }

        let minute = time.minute_text();
        if self.cache.last_minute.as_ref() == Some(&minute) {
            return Ok(RenderOutcome::Unchanged);
        }

        let text = time.hh_mm();
        if let Err(e) = self.paint(display, &text) {
            self.invalidate();
            return Err(e);
        }

        self.cache = RenderCache {
            last_minute: Some(minute),
        };
        Ok(RenderOutcome::Repainted(text))
    }

    fn paint<D: ClockDisplay>(&self, display: &mut D, text: &TimeText) -> Result<(), DisplayError> {
        display.start_write()?;
        let drawn = display
            .fill_rect(CLOCK_FACE, BACKGROUND)
            .and_then(|_| {
                display.set_text_color(self.colors.current(), BACKGROUND);
                display.draw_string(text.as_str(), ANCHOR, CLOCK_FONT)
            });
        let ended = display.end_write();
        drawn.and(ended)
    }

    /// Forget the last repaint so the next render draws unconditionally
    pub fn invalidate(&mut self) {
        self.cache = RenderCache::default();
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn colors(&self) -> &ColorCycle {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{DisplayOp, RecordingDisplay};
    use chronolume_display::{FontSize, Point, Rgb565, RgbColor};

    fn engine() -> RenderEngine {
        RenderEngine::new(&ColorCycleConfig::default(), 0)
    }

    #[test]
    fn test_first_render_paints_face() {
        let mut display = RecordingDisplay::new();
        let mut engine = engine();

        let outcome = engine
            .render(&mut display, &LocalTime::from_hms(9, 59, 50), 0)
            .unwrap();

        assert_eq!(outcome, RenderOutcome::Repainted(TimeText::from_str_truncated("09:59")));
        assert_eq!(
            display.ops,
            vec![
                DisplayOp::StartWrite,
                DisplayOp::FillRect(CLOCK_FACE, Rgb565::BLACK),
                DisplayOp::TextColor(Rgb565::WHITE, Rgb565::BLACK),
                DisplayOp::Text("09:59".into(), Point::new(160, 85), FontSize::Large),
                DisplayOp::EndWrite,
            ]
        );
        assert_eq!(engine.cache().last_minute.as_ref().unwrap(), "59");
    }

    #[test]
    fn test_same_minute_draws_nothing() {
        let mut display = RecordingDisplay::new();
        let mut engine = engine();
        engine
            .render(&mut display, &LocalTime::from_hms(9, 59, 1), 0)
            .unwrap();
        display.clear();

        let outcome = engine
            .render(&mut display, &LocalTime::from_hms(9, 59, 58), 57_000)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Unchanged);
        assert!(display.ops.is_empty());
    }

    #[test]
    fn test_color_change_waits_for_next_minute() {
        let mut display = RecordingDisplay::new();
        let mut engine = engine();
        engine
            .render(&mut display, &LocalTime::from_hms(10, 0, 0), 0)
            .unwrap();

        // Interval elapses mid-minute: no repaint yet
        let outcome = engine
            .render(&mut display, &LocalTime::from_hms(10, 0, 30), 60_000)
            .unwrap();
        assert_eq!(outcome, RenderOutcome::Unchanged);
        assert_eq!(engine.colors().current(), Rgb565::RED);

        engine
            .render(&mut display, &LocalTime::from_hms(10, 1, 0), 60_500)
            .unwrap();
        assert_eq!(display.last_text_color(), Some((Rgb565::RED, Rgb565::BLACK)));
    }

    #[test]
    fn test_invalidate_forces_repaint() {
        let mut display = RecordingDisplay::new();
        let mut engine = engine();
        let t = LocalTime::from_hms(12, 0, 0);
        engine.render(&mut display, &t, 0).unwrap();
        engine.invalidate();
        assert_eq!(engine.cache(), &RenderCache::default());

        let outcome = engine.render(&mut display, &t, 100).unwrap();
        assert!(matches!(outcome, RenderOutcome::Repainted(_)));
        assert_eq!(display.count_text("12:00"), 2);
    }

    #[test]
    fn test_failed_paint_retries_and_closes_batch() {
        let mut display = RecordingDisplay::new();
        display.fail_fills = true;
        let mut engine = engine();
        let t = LocalTime::from_hms(7, 30, 0);

        assert_eq!(
            engine.render(&mut display, &t, 0),
            Err(DisplayError::Communication)
        );
        assert_eq!(display.ops, vec![DisplayOp::StartWrite, DisplayOp::EndWrite]);
        assert_eq!(engine.cache().last_minute, None);

        display.fail_fills = false;
        let outcome = engine.render(&mut display, &t, 200).unwrap();
        assert!(matches!(outcome, RenderOutcome::Repainted(_)));
    }
}
