//! Status reporter
//!
//! Shows diagnostics in place of the time. The same message is not
//! repainted more often than every five seconds, which keeps a persistent
//! fault from flickering the panel on every loop pass.

use chronolume_display::{ClockDisplay, DisplayError, Rgb565, RgbColor};

use crate::config::STATUS_COOLDOWN_MS;
use crate::render::layout::{ANCHOR, BACKGROUND, CLOCK_FACE, MESSAGE_FONT};
use crate::state::{FailureReason, StartupError};

/// Messages the clock can show instead of the time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StatusMessage {
    Initializing,
    WifiConnectionFailed,
    TimeSyncFailed,
    NoWifi,
    TimeSyncError,
}

impl StatusMessage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initializing => "Initializing...",
            Self::WifiConnectionFailed => "WiFi connection failed",
            Self::TimeSyncFailed => "Time sync failed",
            Self::NoWifi => "No WiFi",
            Self::TimeSyncError => "Time sync error",
        }
    }

    /// Message for a runtime failure, if it warrants one
    ///
    /// A pending resync shows nothing; the previous screen stays up.
    pub const fn for_failure(reason: FailureReason) -> Option<Self> {
        match reason {
            FailureReason::NoNetwork => Some(Self::NoWifi),
            FailureReason::Resyncing => None,
            FailureReason::SyncExhausted => Some(Self::TimeSyncError),
        }
    }

    pub const fn for_startup(error: StartupError) -> Self {
        match error {
            StartupError::WifiFailed => Self::WifiConnectionFailed,
            StartupError::TimeSyncFailed => Self::TimeSyncFailed,
        }
    }
}

/// Last diagnostic shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorDisplayState {
    pub last_message: Option<StatusMessage>,
    pub last_shown_ms: Option<u64>,
}

/// Diagnostic painter with duplicate suppression
#[derive(Debug, Default)]
pub struct StatusReporter {
    state: ErrorDisplayState,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ErrorDisplayState {
        &self.state
    }

    /// Paint a full-screen message (boot and startup failure screens)
    pub fn show_screen<D: ClockDisplay>(
        &mut self,
        display: &mut D,
        message: StatusMessage,
        now_ms: u64,
    ) -> Result<(), DisplayError> {
        display.start_write()?;
        let drawn = display.fill_screen(BACKGROUND).and_then(|_| {
            display.set_text_color(Rgb565::WHITE, BACKGROUND);
            display.draw_string(message.as_str(), ANCHOR, MESSAGE_FONT)
        });
        let ended = display.end_write();
        self.remember(message, now_ms);
        drawn.and(ended)
    }

    /// Report a runtime failure in the clock face region
    ///
    /// Returns `Ok(true)` if something was painted. A different message
    /// paints at once; a repeat paints only after the cooldown.
    pub fn report<D: ClockDisplay>(
        &mut self,
        display: &mut D,
        reason: FailureReason,
        now_ms: u64,
    ) -> Result<bool, DisplayError> {
        let Some(message) = StatusMessage::for_failure(reason) else {
            return Ok(false);
        };
        if self.suppressed(message, now_ms) {
            return Ok(false);
        }

        warn!("Showing status: {}", message.as_str());
        display.start_write()?;
        let drawn = display.fill_rect(CLOCK_FACE, BACKGROUND).and_then(|_| {
            display.set_text_color(Rgb565::WHITE, BACKGROUND);
            display.draw_string(message.as_str(), ANCHOR, MESSAGE_FONT)
        });
        let ended = display.end_write();
        self.remember(message, now_ms);
        drawn.and(ended).map(|_| true)
    }

    /// Forget the last message, e.g. once the time is back on screen
    pub fn clear(&mut self) {
        self.state = ErrorDisplayState::default();
    }

    fn suppressed(&self, message: StatusMessage, now_ms: u64) -> bool {
        match (self.state.last_message, self.state.last_shown_ms) {
            (Some(last), Some(at)) => {
                last == message && now_ms.saturating_sub(at) < STATUS_COOLDOWN_MS
            }
            _ => false,
        }
    }

    fn remember(&mut self, message: StatusMessage, now_ms: u64) {
        self.state = ErrorDisplayState {
            last_message: Some(message),
            last_shown_ms: Some(now_ms),
        };
    }
}
