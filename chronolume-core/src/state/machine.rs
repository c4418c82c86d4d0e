//! State machine definition

use super::events::Event;

/// Clock states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// Power-on, panel not yet configured
    Booting,
    /// Waiting for the first WiFi connection
    Connecting,
    /// Waiting for the first time reading
    Syncing,
    /// Showing the time
    Displaying,
    /// Time unavailable at runtime
    ErrorShown(FailureReason),
    /// Startup failed; the loop idles forever
    Halted(StartupError),
}

/// Why a runtime time read failed, as classified by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FailureReason {
    /// WiFi is down
    NoNetwork,
    /// WiFi is up and a resync was just requested
    Resyncing,
    /// WiFi is up but the resync budget is spent
    SyncExhausted,
}

/// Fatal startup failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StartupError {
    WifiFailed,
    TimeSyncFailed,
}

impl State {
    /// Whether the main loop should do work
    pub fn is_running(&self) -> bool {
        matches!(self, State::Displaying | State::ErrorShown(_))
    }

    pub fn is_halted(&self) -> bool {
        matches!(self, State::Halted(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, State::ErrorShown(_) | State::Halted(_))
    }

    /// Process an event and return the next state
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use State::*;

        match (self, event) {
            // Startup
            (Booting, DisplayReady) => Connecting,
            (Connecting, WifiConnected) => Syncing,
            (Connecting, WifiFailed) => Halted(StartupError::WifiFailed),
            (Syncing, TimeSynced) => Displaying,
            (Syncing, TimeSyncFailed) => Halted(StartupError::TimeSyncFailed),

            // Runtime
            (Displaying | ErrorShown(_), TimeRead) => Displaying,
            (Displaying | ErrorShown(_), TimeUnavailable(reason)) => ErrorShown(reason),

            // Halted is terminal; anything else is ignored
            _ => self,
        }
    }
}
