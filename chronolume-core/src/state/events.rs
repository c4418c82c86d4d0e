//! Events that trigger state transitions

use super::machine::FailureReason;

/// Events that can trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Startup events
    /// Panel initialized and boot screen shown
    DisplayReady,
    /// WiFi link came up within the startup timeout
    WifiConnected,
    /// WiFi link did not come up within the startup timeout
    WifiFailed,
    /// Local time became readable during startup sync
    TimeSynced,
    /// Startup sync attempts exhausted
    TimeSyncFailed,

    // Runtime events
    /// Local time read successfully
    TimeRead,
    /// Local time read failed
    TimeUnavailable(FailureReason),
}
