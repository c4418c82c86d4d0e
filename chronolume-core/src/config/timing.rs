//! Fixed timing constants
//!
//! These are not user-configurable; they shape how patiently the clock
//! waits for the network and how often it re-checks things.

/// Poll interval while waiting for the WiFi link to come up
pub const WIFI_POLL_INTERVAL_MS: u32 = 500;

/// Upper bound for the initial WiFi connection at startup
pub const WIFI_CONNECT_TIMEOUT_MS: u32 = 15_000;

/// Upper bound for a reconnection attempt at runtime
pub const WIFI_RECONNECT_TIMEOUT_MS: u32 = 10_000;

/// How often the main loop verifies the WiFi link
pub const WIFI_CHECK_INTERVAL_MS: u64 = 30_000;

/// Local-time reads attempted during startup sync
pub const INITIAL_SYNC_ATTEMPTS: u8 = 5;

/// Delay after each failed startup read
pub const INITIAL_SYNC_RETRY_DELAY_MS: u32 = 2_000;

/// Runtime resync requests allowed over the whole uptime
pub const MAX_RESYNC_ATTEMPTS: u8 = 3;

/// Minimum spacing between repaints of the same status message
pub const STATUS_COOLDOWN_MS: u64 = 5_000;

/// Main loop period
pub const LOOP_DELAY_MS: u32 = 200;
