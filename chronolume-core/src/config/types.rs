//! Configuration type definitions
//!
//! These types represent the clock configuration loaded from `clock.toml`.
//! Every section is optional except `[wifi]`; missing keys take the
//! defaults below.

use chronolume_display::Rotation;
use heapless::String;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum NTP host name length
pub const MAX_HOST_LEN: usize = 64;

pub const DEFAULT_NTP_SERVER: &str = "pool.ntp.org";
pub const DEFAULT_UTC_OFFSET_S: i32 = 3600;
pub const DEFAULT_DST_OFFSET_S: i32 = 3600;
pub const DEFAULT_BACKLIGHT_PIN: u8 = 13;
pub const DEFAULT_ROTATION: Rotation = Rotation::Landscape;
pub const DEFAULT_COLOR_INTERVAL_MS: u32 = 60_000;

/// Largest accepted UTC offset magnitude (UTC-12..UTC+14 fits inside)
pub const MAX_UTC_OFFSET_S: i32 = 14 * 3600;

/// Largest accepted daylight-saving offset
pub const MAX_DST_OFFSET_S: i32 = 2 * 3600;

/// Semantic configuration errors found after parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// `[wifi] ssid` is missing or empty
    EmptySsid,
    /// UTC offset outside +/-14 hours
    UtcOffsetOutOfRange,
    /// DST offset outside 0..=2 hours
    DstOffsetOutOfRange,
    /// Color cycle interval of zero
    ZeroColorInterval,
    /// NTP server name is empty
    EmptyServer,
}

/// WiFi credentials
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WifiConfig {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Time synchronization settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NtpConfig {
    /// NTP server host name
    pub server: String<MAX_HOST_LEN>,
    /// Standard offset from UTC in seconds
    pub utc_offset_s: i32,
    /// Additional daylight-saving offset in seconds
    pub dst_offset_s: i32,
}

impl Default for NtpConfig {
    fn default() -> Self {
        let mut server = String::new();
        // Fits: the default host is far shorter than MAX_HOST_LEN
        let _ = server.push_str(DEFAULT_NTP_SERVER);
        Self {
            server,
            utc_offset_s: DEFAULT_UTC_OFFSET_S,
            dst_offset_s: DEFAULT_DST_OFFSET_S,
        }
    }
}

impl NtpConfig {
    /// Total offset applied to UTC to get local time
    pub fn total_offset_s(&self) -> i32 {
        self.utc_offset_s + self.dst_offset_s
    }
}

/// Panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DisplayConfig {
    /// GPIO driving the backlight
    pub backlight_pin: u8,
    pub rotation: Rotation,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            backlight_pin: DEFAULT_BACKLIGHT_PIN,
            rotation: DEFAULT_ROTATION,
        }
    }
}

/// Clock face color cycling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ColorCycleConfig {
    pub enabled: bool,
    /// Time each color is shown for
    pub interval_ms: u32,
}

impl Default for ColorCycleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_ms: DEFAULT_COLOR_INTERVAL_MS,
        }
    }
}

/// Complete clock configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockConfig {
    pub wifi: WifiConfig,
    pub ntp: NtpConfig,
    pub display: DisplayConfig,
    pub color_cycle: ColorCycleConfig,
}

impl ClockConfig {
    /// Check cross-field constraints the parser cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wifi.ssid.is_empty() {
            return Err(ConfigError::EmptySsid);
        }
        if self.ntp.server.is_empty() {
            return Err(ConfigError::EmptyServer);
        }
        if !(-MAX_UTC_OFFSET_S..=MAX_UTC_OFFSET_S).contains(&self.ntp.utc_offset_s) {
            return Err(ConfigError::UtcOffsetOutOfRange);
        }
        if !(0..=MAX_DST_OFFSET_S).contains(&self.ntp.dst_offset_s) {
            return Err(ConfigError::DstOffsetOutOfRange);
        }
        if self.color_cycle.enabled && self.color_cycle.interval_ms == 0 {
            return Err(ConfigError::ZeroColorInterval);
        }
        Ok(())
    }
}
