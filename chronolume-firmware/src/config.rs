//! Embedded configuration
//!
//! `clock.toml` is compiled into the image (and checked by build.rs).
//! A file that still fails to parse at runtime falls back to defaults.

use chronolume_core::config::{parse_config, ClockConfig};
use defmt::*;

/// Edit clock.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../clock.toml");

/// Parse the embedded configuration
pub fn load() -> ClockConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!(
                "Configuration loaded: ssid={}, ntp={}, offset={}s",
                config.wifi.ssid.as_str(),
                config.ntp.server.as_str(),
                config.ntp.total_offset_s()
            );
            config
        }
        Err(e) => {
            error!("clock.toml rejected: {:?}; using defaults", e);
            ClockConfig::default()
        }
    }
}
