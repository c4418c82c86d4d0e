//! Build script for chronolume-firmware
//!
//! - Stages memory.x and passes the cortex-m-rt/defmt linker scripts
//! - Validates clock.toml at compile time with the firmware's own parser

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chronolume_core::config::{parse_config, ConfigError, ParseError};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths and scripts
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Only the embedded target links against these scripts
    let target = env::var("TARGET").unwrap_or_default();
    if target.starts_with("thumbv6m") {
        println!("cargo:rustc-link-arg-bins=--nmagic");
        println!("cargo:rustc-link-arg-bins=-Tlink.x");
        println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate clock.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=clock.toml");

    let config_path = Path::new("clock.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: clock.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a clock.toml configuration file.            ║\n\
            ║  Please create one in the chronolume-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read clock.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in clock.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    // Same parser the firmware runs at boot, so the build never accepts a
    // file the device would reject
    if let Err(e) = parse_config(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid clock configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&describe(e))
        );
    }

    if let Some(toml::Value::String(ssid)) = config.get("wifi").and_then(|w| w.get("ssid")) {
        if ssid == "YOUR_WIFI_SSID" {
            println!("cargo:warning=clock.toml still has the placeholder WiFi SSID");
        }
    }

    println!("cargo:warning=clock.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Human-readable form of a parser error
fn describe(error: ParseError) -> String {
    match error {
        ParseError::InvalidSection(line) => format!("line {}: unknown or malformed [section]", line),
        ParseError::UnknownKey(line) => format!("line {}: unknown key for this section", line),
        ParseError::InvalidLine(line) => format!("line {}: expected `key = value`", line),
        ParseError::InvalidValue(line) => {
            format!("line {}: wrong type, out of range, or unsupported string form", line)
        }
        ParseError::TooLong(line) => format!("line {}: string longer than its limit", line),
        ParseError::Invalid(ConfigError::EmptySsid) => "[wifi] ssid is required".to_string(),
        ParseError::Invalid(ConfigError::EmptyServer) => "[ntp] server cannot be empty".to_string(),
        ParseError::Invalid(ConfigError::UtcOffsetOutOfRange) => {
            "[ntp] utc_offset_s must be within +/-14 h".to_string()
        }
        ParseError::Invalid(ConfigError::DstOffsetOutOfRange) => {
            "[ntp] dst_offset_s must be 0..=7200".to_string()
        }
        ParseError::Invalid(ConfigError::ZeroColorInterval) => {
            "[color_cycle] interval_ms must be > 0".to_string()
        }
    }
}
