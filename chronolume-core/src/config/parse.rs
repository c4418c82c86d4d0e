//! Minimal TOML parser for the clock configuration
//!
//! Handles only the subset `clock.toml` needs, without an allocator.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs (string, integer, boolean)
//! - Basic string escapes (`\"`, `\\`, `\n`, `\t`)
//! - Integers with sign and `_` separators
//! - Comments (`# ...`), including after a value
//!
//! NOT supported:
//! - Dotted or nested sections, arrays, inline tables
//! - Multi-line or literal strings

use chronolume_display::Rotation;
use heapless::String;

use super::types::{ClockConfig, ConfigError};

/// Parse error, carrying the 1-based line where it occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Malformed or unknown `[section]` header
    InvalidSection(u16),
    /// Key not recognized in its section
    UnknownKey(u16),
    /// Line is neither a header nor `key = value`
    InvalidLine(u16),
    /// Value has the wrong type or is out of range
    InvalidValue(u16),
    /// String does not fit its buffer
    TooLong(u16),
    /// Parsed fine but failed validation
    Invalid(ConfigError),
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        ParseError::Invalid(e)
    }
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Wifi,
    Ntp,
    Display,
    ColorCycle,
}

/// Parse and validate a configuration file
///
/// Keys not present keep their defaults.
pub fn parse_config(input: &str) -> Result<ClockConfig, ParseError> {
    let mut config = ClockConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = (index + 1).min(u16::MAX as usize) as u16;
        let line = raw.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let header = strip_comment(header);
            let name = header
                .strip_suffix(']')
                .ok_or(ParseError::InvalidSection(line_no))?;
            section = parse_section_header(name.trim()).ok_or(ParseError::InvalidSection(line_no))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError::InvalidLine(line_no))?;
        apply_value(&mut config, section, key, value, line_no)?;
    }

    config.validate()?;
    Ok(config)
}

fn parse_section_header(name: &str) -> Option<Section> {
    match name {
        "wifi" => Some(Section::Wifi),
        "ntp" => Some(Section::Ntp),
        "display" => Some(Section::Display),
        "color_cycle" => Some(Section::ColorCycle),
        _ => None,
    }
}

/// Drop a trailing `# comment` that is not inside a string
fn strip_comment(text: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '#' if !in_string => return text[..i].trim_end(),
            _ => {}
        }
    }
    text
}

/// Split "key = value", with any trailing comment removed
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = strip_comment(value.trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn apply_value(
    config: &mut ClockConfig,
    section: Section,
    key: &str,
    value: &str,
    line: u16,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Wifi, "ssid") => config.wifi.ssid = parse_string(value, line)?,
        (Section::Wifi, "password") => config.wifi.password = parse_string(value, line)?,
        (Section::Ntp, "server") => config.ntp.server = parse_string(value, line)?,
        (Section::Ntp, "utc_offset_s") => config.ntp.utc_offset_s = parse_int(value, line)?,
        (Section::Ntp, "dst_offset_s") => config.ntp.dst_offset_s = parse_int(value, line)?,
        (Section::Display, "backlight_pin") => {
            config.display.backlight_pin = parse_int(value, line)?
        }
        (Section::Display, "rotation") => {
            let index: u8 = parse_int(value, line)?;
            config.display.rotation =
                Rotation::from_index(index).ok_or(ParseError::InvalidValue(line))?;
        }
        (Section::ColorCycle, "enabled") => config.color_cycle.enabled = parse_bool(value, line)?,
        (Section::ColorCycle, "interval_ms") => {
            config.color_cycle.interval_ms = parse_int(value, line)?
        }
        _ => return Err(ParseError::UnknownKey(line)),
    }
    Ok(())
}

/// Parse a quoted string into a bounded buffer
fn parse_string<const N: usize>(value: &str, line: u16) -> Result<String<N>, ParseError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue(line))?;

    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        let c = match c {
            '\\' => match chars.next() {
                Some('"') => '"',
                Some('\\') => '\\',
                Some('n') => '\n',
                Some('t') => '\t',
                _ => return Err(ParseError::InvalidValue(line)),
            },
            // An unescaped quote means the string ended early
            '"' => return Err(ParseError::InvalidValue(line)),
            c => c,
        };
        out.push(c).map_err(|_| ParseError::TooLong(line))?;
    }
    Ok(out)
}

/// Parse an integer, allowing `_` digit separators
fn parse_int<T: TryFrom<i64>>(value: &str, line: u16) -> Result<T, ParseError> {
    let (negative, digits) = match value.as_bytes().first() {
        Some(b'-') => (true, &value[1..]),
        Some(b'+') => (false, &value[1..]),
        _ => (false, value),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') {
        return Err(ParseError::InvalidValue(line));
    }

    let mut magnitude: i64 = 0;
    for c in digits.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseError::InvalidValue(line))?;
        magnitude = magnitude
            .checked_mul(10)
            .and_then(|m| m.checked_add(digit as i64))
            .ok_or(ParseError::InvalidValue(line))?;
    }

    let signed = if negative { -magnitude } else { magnitude };
    T::try_from(signed).map_err(|_| ParseError::InvalidValue(line))
}

fn parse_bool(value: &str, line: u16) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue(line)),
    }
}
