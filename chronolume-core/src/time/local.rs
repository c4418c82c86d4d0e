//! Local calendar time
//!
//! Converts Unix seconds plus a fixed offset into a calendar reading using
//! the days-from-civil algorithm (proleptic Gregorian, no leap seconds).

use crate::text::{MinuteText, TimeText};

const SECS_PER_DAY: i64 = 86_400;

/// Day of the week
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// 1970-01-01 was a Thursday
    fn from_days_since_epoch(days: i64) -> Self {
        match (days + 4).rem_euclid(7) {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }
}

/// Broken-down local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub year: i32,
    /// 1..=12
    pub month: u8,
    /// 1..=31
    pub day: u8,
    /// 0..=23
    pub hour: u8,
    /// 0..=59
    pub minute: u8,
    /// 0..=59
    pub second: u8,
    pub weekday: Weekday,
}

impl LocalTime {
    /// Local time for `unix_secs` shifted by `offset_s`
    pub fn from_unix(unix_secs: i64, offset_s: i32) -> Self {
        let local = unix_secs + offset_s as i64;
        let days = local.div_euclid(SECS_PER_DAY);
        let secs_of_day = local.rem_euclid(SECS_PER_DAY);

        let (year, month, day) = civil_from_days(days);
        Self {
            year,
            month,
            day,
            hour: (secs_of_day / 3600) as u8,
            minute: (secs_of_day % 3600 / 60) as u8,
            second: (secs_of_day % 60) as u8,
            weekday: Weekday::from_days_since_epoch(days),
        }
    }

    /// Build from components; fields are taken as given
    pub fn from_hms(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            year: 1970,
            month: 1,
            day: 1,
            hour,
            minute,
            second,
            weekday: Weekday::Thursday,
        }
    }

    /// "HH:MM", 24-hour
    pub fn hh_mm(&self) -> TimeText {
        let mut text = TimeText::new();
        text.push_padded(self.hour as u32, 2);
        text.push_str_truncated(":");
        text.push_padded(self.minute as u32, 2);
        text
    }

    /// Two-digit minute
    pub fn minute_text(&self) -> MinuteText {
        let mut text = MinuteText::new();
        text.push_padded(self.minute as u32, 2);
        text
    }
}

/// (year, month, day) for a count of days since 1970-01-01
fn civil_from_days(days: i64) -> (i32, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year as i32, month, day)
}
