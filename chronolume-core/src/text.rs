//! Fixed-capacity text
//!
//! Everything the clock draws is a short string known to fit a small
//! buffer: "HH:MM", a two-digit minute, or one of a handful of status
//! messages. [`FixedText`] builds them without an allocator and truncates
//! rather than failing when a caller overfills it.

use core::fmt;

use heapless::String;

/// Bounded, truncating string buffer
#[derive(Clone, PartialEq, Eq, Default, Hash)]
pub struct FixedText<const N: usize>(String<N>);

/// "HH:MM"
pub type TimeText = FixedText<5>;

/// "MM", the value that drives repaints
pub type MinuteText = FixedText<2>;

impl<const N: usize> FixedText<N> {
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Build from `s`, keeping as many whole characters as fit
    pub fn from_str_truncated(s: &str) -> Self {
        let mut text = Self::new();
        text.push_str_truncated(s);
        text
    }

    /// Append `s`, stopping at the last whole character that fits
    ///
    /// Returns `false` if anything was cut off.
    pub fn push_str_truncated(&mut self, s: &str) -> bool {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                return false;
            }
        }
        true
    }

    /// Append `value` in decimal, zero-padded to at least `width` digits
    ///
    /// Returns `false` if anything was cut off.
    pub fn push_padded(&mut self, value: u32, width: usize) -> bool {
        let mut digits = [b'0'; 10];
        let mut len = 0;
        let mut rest = value;
        loop {
            digits[len] = b'0' + (rest % 10) as u8;
            len += 1;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        let len = len.max(width.min(digits.len()));

        for &d in digits[..len].iter().rev() {
            if self.0.push(d as char).is_err() {
                return false;
            }
        }
        true
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> fmt::Debug for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for FixedText<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "defmt")]
impl<const N: usize> defmt::Format for FixedText<N> {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{=str}", self.as_str())
    }
}

impl<const N: usize> PartialEq<str> for FixedText<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for FixedText<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
