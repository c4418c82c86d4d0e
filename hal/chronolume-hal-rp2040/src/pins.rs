//! Dynamic pin allocation for config-driven hardware setup
//!
//! The panel and radio pins are fixed by the board. Spare GPIOs are
//! deposited into a [`PinBank`] so that pins named in `clock.toml`
//! (currently the backlight) can be taken by number at runtime.

use embassy_rp::gpio::AnyPin;
use embassy_rp::Peri;

/// Number of GPIOs on the RP2040
pub const GPIO_COUNT: usize = 30;

/// Error when requesting a pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinError {
    /// Pin number out of range (0-29 valid)
    InvalidPin,
    /// Pin already taken, or never deposited because the board uses it
    Unavailable,
}

/// Pin bank that holds spare GPIO pins and allows taking them by number
pub struct PinBank {
    pins: [Option<Peri<'static, AnyPin>>; GPIO_COUNT],
}

impl Default for PinBank {
    fn default() -> Self {
        Self::new()
    }
}

impl PinBank {
    /// Create an empty pin bank
    pub fn new() -> Self {
        Self {
            pins: [const { None }; GPIO_COUNT],
        }
    }

    /// Deposit a spare pin under its GPIO number
    ///
    /// Out-of-range numbers are ignored.
    pub fn deposit(&mut self, pin_num: u8, pin: Peri<'static, AnyPin>) {
        if (pin_num as usize) < GPIO_COUNT {
            self.pins[pin_num as usize] = Some(pin);
        }
    }

    /// Take a pin by number
    ///
    /// Returns the pin if available, or an error if:
    /// - Pin number is invalid (>= 30)
    /// - Pin was already taken or reserved by the board
    pub fn take(&mut self, pin_num: u8) -> Result<Peri<'static, AnyPin>, PinError> {
        if pin_num as usize >= GPIO_COUNT {
            return Err(PinError::InvalidPin);
        }
        self.pins[pin_num as usize]
            .take()
            .ok_or(PinError::Unavailable)
    }
}
