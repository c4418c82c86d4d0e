//! RP2040-specific HAL for the clock firmware
//!
//! This crate provides RP2040 implementations of the shared
//! `chronolume-hal` traits, plus board plumbing:
//!
//! - Output pin wrapper (implements `chronolume_hal::OutputPin`)
//! - Blocking SPI wrapper (implements `chronolume_hal::SpiBus`)
//! - Pin bank for config-driven pin assignment (backlight)

#![no_std]

pub use chronolume_hal as hal;

pub mod gpio;
pub mod pins;
pub mod spi;

pub use gpio::RpOutput;
pub use pins::{PinBank, PinError};
pub use spi::RpSpi;
