//! Chronolume Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the display driver
//! and clock logic need. Chip-specific crates implement them so the same
//! drivers run on the board and under host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ chronolume-display / chronolume-firmware │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌──────────────────────────────────────────┐
//! │  chronolume-hal (this crate - traits)    │
//! └──────────────────────────────────────────┘
//!                     │
//!                     ▼
//!          ┌─────────────────────┐
//!          │ chronolume-hal-     │
//!          │     rp2040          │
//!          └─────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital outputs (chip select, data/command, backlight)
//! - [`spi::SpiBus`] - Write-only SPI master used by the TFT

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::{SpiBus, SpiConfig};
