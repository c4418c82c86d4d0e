//! Display abstraction and TFT driver for Chronolume
//!
//! This crate provides:
//! - `ClockDisplay` trait: the drawing surface the clock logic renders onto
//! - `St7789` driver for the 170x320 IPS panel wired over SPI
//! - `Scaled` draw-target adapter used for the large clock digits
//!
//! # Architecture
//!
//! The clock core only ever talks to `ClockDisplay`. On the board this is
//! the `St7789` driver; in host tests it is a recording fake. Drawing
//! primitives come from `embedded-graphics`, so colors, points and
//! rectangles are its types re-exported here.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod backend;
pub mod scaled;
pub mod st7789;

// Re-export key types
pub use backend::{ClockDisplay, DisplayError, FontSize, Rotation, TextDatum};
pub use embedded_graphics::geometry::{Point, Size};
pub use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
pub use embedded_graphics::primitives::Rectangle;
pub use scaled::Scaled;
pub use st7789::{PanelConfig, St7789};
