//! Configuration types
//!
//! The clock is configured by a small TOML file embedded in the firmware
//! image. Parsing happens on the device without an allocator.

pub mod parse;
pub mod timing;
pub mod types;

pub use parse::{parse_config, ParseError};
pub use timing::*;
pub use types::*;
