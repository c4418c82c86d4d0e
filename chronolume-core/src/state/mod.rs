//! Clock lifecycle state machine
//!
//! Startup is a straight line through the display, WiFi and time. Any
//! startup failure halts the clock for good; runtime failures flip between
//! showing the time and showing a diagnostic.

pub mod events;
pub mod machine;

pub use events::Event;
pub use machine::{FailureReason, StartupError, State};
