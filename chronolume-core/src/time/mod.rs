//! Wall-clock time
//!
//! Calendar conversion and the time source built on top of a
//! [`TimeService`](crate::traits::TimeService).

pub mod local;
pub mod source;

pub use local::{LocalTime, Weekday};
pub use source::{ResyncOutcome, TimeSource};
