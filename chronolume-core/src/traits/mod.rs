//! Collaborator abstraction traits
//!
//! These traits define the interface between the clock logic and the
//! platform. The firmware implements them over cyw43, SNTP and embassy
//! timers; tests implement them with scripted fakes.

pub mod clock;
pub mod network;
pub mod time;

pub use chronolume_display::ClockDisplay;
pub use clock::Clock;
pub use network::WifiLink;
pub use time::{TimeError, TimeService};
