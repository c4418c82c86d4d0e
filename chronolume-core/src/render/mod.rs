//! Clock face rendering
//!
//! The face is a single "HH:MM" string centered on the panel. It is only
//! repainted when the minute changes, and its color steps through a fixed
//! palette on a configurable interval.

pub mod colors;
pub mod engine;
pub mod layout;

pub use colors::{ColorCycle, DEFAULT_COLOR, PALETTE};
pub use engine::{RenderCache, RenderEngine, RenderOutcome};
