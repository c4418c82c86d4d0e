//! Network time service abstraction

use crate::time::LocalTime;

/// Errors reading local time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeError {
    /// No successful synchronization yet
    NotSynced,
}

/// Platform time service
pub trait TimeService {
    /// Begin (or restart) synchronization against `server`, applying the
    /// given offsets to every subsequent local-time read
    fn start_sync(&mut self, utc_offset_s: i32, dst_offset_s: i32, server: &str);

    /// Current local calendar time
    fn local_time(&self) -> Result<LocalTime, TimeError>;
}
