//! Monotonic time and delays

/// Monotonic millisecond clock with an async delay
pub trait Clock {
    /// Milliseconds since boot
    fn now_ms(&self) -> u64;

    /// Suspend the caller for `ms` milliseconds
    async fn delay_ms(&mut self, ms: u32);
}
