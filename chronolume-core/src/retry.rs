//! Bounded waiting and retry primitives
//!
//! Three patterns recur in the clock: poll a condition until a deadline,
//! retry an operation a fixed number of times with a pause between tries,
//! and ration a recovery action over the whole uptime.

use crate::traits::Clock;

/// Result of a bounded wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

impl WaitOutcome {
    pub fn is_ready(self) -> bool {
        self == WaitOutcome::Ready
    }
}

/// Poll a condition at a fixed interval until it holds or a timeout passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundedWait {
    pub interval_ms: u32,
    pub timeout_ms: u32,
}

impl BoundedWait {
    pub const fn new(interval_ms: u32, timeout_ms: u32) -> Self {
        Self {
            interval_ms,
            timeout_ms,
        }
    }

    /// Wait until `ready` returns true
    ///
    /// The condition is checked before every pause, so an already-true
    /// condition returns without delaying. Gives up once `timeout_ms` has
    /// elapsed since the call.
    pub async fn run<C, F>(&self, clock: &mut C, mut ready: F) -> WaitOutcome
    where
        C: Clock,
        F: FnMut() -> bool,
    {
        let start = clock.now_ms();
        loop {
            if ready() {
                return WaitOutcome::Ready;
            }
            if clock.now_ms().saturating_sub(start) >= self.timeout_ms as u64 {
                return WaitOutcome::TimedOut;
            }
            clock.delay_ms(self.interval_ms).await;
        }
    }
}

/// Fixed number of attempts with a pause after each failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetrySchedule {
    pub attempts: u8,
    pub delay_ms: u32,
}

impl RetrySchedule {
    pub const fn new(attempts: u8, delay_ms: u32) -> Self {
        Self { attempts, delay_ms }
    }

    /// Run `op` until it succeeds or the attempts are used up
    ///
    /// `op` receives the 1-based attempt number. On success returns the
    /// value and the attempt that produced it; otherwise the last error.
    /// At least one attempt is always made.
    pub async fn run<C, T, E, F>(&self, clock: &mut C, mut op: F) -> Result<(T, u8), E>
    where
        C: Clock,
        F: FnMut(u8) -> Result<T, E>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(attempt) {
                Ok(value) => return Ok((value, attempt)),
                Err(e) => {
                    clock.delay_ms(self.delay_ms).await;
                    if attempt >= attempts {
                        return Err(e);
                    }
                    attempt += 1;
                }
            }
        }
    }
}

/// Counter rationing a recovery action
///
/// Never refills: once spent, it stays spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetryBudget {
    max: u8,
    used: u8,
}

impl RetryBudget {
    pub const fn new(max: u8) -> Self {
        Self { max, used: 0 }
    }

    /// Spend one attempt, returning its 1-based number
    pub fn try_take(&mut self) -> Option<u8> {
        if self.used < self.max {
            self.used += 1;
            Some(self.used)
        } else {
            None
        }
    }

    pub fn used(&self) -> u8 {
        self.used
    }

    pub fn remaining(&self) -> u8 {
        self.max - self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.max
    }
}
