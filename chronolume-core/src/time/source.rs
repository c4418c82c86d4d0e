//! Time source
//!
//! Wraps the platform [`TimeService`] with the clock's sync policy: a
//! bounded number of reads at startup, and a small resync budget for the
//! rest of the uptime.

use crate::config::{NtpConfig, INITIAL_SYNC_ATTEMPTS, INITIAL_SYNC_RETRY_DELAY_MS, MAX_RESYNC_ATTEMPTS};
use crate::retry::{RetryBudget, RetrySchedule};
use crate::traits::{Clock, TimeError, TimeService};

use super::LocalTime;

/// What a resync request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResyncOutcome {
    /// A new sync was started; carries the 1-based attempt number
    Requested(u8),
    /// The budget is spent; nothing was done
    Exhausted,
}

/// Time source with startup and runtime sync policy
pub struct TimeSource<T> {
    service: T,
    ntp: NtpConfig,
    initial: RetrySchedule,
    resync: RetryBudget,
}

impl<T: TimeService> TimeSource<T> {
    pub fn new(service: T, ntp: NtpConfig) -> Self {
        Self {
            service,
            ntp,
            initial: RetrySchedule::new(INITIAL_SYNC_ATTEMPTS, INITIAL_SYNC_RETRY_DELAY_MS),
            resync: RetryBudget::new(MAX_RESYNC_ATTEMPTS),
        }
    }

    /// Ask the service to synchronize using the configured server and offsets
    pub fn start_sync(&mut self) {
        self.service.start_sync(
            self.ntp.utc_offset_s,
            self.ntp.dst_offset_s,
            self.ntp.server.as_str(),
        );
    }

    /// Current local time, if synchronized
    pub fn local_time(&self) -> Result<LocalTime, TimeError> {
        self.service.local_time()
    }

    /// Startup sync: request a sync, then read up to five times, pausing
    /// two seconds after each failed read
    ///
    /// Returns the first successful reading and the attempt that produced it.
    pub async fn initial_sync<C: Clock>(&mut self, clock: &mut C) -> Result<(LocalTime, u8), TimeError> {
        info!("Synchronizing time with {}", self.ntp.server.as_str());
        self.start_sync();

        let service = &self.service;
        let result = self
            .initial
            .run(clock, |attempt| {
                let reading = service.local_time();
                if reading.is_err() {
                    debug!("Waiting for time sync... attempt {}", attempt);
                }
                reading
            })
            .await;

        match &result {
            Ok((_, attempt)) => info!("Time synchronized after {} attempts", attempt),
            Err(_) => error!("Failed to obtain time"),
        }
        result
    }

    /// Runtime resync, limited to three requests per boot
    pub fn resync(&mut self) -> ResyncOutcome {
        match self.resync.try_take() {
            Some(attempt) => {
                info!("Attempting to resync time... attempt {}", attempt);
                self.start_sync();
                ResyncOutcome::Requested(attempt)
            }
            None => ResyncOutcome::Exhausted,
        }
    }

    /// Resync requests made so far
    pub fn resync_attempts(&self) -> u8 {
        self.resync.used()
    }

    pub fn service(&self) -> &T {
        &self.service
    }

    pub fn service_mut(&mut self) -> &mut T {
        &mut self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTime, SimClock};
    use embassy_futures::block_on;

    const NOON_UTC: i64 = 1_700_000_000 - 1_700_000_000 % 86_400 + 12 * 3600;

    fn source(clock: &SimClock, sync_delay_ms: Option<u64>) -> TimeSource<FakeTime> {
        TimeSource::new(
            FakeTime::new(clock.handle(), NOON_UTC, sync_delay_ms),
            NtpConfig::default(),
        )
    }

    #[test]
    fn test_initial_sync_first_read() {
        let mut clock = SimClock::new();
        let mut time = source(&clock, Some(0));
        let (reading, attempt) = block_on(time.initial_sync(&mut clock)).unwrap();

        assert_eq!(attempt, 1);
        // Default offsets add two hours
        assert_eq!(reading.hh_mm(), "14:00");
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(
            time.service().sync_requests,
            vec![(3600, 3600, "pool.ntp.org".into())]
        );
    }

    #[test]
    fn test_initial_sync_succeeds_on_third_read() {
        let mut clock = SimClock::new();
        let mut time = source(&clock, Some(3_000));
        let (_, attempt) = block_on(time.initial_sync(&mut clock)).unwrap();

        // Reads at 0, 2000, 4000
        assert_eq!(attempt, 3);
        assert_eq!(clock.now_ms(), 4_000);
    }

    #[test]
    fn test_initial_sync_gives_up_after_five_reads() {
        let mut clock = SimClock::new();
        let mut time = source(&clock, None);
        let result = block_on(time.initial_sync(&mut clock));

        assert_eq!(result, Err(TimeError::NotSynced));
        assert_eq!(clock.delays, vec![2_000; 5]);
    }

    #[test]
    fn test_resync_budget_is_three_per_boot() {
        let clock = SimClock::new();
        let mut time = source(&clock, None);

        assert_eq!(time.resync(), ResyncOutcome::Requested(1));
        assert_eq!(time.resync(), ResyncOutcome::Requested(2));
        assert_eq!(time.resync(), ResyncOutcome::Requested(3));
        assert_eq!(time.resync(), ResyncOutcome::Exhausted);
        assert_eq!(time.resync(), ResyncOutcome::Exhausted);
        assert_eq!(time.resync_attempts(), 3);
        assert_eq!(time.service().sync_requests.len(), 3);
    }
}
