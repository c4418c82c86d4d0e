//! Time service backed by the SNTP task

use chronolume_core::time::LocalTime;
use chronolume_core::traits::{TimeError, TimeService};
use defmt::*;
use heapless::String;

use crate::channels::{SyncRequest, NTP_REQUEST, TIME_BASE};

/// Local time from the last SNTP answer plus elapsed monotonic time
#[derive(Default)]
pub struct SntpTimeService {
    offset_s: i32,
}

impl SntpTimeService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TimeService for SntpTimeService {
    fn start_sync(&mut self, utc_offset_s: i32, dst_offset_s: i32, server: &str) {
        self.offset_s = utc_offset_s + dst_offset_s;

        let mut host = String::new();
        if host.push_str(server).is_err() {
            error!("NTP server name too long");
            return;
        }
        NTP_REQUEST.signal(SyncRequest { server: host });
    }

    fn local_time(&self) -> Result<LocalTime, TimeError> {
        let base = TIME_BASE.lock(|cell| cell.get()).ok_or(TimeError::NotSynced)?;
        Ok(LocalTime::from_unix(base.now_unix(), self.offset_s))
    }
}
