//! Inter-task communication
//!
//! The controller runs in `main` and talks to the radio and SNTP tasks
//! only through these statics. Requests are signals (latest wins); state
//! flowing back is a flag and a blocking-mutex cell the controller can
//! read without awaiting.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_time::Instant;
use heapless::String;
use portable_atomic::AtomicBool;

use chronolume_core::config::{MAX_HOST_LEN, MAX_PASSWORD_LEN, MAX_SSID_LEN};

/// Network credentials handed to the WiFi task
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
}

/// Requests for the WiFi task
#[derive(Debug, Clone)]
pub enum WifiCommand {
    /// Join a network and remember its credentials
    Join(Credentials),
    /// Leave and rejoin the remembered network
    Reconnect,
}

/// Request for the SNTP task
#[derive(Debug, Clone)]
pub struct SyncRequest {
    pub server: String<MAX_HOST_LEN>,
}

/// Last SNTP answer, anchored to the monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct TimeBase {
    /// Unix seconds reported by the server
    pub unix_secs: i64,
    /// When the answer arrived
    pub at: Instant,
}

impl TimeBase {
    /// Unix seconds now, advanced by the monotonic clock
    pub fn now_unix(&self) -> i64 {
        self.unix_secs + self.at.elapsed().as_secs() as i64
    }
}

/// WiFi join/reconnect requests (from controller)
pub static WIFI_COMMAND: Signal<CriticalSectionRawMutex, WifiCommand> = Signal::new();

/// Link associated and DHCP-configured (maintained by the WiFi task)
pub static WIFI_UP: AtomicBool = AtomicBool::new(false);

/// SNTP sync requests (from controller)
pub static NTP_REQUEST: Signal<CriticalSectionRawMutex, SyncRequest> = Signal::new();

/// Latest time base; `None` until the first successful sync
pub static TIME_BASE: Mutex<CriticalSectionRawMutex, Cell<Option<TimeBase>>> =
    Mutex::new(Cell::new(None));
