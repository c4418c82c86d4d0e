//! WiFi link backed by the CYW43 task
//!
//! Joining takes seconds, so `begin` and `reconnect` only hand a command to
//! [`crate::tasks::wifi_task`]. The controller's bounded waits then poll
//! [`WIFI_UP`].

use chronolume_core::traits::WifiLink;
use defmt::*;
use portable_atomic::Ordering;

use crate::channels::{Credentials, WifiCommand, WIFI_COMMAND, WIFI_UP};

pub struct CywWifiLink;

impl WifiLink for CywWifiLink {
    fn begin(&mut self, ssid: &str, password: &str) {
        let mut credentials = Credentials::default();
        if credentials.ssid.push_str(ssid).is_err()
            || credentials.password.push_str(password).is_err()
        {
            error!("WiFi credentials too long");
            return;
        }
        WIFI_COMMAND.signal(WifiCommand::Join(credentials));
    }

    fn is_connected(&self) -> bool {
        WIFI_UP.load(Ordering::Relaxed)
    }

    fn reconnect(&mut self) {
        WIFI_COMMAND.signal(WifiCommand::Reconnect);
    }
}
