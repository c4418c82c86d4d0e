//! Connectivity manager
//!
//! Owns the WiFi link and the bounded waits around it: a long wait for the
//! first connection at boot and a shorter one for runtime reconnects.

use crate::config::{WIFI_POLL_INTERVAL_MS, WIFI_RECONNECT_TIMEOUT_MS};
use crate::retry::BoundedWait;
use crate::traits::{Clock, WifiLink};

/// Link state as last observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    Disconnected,
    /// Inside a bounded wait for the link
    Connecting,
    Connected,
}

/// WiFi connection supervisor
pub struct ConnectivityManager<W> {
    link: W,
    state: ConnectionState,
}

impl<W: WifiLink> ConnectivityManager<W> {
    pub fn new(link: W) -> Self {
        Self {
            link,
            state: ConnectionState::Disconnected,
        }
    }

    /// Last observed state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Query the link and record the answer
    pub fn poll_connected(&mut self) -> bool {
        let connected = self.link.is_connected();
        self.state = if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        connected
    }

    /// Join the network and wait up to `timeout_ms` for the link
    pub async fn connect<C: Clock>(
        &mut self,
        clock: &mut C,
        ssid: &str,
        password: &str,
        timeout_ms: u32,
    ) -> bool {
        info!("Connecting to WiFi network {}", ssid);
        self.link.begin(ssid, password);
        let connected = self.wait_for_link(clock, timeout_ms).await;
        if connected {
            info!("WiFi connected");
        } else {
            error!("WiFi connection failed after {} ms", timeout_ms);
        }
        connected
    }

    /// Reconnect if the link is down
    ///
    /// Returns immediately when already connected. Otherwise triggers a
    /// reconnect and waits up to [`WIFI_RECONNECT_TIMEOUT_MS`].
    pub async fn ensure_connected<C: Clock>(&mut self, clock: &mut C) -> bool {
        if self.poll_connected() {
            return true;
        }

        warn!("WiFi connection lost. Reconnecting...");
        self.link.reconnect();
        let connected = self.wait_for_link(clock, WIFI_RECONNECT_TIMEOUT_MS).await;
        if connected {
            info!("WiFi reconnected");
        } else {
            warn!("WiFi reconnection failed");
        }
        connected
    }

    async fn wait_for_link<C: Clock>(&mut self, clock: &mut C, timeout_ms: u32) -> bool {
        self.state = ConnectionState::Connecting;
        let link = &self.link;
        let outcome = BoundedWait::new(WIFI_POLL_INTERVAL_MS, timeout_ms)
            .run(clock, || link.is_connected())
            .await;

        let connected = outcome.is_ready();
        self.state = if connected {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        };
        connected
    }

    pub fn link(&self) -> &W {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut W {
        &mut self.link
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WIFI_CONNECT_TIMEOUT_MS;
    use crate::testing::{FakeWifi, SimClock};
    use embassy_futures::block_on;

    #[test]
    fn test_connect_succeeds_within_timeout() {
        let mut clock = SimClock::new();
        let mut manager = ConnectivityManager::new(FakeWifi::new(clock.handle(), Some(1_200)));

        let ok = block_on(manager.connect(&mut clock, "home", "secret", WIFI_CONNECT_TIMEOUT_MS));

        assert!(ok);
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.link().begins, vec![(String::from("home"), String::from("secret"))]);
        assert_eq!(clock.now_ms(), 1_500);
    }

    #[test]
    fn test_connect_times_out_after_fifteen_seconds() {
        let mut clock = SimClock::new();
        let mut manager = ConnectivityManager::new(FakeWifi::new(clock.handle(), None));

        let ok = block_on(manager.connect(&mut clock, "home", "secret", WIFI_CONNECT_TIMEOUT_MS));

        assert!(!ok);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(clock.now_ms(), 15_000);
        assert!(clock.delays.iter().all(|&d| d == 500));
    }

    #[test]
    fn test_ensure_connected_is_noop_when_up() {
        let mut clock = SimClock::new();
        let mut manager = ConnectivityManager::new(FakeWifi::new(clock.handle(), Some(0)));
        assert!(block_on(manager.connect(&mut clock, "a", "b", 1_000)));

        assert!(block_on(manager.ensure_connected(&mut clock)));
        assert_eq!(manager.link().reconnects, 0);
        assert!(clock.delays.is_empty());
    }

    #[test]
    fn test_ensure_connected_reconnects_dropped_link() {
        let mut clock = SimClock::new();
        let mut wifi = FakeWifi::new(clock.handle(), Some(2_000));
        wifi.reconnect_heals = true;
        let mut manager = ConnectivityManager::new(wifi);
        assert!(block_on(manager.connect(&mut clock, "a", "b", 15_000)));

        let now = clock.now_ms();
        manager.link_mut().drop_at = Some(now);
        assert!(!manager.poll_connected());

        assert!(block_on(manager.ensure_connected(&mut clock)));
        assert_eq!(manager.link().reconnects, 1);
        assert_eq!(clock.now_ms(), now + 2_000);
    }

    #[test]
    fn test_reconnect_gives_up_after_ten_seconds() {
        let mut clock = SimClock::new();
        let mut manager = ConnectivityManager::new(FakeWifi::new(clock.handle(), Some(0)));
        assert!(block_on(manager.connect(&mut clock, "a", "b", 15_000)));
        manager.link_mut().drop_at = Some(0);

        assert!(!block_on(manager.ensure_connected(&mut clock)));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(clock.now_ms(), 10_000);
    }
}
