//! WiFi task
//!
//! Executes join/reconnect commands and publishes the link state. The link
//! counts as up once the radio is associated and DHCP has configured an
//! address.

use cyw43::{Control, JoinOptions};
use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::Stack;
use embassy_time::{Duration, Timer};
use portable_atomic::Ordering;

use crate::channels::{Credentials, WifiCommand, WIFI_COMMAND, WIFI_UP};

/// How often the published link state is refreshed
const LINK_POLL: Duration = Duration::from_millis(250);

#[embassy_executor::task]
pub async fn wifi_task(mut control: Control<'static>, stack: Stack<'static>) -> ! {
    info!("WiFi task started");

    let mut remembered: Option<Credentials> = None;

    loop {
        match select(WIFI_COMMAND.wait(), Timer::after(LINK_POLL)).await {
            Either::First(WifiCommand::Join(credentials)) => {
                join(&mut control, &credentials).await;
                remembered = Some(credentials);
            }
            Either::First(WifiCommand::Reconnect) => match &remembered {
                Some(credentials) => {
                    control.leave().await;
                    join(&mut control, credentials).await;
                }
                None => warn!("Reconnect requested before any join"),
            },
            Either::Second(()) => {}
        }

        let up = stack.is_link_up() && stack.is_config_up();
        if WIFI_UP.swap(up, Ordering::Relaxed) != up {
            match stack.config_v4() {
                Some(config) if up => info!("WiFi up, address {}", config.address),
                _ => info!("WiFi link {}", if up { "up" } else { "down" }),
            }
        }
    }
}

async fn join(control: &mut Control<'static>, credentials: &Credentials) {
    info!("Joining {}", credentials.ssid.as_str());

    let options = if credentials.password.is_empty() {
        JoinOptions::new_open()
    } else {
        JoinOptions::new(credentials.password.as_bytes())
    };

    match control.join(credentials.ssid.as_str(), options).await {
        Ok(()) => info!("Associated with {}, waiting for DHCP", credentials.ssid.as_str()),
        Err(e) => warn!("WiFi join failed: status={}", e.status),
    }
}
