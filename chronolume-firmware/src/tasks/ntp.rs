//! SNTP task
//!
//! Waits for a sync request, resolves the server and queries it over UDP.
//! A successful answer replaces [`TIME_BASE`]. After the first request the
//! task also refreshes in the background, so drift stays bounded without
//! the controller asking.

use core::net::{IpAddr, SocketAddr};

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_net::dns::DnsQueryType;
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Instant, Timer};
use sntpc::{get_time, NtpContext, NtpTimestampGenerator};

use chronolume_core::config::{INITIAL_SYNC_ATTEMPTS, INITIAL_SYNC_RETRY_DELAY_MS};

use crate::channels::{TimeBase, NTP_REQUEST, TIME_BASE};

const NTP_PORT: u16 = 123;

/// Bound on one attempt, DNS lookup included
const SNTP_TIMEOUT: Duration = Duration::from_secs(3);

/// Requests per sync before giving up until the next trigger
const SNTP_ATTEMPTS: u8 = 3;

const SNTP_RETRY_DELAY: Duration = Duration::from_secs(1);

// A lost first packet must leave room for a second attempt inside the
// controller's startup read window
const _: () = assert!(
    2 * SNTP_TIMEOUT.as_millis() + SNTP_RETRY_DELAY.as_millis()
        < INITIAL_SYNC_ATTEMPTS as u64 * INITIAL_SYNC_RETRY_DELAY_MS as u64
);

/// Background refresh period
const SNTP_REFRESH: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
enum SntpError {
    /// DNS failed or returned nothing
    Resolve,
    /// Could not bind the UDP socket
    Socket,
    /// Malformed or rejected response
    Request,
    /// No answer in time
    Timeout,
}

/// Origin timestamps for requests; only echoed back by the server
#[derive(Clone, Copy)]
struct EmbassyTimestampGen {
    at: Instant,
}

impl NtpTimestampGenerator for EmbassyTimestampGen {
    fn init(&mut self) {
        self.at = Instant::now();
    }

    fn timestamp_sec(&self) -> u64 {
        self.at.as_secs()
    }

    fn timestamp_subsec_micros(&self) -> u32 {
        (self.at.as_micros() % 1_000_000) as u32
    }
}

#[embassy_executor::task]
pub async fn ntp_task(stack: Stack<'static>) -> ! {
    info!("SNTP task started");

    let mut server = NTP_REQUEST.wait().await.server;

    loop {
        sync(stack, server.as_str()).await;

        match select(NTP_REQUEST.wait(), Timer::after(SNTP_REFRESH)).await {
            Either::First(request) => server = request.server,
            Either::Second(()) => debug!("Scheduled SNTP refresh"),
        }
    }
}

async fn sync(stack: Stack<'static>, server: &str) {
    for attempt in 1..=SNTP_ATTEMPTS {
        match fetch_unix_time(stack, server).await {
            Ok(unix_secs) => {
                TIME_BASE.lock(|cell| {
                    cell.set(Some(TimeBase {
                        unix_secs,
                        at: Instant::now(),
                    }))
                });
                info!("SNTP time from {}: {}", server, unix_secs);
                return;
            }
            Err(e) => {
                warn!("SNTP attempt {} to {} failed: {:?}", attempt, server, e);
                if attempt < SNTP_ATTEMPTS {
                    Timer::after(SNTP_RETRY_DELAY).await;
                }
            }
        }
    }
}

async fn fetch_unix_time(stack: Stack<'static>, server: &str) -> Result<i64, SntpError> {
    with_timeout(SNTP_TIMEOUT, query(stack, server))
        .await
        .map_err(|_| SntpError::Timeout)?
}

async fn query(stack: Stack<'static>, server: &str) -> Result<i64, SntpError> {
    let addrs = stack
        .dns_query(server, DnsQueryType::A)
        .await
        .map_err(|_| SntpError::Resolve)?;
    let addr: IpAddr = addrs.first().copied().ok_or(SntpError::Resolve)?.into();

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; 256];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; 256];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(|_| SntpError::Socket)?;

    let context = NtpContext::new(EmbassyTimestampGen { at: Instant::now() });
    let result = get_time(SocketAddr::from((addr, NTP_PORT)), &socket, context)
        .await
        .map_err(|_| SntpError::Request)?;

    Ok(result.sec() as i64)
}
