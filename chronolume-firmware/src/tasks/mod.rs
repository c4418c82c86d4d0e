//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod net;
pub mod ntp;
pub mod wifi;

pub use net::{cyw43_task, net_task};
pub use ntp::ntp_task;
pub use wifi::wifi_task;
