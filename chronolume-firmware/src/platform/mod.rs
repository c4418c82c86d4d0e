//! Embassy implementations of the core collaborator traits

pub mod clock;
pub mod time;
pub mod wifi;

pub use clock::EmbassyClock;
pub use time::SntpTimeService;
pub use wifi::CywWifiLink;
