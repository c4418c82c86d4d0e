//! WiFi link abstraction

/// Station-mode WiFi link
///
/// Connection requests are fire-and-forget; callers poll
/// [`WifiLink::is_connected`] to learn the outcome.
pub trait WifiLink {
    /// Start joining the network with the given credentials
    fn begin(&mut self, ssid: &str, password: &str);

    /// Whether the link is up with an address assigned
    fn is_connected(&self) -> bool;

    /// Drop the current association and join again with the last credentials
    fn reconnect(&mut self);
}
