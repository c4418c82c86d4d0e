//! Main loop controller
//!
//! Owns every collaborator and all loop state. `setup` runs the startup
//! sequence once; `poll` runs one loop iteration followed by the fixed
//! loop delay.

use chronolume_display::{ClockDisplay, DisplayError, TextDatum};

use crate::config::{
    ClockConfig, DisplayConfig, WifiConfig, LOOP_DELAY_MS, WIFI_CHECK_INTERVAL_MS,
    WIFI_CONNECT_TIMEOUT_MS,
};
use crate::connectivity::ConnectivityManager;
use crate::render::layout::BACKGROUND;
use crate::render::{RenderEngine, RenderOutcome};
use crate::state::{Event, FailureReason, StartupError, State};
use crate::status::{StatusMessage, StatusReporter};
use crate::time::{ResyncOutcome, TimeSource};
use crate::traits::{Clock, TimeService, WifiLink};

/// The clock application
pub struct Controller<W, T, D, C> {
    wifi: WifiConfig,
    display_config: DisplayConfig,
    connectivity: ConnectivityManager<W>,
    time: TimeSource<T>,
    display: D,
    clock: C,
    render: RenderEngine,
    status: StatusReporter,
    state: State,
    last_wifi_check_ms: u64,
}

impl<W, T, D, C> Controller<W, T, D, C>
where
    W: WifiLink,
    T: TimeService,
    D: ClockDisplay,
    C: Clock,
{
    pub fn new(config: ClockConfig, link: W, service: T, display: D, clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            wifi: config.wifi,
            display_config: config.display,
            connectivity: ConnectivityManager::new(link),
            time: TimeSource::new(service, config.ntp),
            display,
            clock,
            render: RenderEngine::new(&config.color_cycle, now),
            status: StatusReporter::new(),
            state: State::Booting,
            last_wifi_check_ms: now,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Startup: boot screen, WiFi, initial time sync
    ///
    /// Runs once; later calls report the earlier outcome. On failure the
    /// matching message is left on screen and the controller halts.
    pub async fn setup(&mut self) -> Result<(), StartupError> {
        match self.state {
            State::Booting => {}
            State::Halted(error) => return Err(error),
            _ => return Ok(()),
        }

        info!("Clock starting");
        if let Err(e) = self.prepare_display() {
            warn!("Display setup failed: {:?}", e);
        }
        self.state = self.state.transition(Event::DisplayReady);

        let connected = self
            .connectivity
            .connect(
                &mut self.clock,
                self.wifi.ssid.as_str(),
                self.wifi.password.as_str(),
                WIFI_CONNECT_TIMEOUT_MS,
            )
            .await;
        if !connected {
            return Err(self.halt(StartupError::WifiFailed));
        }
        self.last_wifi_check_ms = self.clock.now_ms();
        self.state = self.state.transition(Event::WifiConnected);

        match self.time.initial_sync(&mut self.clock).await {
            Ok(_) => {
                self.state = self.state.transition(Event::TimeSynced);
                if let Err(e) = self.display.fill_screen(BACKGROUND) {
                    warn!("Display error clearing boot screen: {:?}", e);
                }
                Ok(())
            }
            Err(_) => Err(self.halt(StartupError::TimeSyncFailed)),
        }
    }

    /// One loop iteration plus the loop delay
    ///
    /// Runs `setup` first if it has not run yet. A halted controller only
    /// sleeps.
    pub async fn poll(&mut self) -> State {
        if self.state == State::Booting {
            // Failure is recorded in the state
            let _ = self.setup().await;
        } else if self.state.is_running() {
            self.iterate().await;
        }
        self.clock.delay_ms(LOOP_DELAY_MS).await;
        self.state
    }

    /// Run forever
    pub async fn run(&mut self) {
        loop {
            self.poll().await;
        }
    }

    fn prepare_display(&mut self) -> Result<(), DisplayError> {
        self.display.init()?;
        debug!("Display initialized");
        self.display.set_rotation(self.display_config.rotation)?;
        self.display.set_text_datum(TextDatum::MiddleCentre);
        self.display.set_backlight(true)?;
        debug!("Backlight on");
        let now = self.clock.now_ms();
        self.status
            .show_screen(&mut self.display, StatusMessage::Initializing, now)
    }

    fn halt(&mut self, error: StartupError) -> StartupError {
        error!("Startup failed: {:?}", error);
        let now = self.clock.now_ms();
        if let Err(e) = self
            .status
            .show_screen(&mut self.display, StatusMessage::for_startup(error), now)
        {
            warn!("Display error showing startup failure: {:?}", e);
        }
        let event = match error {
            StartupError::WifiFailed => Event::WifiFailed,
            StartupError::TimeSyncFailed => Event::TimeSyncFailed,
        };
        self.state = self.state.transition(event);
        error
    }

    async fn iterate(&mut self) {
        let now = self.clock.now_ms();
        if now.saturating_sub(self.last_wifi_check_ms) >= WIFI_CHECK_INTERVAL_MS {
            self.connectivity.ensure_connected(&mut self.clock).await;
            self.last_wifi_check_ms = self.clock.now_ms();
        }

        match self.time.local_time() {
            Ok(time) => {
                self.state = self.state.transition(Event::TimeRead);
                let now = self.clock.now_ms();
                match self.render.render(&mut self.display, &time, now) {
                    Ok(RenderOutcome::Repainted(text)) => {
                        info!("Updating display with time: {}", text);
                        self.status.clear();
                    }
                    Ok(RenderOutcome::Unchanged) => {}
                    Err(e) => warn!("Display error drawing time: {:?}", e),
                }
            }
            Err(_) => {
                warn!("Failed to obtain time");
                let reason = self.classify_failure();
                let next = self.state.transition(Event::TimeUnavailable(reason));
                if next != self.state && reason == FailureReason::SyncExhausted {
                    error!("Max time sync retries reached");
                }
                self.state = next;

                let now = self.clock.now_ms();
                match self.status.report(&mut self.display, reason, now) {
                    // The message covers the face; redraw the time once it is back
                    Ok(true) => self.render.invalidate(),
                    Ok(false) => {}
                    Err(e) => {
                        warn!("Display error drawing status: {:?}", e);
                        self.render.invalidate();
                    }
                }
            }
        }
    }

    /// No WiFi wins over sync problems; with WiFi up, spend a resync
    fn classify_failure(&mut self) -> FailureReason {
        if !self.connectivity.poll_connected() {
            return FailureReason::NoNetwork;
        }
        match self.time.resync() {
            ResyncOutcome::Requested(_) => FailureReason::Resyncing,
            ResyncOutcome::Exhausted => FailureReason::SyncExhausted,
        }
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn connectivity(&self) -> &ConnectivityManager<W> {
        &self.connectivity
    }

    pub fn connectivity_mut(&mut self) -> &mut ConnectivityManager<W> {
        &mut self.connectivity
    }

    pub fn time_source(&self) -> &TimeSource<T> {
        &self.time
    }

    pub fn time_source_mut(&mut self) -> &mut TimeSource<T> {
        &mut self.time
    }

    pub fn render_engine(&self) -> &RenderEngine {
        &self.render
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }
}
