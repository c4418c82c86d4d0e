//! Scripted fakes for host tests
//!
//! All fakes share one simulated millisecond counter, so WiFi and time
//! availability can be scripted against the same timeline the controller
//! advances through its delays.

use std::cell::Cell;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use chronolume_display::{
    ClockDisplay, DisplayError, FontSize, Point, Rectangle, Rgb565, Rotation, Size, TextDatum,
};

use crate::time::LocalTime;
use crate::traits::{Clock, TimeError, TimeService, WifiLink};

/// Shared simulated time
#[derive(Clone, Default)]
pub struct SimTime(Rc<Cell<u64>>);

impl SimTime {
    pub fn now_ms(&self) -> u64 {
        self.0.get()
    }

    pub fn advance(&self, ms: u64) {
        self.0.set(self.0.get() + ms);
    }
}

/// Clock whose delays advance simulated time instantly
#[derive(Clone, Default)]
pub struct SimClock {
    time: SimTime,
    pub delays: Vec<u32>,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> SimTime {
        self.time.clone()
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.time.now_ms()
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
        self.time.advance(ms as u64);
    }
}

/// WiFi link that is up inside a scripted window of simulated time
pub struct FakeWifi {
    time: SimTime,
    /// Link comes up this long after `begin`; `None` never connects
    pub join_delay_ms: Option<u64>,
    /// Link drops at this instant
    pub drop_at: Option<u64>,
    /// Whether `reconnect` restores a dropped link after `join_delay_ms`
    pub reconnect_heals: bool,
    up_from: Option<u64>,
    pub begins: Vec<(String, String)>,
    pub reconnects: u32,
}

impl FakeWifi {
    pub fn new(time: SimTime, join_delay_ms: Option<u64>) -> Self {
        Self {
            time,
            join_delay_ms,
            drop_at: None,
            reconnect_heals: false,
            up_from: None,
            begins: Vec::new(),
            reconnects: 0,
        }
    }

    fn schedule_up(&mut self) {
        self.up_from = self.join_delay_ms.map(|d| self.time.now_ms() + d);
    }
}

impl WifiLink for FakeWifi {
    fn begin(&mut self, ssid: &str, password: &str) {
        self.begins.push((ssid.into(), password.into()));
        self.schedule_up();
    }

    fn is_connected(&self) -> bool {
        let now = self.time.now_ms();
        let up = self.up_from.is_some_and(|t| now >= t);
        let dropped = self.drop_at.is_some_and(|t| now >= t);
        up && !dropped
    }

    fn reconnect(&mut self) {
        self.reconnects += 1;
        if self.reconnect_heals {
            self.drop_at = None;
            self.schedule_up();
        }
    }
}

/// Time service with scripted sync latency and outages
pub struct FakeTime {
    time: SimTime,
    /// Unix seconds at simulated time zero
    pub base_unix: i64,
    /// Time becomes readable this long after `start_sync`; `None` never syncs
    pub sync_delay_ms: Option<u64>,
    /// Reads fail from this instant on, regardless of sync
    pub lost_from: Option<u64>,
    offset_s: i32,
    available_from: Option<u64>,
    pub sync_requests: Vec<(i32, i32, String)>,
}

impl FakeTime {
    pub fn new(time: SimTime, base_unix: i64, sync_delay_ms: Option<u64>) -> Self {
        Self {
            time,
            base_unix,
            sync_delay_ms,
            lost_from: None,
            offset_s: 0,
            available_from: None,
            sync_requests: Vec::new(),
        }
    }
}

impl TimeService for FakeTime {
    fn start_sync(&mut self, utc_offset_s: i32, dst_offset_s: i32, server: &str) {
        self.sync_requests
            .push((utc_offset_s, dst_offset_s, server.into()));
        self.offset_s = utc_offset_s + dst_offset_s;
        if self.available_from.is_none() {
            self.available_from = self.sync_delay_ms.map(|d| self.time.now_ms() + d);
        }
    }

    fn local_time(&self) -> Result<LocalTime, TimeError> {
        let now = self.time.now_ms();
        if self.lost_from.is_some_and(|t| now >= t) {
            return Err(TimeError::NotSynced);
        }
        match self.available_from {
            Some(t) if now >= t => Ok(LocalTime::from_unix(
                self.base_unix + (now / 1000) as i64,
                self.offset_s,
            )),
            _ => Err(TimeError::NotSynced),
        }
    }
}

/// Everything a [`RecordingDisplay`] was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOp {
    Init,
    Rotation(Rotation),
    Backlight(bool),
    FillScreen(Rgb565),
    FillRect(Rectangle, Rgb565),
    TextColor(Rgb565, Rgb565),
    Datum(TextDatum),
    Text(String, Point, FontSize),
    StartWrite,
    EndWrite,
}

/// Display fake that records operations
#[derive(Default)]
pub struct RecordingDisplay {
    pub ops: Vec<DisplayOp>,
    /// Fail every fill with a communication error
    pub fail_fills: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every string drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DisplayOp::Text(s, _, _) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_text(&self, text: &str) -> usize {
        self.texts().iter().filter(|t| **t == text).count()
    }

    pub fn last_text(&self) -> Option<&str> {
        self.texts().last().copied()
    }

    /// Most recent text color pair
    pub fn last_text_color(&self) -> Option<(Rgb565, Rgb565)> {
        self.ops.iter().rev().find_map(|op| match op {
            DisplayOp::TextColor(fg, bg) => Some((*fg, *bg)),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }
}

impl ClockDisplay for RecordingDisplay {
    fn init(&mut self) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::Init);
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::Rotation(rotation));
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::Backlight(on));
        Ok(())
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        if self.fail_fills {
            return Err(DisplayError::Communication);
        }
        self.ops.push(DisplayOp::FillScreen(color));
        Ok(())
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        if self.fail_fills {
            return Err(DisplayError::Communication);
        }
        self.ops.push(DisplayOp::FillRect(area, color));
        Ok(())
    }

    fn set_text_color(&mut self, foreground: Rgb565, background: Rgb565) {
        self.ops.push(DisplayOp::TextColor(foreground, background));
    }

    fn set_text_datum(&mut self, datum: TextDatum) {
        self.ops.push(DisplayOp::Datum(datum));
    }

    fn draw_string(&mut self, text: &str, at: Point, font: FontSize) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::Text(text.into(), at, font));
        Ok(())
    }

    fn start_write(&mut self) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::StartWrite);
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), DisplayError> {
        self.ops.push(DisplayOp::EndWrite);
        Ok(())
    }

    fn size(&self) -> Size {
        Size::new(320, 170)
    }
}
