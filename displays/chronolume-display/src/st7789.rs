//! ST7789 TFT Display Driver
//!
//! Driver for ST7789-based IPS panels over a write-only SPI bus with a
//! separate data/command line. Pixels are streamed straight to panel RAM
//! in RGB565, so no frame buffer is kept on the MCU.

use chronolume_hal::{OutputPin, SpiBus};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::geometry::{Dimensions, OriginDimensions, Point, Size};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_8X13};
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::{IntoStorage, Rgb565, RgbColor};
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::text::Text;
use embedded_graphics::{Drawable, Pixel};
use embedded_hal::delay::DelayNs;

use crate::backend::{ClockDisplay, DisplayError, FontSize, Rotation, TextDatum};
use crate::scaled::Scaled;

/// Scale applied to the 10x20 font for [`FontSize::Large`]
pub const LARGE_FONT_SCALE: u32 = 4;

/// Pixels staged per SPI write when streaming a solid color
const CHUNK_PIXELS: usize = 64;

/// ST7789 commands
#[allow(dead_code)]
mod cmd {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// MADCTL bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
}

/// 16 bits per pixel, 65k colors
const COLMOD_RGB565: u8 = 0x55;

/// Physical panel geometry in portrait orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelConfig {
    pub width: u16,
    pub height: u16,
    /// Column where the visible area starts in controller RAM
    pub col_offset: u16,
    /// Row where the visible area starts in controller RAM
    pub row_offset: u16,
}

impl PanelConfig {
    /// 1.9" 170x320 panel, centered in the controller's 240 columns
    pub const ST7789_170X320: Self = Self {
        width: 170,
        height: 320,
        col_offset: 35,
        row_offset: 0,
    };
}

/// ST7789 driver
pub struct St7789<SPI, DC, CS, RST, BL, D> {
    spi: SPI,
    dc: DC,
    cs: CS,
    rst: RST,
    backlight: BL,
    delay: D,
    panel: PanelConfig,
    rotation: Rotation,
    foreground: Rgb565,
    background: Rgb565,
    datum: TextDatum,
    /// Inside a `start_write` batch; CS stays asserted
    in_write: bool,
    ready: bool,
}

impl<SPI, DC, CS, RST, BL, D> St7789<SPI, DC, CS, RST, BL, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    /// Create a new ST7789 driver; call [`ClockDisplay::init`] before drawing
    pub fn new(
        spi: SPI,
        dc: DC,
        cs: CS,
        rst: RST,
        backlight: BL,
        delay: D,
        panel: PanelConfig,
    ) -> Self {
        Self {
            spi,
            dc,
            cs,
            rst,
            backlight,
            delay,
            panel,
            rotation: Rotation::Portrait,
            foreground: Rgb565::WHITE,
            background: Rgb565::BLACK,
            datum: TextDatum::TopLeft,
            in_write: false,
            ready: false,
        }
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    fn madctl(rotation: Rotation) -> u8 {
        match rotation {
            Rotation::Portrait => 0,
            Rotation::Landscape => madctl::MX | madctl::MV,
            Rotation::PortraitFlipped => madctl::MX | madctl::MY,
            Rotation::LandscapeFlipped => madctl::MY | madctl::MV,
        }
    }

    /// RAM offsets in the current orientation as (x, y)
    fn offsets(&self) -> (u16, u16) {
        if self.rotation.is_landscape() {
            (self.panel.row_offset, self.panel.col_offset)
        } else {
            (self.panel.col_offset, self.panel.row_offset)
        }
    }

    fn select(&mut self) {
        if !self.in_write {
            self.cs.set_low();
        }
    }

    fn deselect(&mut self) {
        if !self.in_write {
            self.cs.set_high();
        }
    }

    fn ensure_ready(&self) -> Result<(), DisplayError> {
        if self.ready {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    /// Send a command and its parameters; the panel must be selected
    fn write_command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_low();
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::Communication)?;
        if !params.is_empty() {
            self.dc.set_high();
            self.spi
                .write(params)
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    /// Send a single command as its own transaction
    fn command(&mut self, command: u8, params: &[u8]) -> Result<(), DisplayError> {
        self.select();
        let result = self.write_command(command, params);
        self.deselect();
        result
    }

    /// Open a RAM window covering `top_left..=bottom_right` and leave the
    /// bus in data mode for pixel writes
    fn open_window(&mut self, top_left: Point, bottom_right: Point) -> Result<(), DisplayError> {
        let (x_off, y_off) = self.offsets();
        let x0 = top_left.x as u16 + x_off;
        let x1 = bottom_right.x as u16 + x_off;
        let y0 = top_left.y as u16 + y_off;
        let y1 = bottom_right.y as u16 + y_off;

        let [x0h, x0l] = x0.to_be_bytes();
        let [x1h, x1l] = x1.to_be_bytes();
        self.write_command(cmd::CASET, &[x0h, x0l, x1h, x1l])?;
        let [y0h, y0l] = y0.to_be_bytes();
        let [y1h, y1l] = y1.to_be_bytes();
        self.write_command(cmd::RASET, &[y0h, y0l, y1h, y1l])?;
        self.write_command(cmd::RAMWR, &[])?;
        self.dc.set_high();
        Ok(())
    }

    fn stream_solid(&mut self, mut count: u32, color: Rgb565) -> Result<(), DisplayError> {
        let [hi, lo] = color.into_storage().to_be_bytes();
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        for pair in chunk.chunks_exact_mut(2) {
            pair[0] = hi;
            pair[1] = lo;
        }
        while count > 0 {
            let n = count.min(CHUNK_PIXELS as u32);
            self.spi
                .write(&chunk[..n as usize * 2])
                .map_err(|_| DisplayError::Communication)?;
            count -= n;
        }
        Ok(())
    }

    fn stream_colors<I>(&mut self, colors: I) -> Result<(), DisplayError>
    where
        I: IntoIterator<Item = Rgb565>,
    {
        let mut chunk = [0u8; CHUNK_PIXELS * 2];
        let mut used = 0;
        for color in colors {
            let [hi, lo] = color.into_storage().to_be_bytes();
            chunk[used] = hi;
            chunk[used + 1] = lo;
            used += 2;
            if used == chunk.len() {
                self.spi
                    .write(&chunk)
                    .map_err(|_| DisplayError::Communication)?;
                used = 0;
            }
        }
        if used > 0 {
            self.spi
                .write(&chunk[..used])
                .map_err(|_| DisplayError::Communication)?;
        }
        Ok(())
    }

    /// Fill `area` after clipping it to the visible screen
    fn fill_clipped(&mut self, area: &Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        let area = area.intersection(&self.bounding_box());
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };

        self.select();
        let result = self
            .open_window(area.top_left, bottom_right)
            .and_then(|_| self.stream_solid(area.size.width * area.size.height, color));
        self.deselect();
        result
    }
}

impl<SPI, DC, CS, RST, BL, D> OriginDimensions for St7789<SPI, DC, CS, RST, BL, D> {
    fn size(&self) -> Size {
        let (w, h) = (self.panel.width as u32, self.panel.height as u32);
        if self.rotation.is_landscape() {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }
}

impl<SPI, DC, CS, RST, BL, D> DrawTarget for St7789<SPI, DC, CS, RST, BL, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    type Color = Rgb565;
    type Error = DisplayError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.ensure_ready()?;
        let bounds = self.bounding_box();
        self.select();
        let mut result = Ok(());
        for Pixel(point, color) in pixels {
            if !bounds.contains(point) {
                continue;
            }
            result = self
                .open_window(point, point)
                .and_then(|_| self.stream_solid(1, color));
            if result.is_err() {
                break;
            }
        }
        self.deselect();
        result
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.ensure_ready()?;
        let Some(bottom_right) = area.bottom_right() else {
            return Ok(());
        };
        // Partially visible areas fall back to per-pixel clipping
        if area.intersection(&self.bounding_box()) != *area {
            return self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            );
        }

        self.select();
        let count = (area.size.width * area.size.height) as usize;
        let result = self
            .open_window(area.top_left, bottom_right)
            .and_then(|_| self.stream_colors(colors.into_iter().take(count)));
        self.deselect();
        result
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        self.fill_clipped(area, color)
    }
}

impl<SPI, DC, CS, RST, BL, D> ClockDisplay for St7789<SPI, DC, CS, RST, BL, D>
where
    SPI: SpiBus,
    DC: OutputPin,
    CS: OutputPin,
    RST: OutputPin,
    BL: OutputPin,
    D: DelayNs,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        self.cs.set_high();
        self.rst.set_high();
        self.delay.delay_ms(5);
        self.rst.set_low();
        self.delay.delay_ms(20);
        self.rst.set_high();
        self.delay.delay_ms(150);

        self.command(cmd::SWRESET, &[])?;
        self.delay.delay_ms(150);
        self.command(cmd::SLPOUT, &[])?;
        self.delay.delay_ms(120);
        self.command(cmd::COLMOD, &[COLMOD_RGB565])?;
        self.command(cmd::MADCTL, &[Self::madctl(self.rotation)])?;
        // IPS panels need inverted color mode for true colors
        self.command(cmd::INVON, &[])?;
        self.command(cmd::NORON, &[])?;
        self.delay.delay_ms(10);
        self.command(cmd::DISPON, &[])?;
        self.delay.delay_ms(20);

        self.ready = true;
        Ok(())
    }

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError> {
        self.rotation = rotation;
        if self.ready {
            self.command(cmd::MADCTL, &[Self::madctl(rotation)])?;
        }
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError> {
        self.backlight.set_state(on);
        Ok(())
    }

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), DisplayError> {
        let screen = self.bounding_box();
        self.fill_clipped(&screen, color)
    }

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), DisplayError> {
        self.fill_clipped(&area, color)
    }

    fn set_text_color(&mut self, foreground: Rgb565, background: Rgb565) {
        self.foreground = foreground;
        self.background = background;
    }

    fn set_text_datum(&mut self, datum: TextDatum) {
        self.datum = datum;
    }

    fn draw_string(&mut self, text: &str, at: Point, font: FontSize) -> Result<(), DisplayError> {
        self.ensure_ready()?;
        let text_style = self.datum.text_style();
        match font {
            FontSize::Small => {
                let style = MonoTextStyleBuilder::new()
                    .font(&FONT_8X13)
                    .text_color(self.foreground)
                    .background_color(self.background)
                    .build();
                Text::with_text_style(text, at, style, text_style).draw(self)?;
            }
            FontSize::Large => {
                let style = MonoTextStyleBuilder::new()
                    .font(&FONT_10X20)
                    .text_color(self.foreground)
                    .background_color(self.background)
                    .build();
                let mut scaled = Scaled::new(self, at, LARGE_FONT_SCALE);
                Text::with_text_style(text, Point::zero(), style, text_style).draw(&mut scaled)?;
            }
        }
        Ok(())
    }

    fn start_write(&mut self) -> Result<(), DisplayError> {
        self.in_write = true;
        self.cs.set_low();
        Ok(())
    }

    fn end_write(&mut self) -> Result<(), DisplayError> {
        self.in_write = false;
        self.cs.set_high();
        Ok(())
    }

    fn size(&self) -> Size {
        OriginDimensions::size(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Op {
        Cmd(u8),
        Data(Vec<u8>),
        Cs(bool),
        Reset(bool),
        Backlight(bool),
    }

    #[derive(Default)]
    struct Bus {
        dc_high: bool,
        ops: Vec<Op>,
    }

    type Shared = Rc<RefCell<Bus>>;

    struct RecordingSpi(Shared);

    impl SpiBus for RecordingSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            let mut bus = self.0.borrow_mut();
            if bus.dc_high {
                bus.ops.push(Op::Data(data.to_vec()));
            } else {
                for &b in data {
                    bus.ops.push(Op::Cmd(b));
                }
            }
            Ok(())
        }
    }

    #[derive(Clone, Copy)]
    enum Role {
        Dc,
        Cs,
        Rst,
        Bl,
    }

    struct RecordingPin {
        bus: Shared,
        role: Role,
        level: bool,
    }

    impl OutputPin for RecordingPin {
        fn set_high(&mut self) {
            self.set(true);
        }

        fn set_low(&mut self) {
            self.set(false);
        }

        fn is_set_high(&self) -> bool {
            self.level
        }
    }

    impl RecordingPin {
        fn set(&mut self, level: bool) {
            self.level = level;
            let mut bus = self.bus.borrow_mut();
            match self.role {
                Role::Dc => bus.dc_high = level,
                Role::Cs => bus.ops.push(Op::Cs(level)),
                Role::Rst => bus.ops.push(Op::Reset(level)),
                Role::Bl => bus.ops.push(Op::Backlight(level)),
            }
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    type TestPanel = St7789<RecordingSpi, RecordingPin, RecordingPin, RecordingPin, RecordingPin, NoDelay>;

    fn panel() -> (TestPanel, Shared) {
        let bus: Shared = Rc::new(RefCell::new(Bus::default()));
        let pin = |role| RecordingPin {
            bus: bus.clone(),
            role,
            level: false,
        };
        let display = St7789::new(
            RecordingSpi(bus.clone()),
            pin(Role::Dc),
            pin(Role::Cs),
            pin(Role::Rst),
            pin(Role::Bl),
            NoDelay,
            PanelConfig::ST7789_170X320,
        );
        (display, bus)
    }

    fn landscape_panel() -> (TestPanel, Shared) {
        let (mut display, bus) = panel();
        display.set_rotation(Rotation::Landscape).unwrap();
        display.init().unwrap();
        bus.borrow_mut().ops.clear();
        (display, bus)
    }

    fn commands(bus: &Shared) -> Vec<u8> {
        bus.borrow()
            .ops
            .iter()
            .filter_map(|op| match op {
                Op::Cmd(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// All data bytes sent after each occurrence of `command`
    fn data_after(bus: &Shared, command: u8) -> Vec<Vec<u8>> {
        let bus = bus.borrow();
        let mut out = Vec::new();
        let mut current: Option<Vec<u8>> = None;
        for op in &bus.ops {
            match op {
                Op::Cmd(c) => {
                    if let Some(done) = current.take() {
                        out.push(done);
                    }
                    if *c == command {
                        current = Some(Vec::new());
                    }
                }
                Op::Data(d) => {
                    if let Some(buf) = current.as_mut() {
                        buf.extend_from_slice(d);
                    }
                }
                _ => {}
            }
        }
        if let Some(done) = current {
            out.push(done);
        }
        out
    }

    #[test]
    fn test_init_sequence() {
        let (mut display, bus) = panel();
        display.init().unwrap();

        assert_eq!(
            commands(&bus),
            vec![
                cmd::SWRESET,
                cmd::SLPOUT,
                cmd::COLMOD,
                cmd::MADCTL,
                cmd::INVON,
                cmd::NORON,
                cmd::DISPON
            ]
        );
        assert_eq!(data_after(&bus, cmd::COLMOD), vec![vec![COLMOD_RGB565]]);

        let ops = &bus.borrow().ops;
        let resets: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, Op::Reset(_)))
            .cloned()
            .collect();
        assert_eq!(resets, vec![Op::Reset(true), Op::Reset(false), Op::Reset(true)]);
    }

    #[test]
    fn test_rotation_sets_madctl_and_size() {
        let (mut display, bus) = panel();
        display.init().unwrap();
        assert_eq!(ClockDisplay::size(&display), Size::new(170, 320));

        display.set_rotation(Rotation::Landscape).unwrap();
        assert_eq!(ClockDisplay::size(&display), Size::new(320, 170));
        let madctl = data_after(&bus, cmd::MADCTL);
        assert_eq!(madctl.last(), Some(&vec![0x60]));
    }

    #[test]
    fn test_fill_rect_window_uses_panel_offset() {
        let (mut display, bus) = landscape_panel();
        let area = Rectangle::new(Point::new(48, 45), Size::new(225, 80));
        display.fill_rect(area, Rgb565::BLACK).unwrap();

        // x is not offset in landscape; y gains the 35 column offset
        assert_eq!(data_after(&bus, cmd::CASET), vec![vec![0, 48, 1, 16]]);
        assert_eq!(data_after(&bus, cmd::RASET), vec![vec![0, 80, 0, 159]]);
        let pixels = &data_after(&bus, cmd::RAMWR)[0];
        assert_eq!(pixels.len(), 225 * 80 * 2);
        assert!(pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let (mut display, bus) = landscape_panel();
        let area = Rectangle::new(Point::new(300, 150), Size::new(50, 50));
        display.fill_rect(area, Rgb565::WHITE).unwrap();

        assert_eq!(data_after(&bus, cmd::CASET), vec![vec![1, 44, 1, 63]]);
        assert_eq!(data_after(&bus, cmd::RAMWR)[0].len(), 20 * 20 * 2);
    }

    #[test]
    fn test_offscreen_fill_sends_nothing() {
        let (mut display, bus) = landscape_panel();
        let area = Rectangle::new(Point::new(400, 10), Size::new(10, 10));
        display.fill_rect(area, Rgb565::RED).unwrap();
        assert!(commands(&bus).is_empty());
    }

    #[test]
    fn test_batched_write_holds_chip_select() {
        let (mut display, bus) = landscape_panel();
        display.start_write().unwrap();
        display.fill_screen(Rgb565::BLACK).unwrap();
        display
            .fill_rect(Rectangle::new(Point::zero(), Size::new(4, 4)), Rgb565::RED)
            .unwrap();
        display.end_write().unwrap();

        let cs: Vec<_> = bus
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Cs(_)))
            .cloned()
            .collect();
        assert_eq!(cs, vec![Op::Cs(false), Op::Cs(true)]);
    }

    #[test]
    fn test_drawing_requires_init() {
        let (mut display, _bus) = panel();
        assert_eq!(
            display.fill_screen(Rgb565::BLACK),
            Err(DisplayError::NotInitialized)
        );
        assert_eq!(
            display.draw_string("12:00", Point::new(10, 10), FontSize::Small),
            Err(DisplayError::NotInitialized)
        );
    }

    #[test]
    fn test_large_text_streams_pixels() {
        let (mut display, bus) = landscape_panel();
        display.set_text_datum(TextDatum::MiddleCentre);
        display.set_text_color(Rgb565::GREEN, Rgb565::BLACK);
        display
            .draw_string("12:34", Point::new(160, 85), FontSize::Large)
            .unwrap();

        let windows = data_after(&bus, cmd::CASET);
        assert!(!windows.is_empty());
        // Every window stays inside the 320 pixel wide landscape screen
        for w in windows {
            let x1 = u16::from_be_bytes([w[2], w[3]]);
            assert!(x1 < 320);
        }
        let green = Rgb565::GREEN.into_storage().to_be_bytes();
        let painted = data_after(&bus, cmd::RAMWR)
            .iter()
            .any(|px| px.chunks(2).any(|p| p == green));
        assert!(painted);
    }

    #[test]
    fn test_backlight_follows_request() {
        let (mut display, bus) = panel();
        display.set_backlight(true).unwrap();
        display.set_backlight(false).unwrap();
        let bl: Vec<_> = bus
            .borrow()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Backlight(_)))
            .cloned()
            .collect();
        assert_eq!(bl, vec![Op::Backlight(true), Op::Backlight(false)]);
    }
}
