//! Display backend trait
//!
//! Defines the drawing surface the clock renders onto. The shape mirrors
//! how TFT clock faces are usually driven: a persistent text color and
//! anchor mode, explicit rectangle clears, and batched write transactions.

use embedded_graphics::geometry::{Point, Size};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Display not initialized
    NotInitialized,
}

/// Panel orientation, numbered as the controller's rotation index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// 0: connector at the bottom
    Portrait,
    /// 1: landscape, the clock's normal orientation
    #[default]
    Landscape,
    /// 2: portrait, upside down
    PortraitFlipped,
    /// 3: landscape, upside down
    LandscapeFlipped,
}

impl Rotation {
    /// Map a rotation index (0..=3) to a rotation
    pub const fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Portrait),
            1 => Some(Self::Landscape),
            2 => Some(Self::PortraitFlipped),
            3 => Some(Self::LandscapeFlipped),
            _ => None,
        }
    }

    pub const fn index(self) -> u8 {
        match self {
            Self::Portrait => 0,
            Self::Landscape => 1,
            Self::PortraitFlipped => 2,
            Self::LandscapeFlipped => 3,
        }
    }

    /// Whether the long edge of the panel is horizontal
    pub const fn is_landscape(self) -> bool {
        matches!(self, Self::Landscape | Self::LandscapeFlipped)
    }
}

/// Which point of the text box the draw coordinates refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextDatum {
    #[default]
    TopLeft,
    TopCentre,
    TopRight,
    MiddleLeft,
    MiddleCentre,
    MiddleRight,
    BottomLeft,
    BottomCentre,
    BottomRight,
}

impl TextDatum {
    /// Equivalent `embedded-graphics` text style
    pub fn text_style(self) -> TextStyle {
        let (alignment, baseline) = match self {
            Self::TopLeft => (Alignment::Left, Baseline::Top),
            Self::TopCentre => (Alignment::Center, Baseline::Top),
            Self::TopRight => (Alignment::Right, Baseline::Top),
            Self::MiddleLeft => (Alignment::Left, Baseline::Middle),
            Self::MiddleCentre => (Alignment::Center, Baseline::Middle),
            Self::MiddleRight => (Alignment::Right, Baseline::Middle),
            Self::BottomLeft => (Alignment::Left, Baseline::Bottom),
            Self::BottomCentre => (Alignment::Center, Baseline::Bottom),
            Self::BottomRight => (Alignment::Right, Baseline::Bottom),
        };
        TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build()
    }
}

/// Font sizes available to the clock face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    /// Status and diagnostic messages
    Small,
    /// Clock digits
    Large,
}

impl FontSize {
    /// Box reserved per character when clearing behind text of this size
    pub const fn glyph_box(self) -> Size {
        match self {
            Self::Small => Size::new(8, 13),
            Self::Large => Size::new(45, 80),
        }
    }
}

/// Drawing surface used by the clock
///
/// Text drawing uses the color pair and anchor mode most recently set.
/// Implementations clip anything outside the visible area.
pub trait ClockDisplay {
    /// Bring the panel out of reset and configure it
    fn init(&mut self) -> Result<(), DisplayError>;

    fn set_rotation(&mut self, rotation: Rotation) -> Result<(), DisplayError>;

    /// Switch the backlight on or off
    fn set_backlight(&mut self, on: bool) -> Result<(), DisplayError>;

    fn fill_screen(&mut self, color: Rgb565) -> Result<(), DisplayError>;

    fn fill_rect(&mut self, area: Rectangle, color: Rgb565) -> Result<(), DisplayError>;

    /// Set foreground and background colors for subsequent text
    fn set_text_color(&mut self, foreground: Rgb565, background: Rgb565);

    /// Set the anchor mode for subsequent text
    fn set_text_datum(&mut self, datum: TextDatum);

    /// Draw a string anchored at `at`
    fn draw_string(&mut self, text: &str, at: Point, font: FontSize) -> Result<(), DisplayError>;

    /// Begin a batched write; the panel stays selected until `end_write`
    fn start_write(&mut self) -> Result<(), DisplayError>;

    fn end_write(&mut self) -> Result<(), DisplayError>;

    /// Visible size in the current rotation
    fn size(&self) -> Size;
}
