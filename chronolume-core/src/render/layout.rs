//! Screen geometry for the landscape 320x170 panel

use chronolume_display::{FontSize, Point, Rectangle, Rgb565, RgbColor, Size};

/// Anchor for the time and for status messages (screen center)
pub const ANCHOR: Point = Point::new(160, 85);

/// Characters in "HH:MM"
pub const TIME_CHARS: u32 = 5;

pub const CLOCK_FONT: FontSize = FontSize::Large;

pub const MESSAGE_FONT: FontSize = FontSize::Small;

pub const BACKGROUND: Rgb565 = Rgb565::BLACK;

/// Region cleared before each time repaint, centered on [`ANCHOR`]
///
/// Five large glyph boxes wide: x 48..273, y 45..125.
pub const CLOCK_FACE: Rectangle = {
    let glyph = CLOCK_FONT.glyph_box();
    let size = Size::new(glyph.width * TIME_CHARS, glyph.height);
    Rectangle::new(
        Point::new(
            ANCHOR.x - (size.width / 2) as i32,
            ANCHOR.y - (size.height / 2) as i32,
        ),
        size,
    )
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_face_geometry() {
        assert_eq!(CLOCK_FACE.top_left, Point::new(48, 45));
        assert_eq!(CLOCK_FACE.size, Size::new(225, 80));
    }

    #[test]
    fn test_clock_face_contains_anchor_and_fits_screen() {
        let screen = Rectangle::new(Point::zero(), Size::new(320, 170));
        assert!(CLOCK_FACE.contains(ANCHOR));
        assert_eq!(CLOCK_FACE.intersection(&screen), CLOCK_FACE);
    }
}
