//! Integer-scaled draw target
//!
//! Renders anything drawn into it at `factor`x size on the wrapped target,
//! translated to `origin`. Used to blow the 10x20 mono font up to clock
//! digits without a dedicated large font.

use embedded_graphics::geometry::{Dimensions, Point, Size};
use embedded_graphics::primitives::{PointsIter, Rectangle};
use embedded_graphics::Pixel;
use embedded_graphics::draw_target::DrawTarget;

/// Draw target adapter that scales and offsets every primitive
pub struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    factor: u32,
}

impl<'a, T> Scaled<'a, T> {
    /// Wrap `target`; a factor of zero is treated as one
    pub fn new(target: &'a mut T, origin: Point, factor: u32) -> Self {
        Self {
            target,
            origin,
            factor: factor.max(1),
        }
    }

    fn map(&self, area: &Rectangle) -> Rectangle {
        Rectangle::new(
            self.origin + area.top_left * self.factor as i32,
            area.size * self.factor,
        )
    }
}

impl<T: DrawTarget> Scaled<'_, T> {
    fn fill_run(&mut self, start: Point, len: u32, color: T::Color) -> Result<(), T::Error> {
        let area = Rectangle::new(
            self.origin + start * self.factor as i32,
            Size::new(len * self.factor, self.factor),
        );
        self.target.fill_solid(&area, color)
    }
}

impl<T: DrawTarget> Dimensions for Scaled<'_, T> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.target.bounding_box();
        let f = self.factor as i32;
        let top_left = Point::new(
            (outer.top_left.x - self.origin.x).div_euclid(f),
            (outer.top_left.y - self.origin.y).div_euclid(f),
        );
        Rectangle::new(
            top_left,
            Size::new(
                outer.size.width.div_ceil(self.factor) + 1,
                outer.size.height.div_ceil(self.factor) + 1,
            ),
        )
    }
}

impl<T: DrawTarget> DrawTarget for Scaled<'_, T> {
    type Color = T::Color;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.fill_run(point, 1, color)?;
        }
        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        // Merge horizontal runs of one color into a single rectangle fill
        let mut run: Option<(Point, u32, T::Color)> = None;
        for (point, color) in area.points().zip(colors) {
            match run {
                Some((start, len, c))
                    if c == color && point.y == start.y && point.x == start.x + len as i32 =>
                {
                    run = Some((start, len + 1, c));
                }
                _ => {
                    if let Some((start, len, c)) = run.take() {
                        self.fill_run(start, len, c)?;
                    }
                    run = Some((point, 1, color));
                }
            }
        }
        if let Some((start, len, c)) = run {
            self.fill_run(start, len, c)?;
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let mapped = self.map(area);
        self.target.fill_solid(&mapped, color)
    }
}
