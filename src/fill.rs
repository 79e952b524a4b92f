//! Fill strategies: a color for every canvas position.
//!
//! [`Image::fill`](crate::imaging::Image::fill) asks the strategy for each
//! pixel in row-major order. Any `Fn(Point) -> Color` closure is a strategy.

use crate::color::Color;
use crate::geometry::{Dimensions, Point};

pub trait Fill {
    fn color_at(&self, point: Point) -> Color;
}

impl<F> Fill for F
where
    F: Fn(Point) -> Color,
{
    fn color_at(&self, point: Point) -> Color {
        self(point)
    }
}

/// One color everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solid(pub Color);

impl Fill for Solid {
    fn color_at(&self, _point: Point) -> Color {
        self.0
    }
}

/// Linear gradient from `start` at the left edge to `end` at the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizontal {
    length: u32,
    start: Color,
    end: Color,
}

impl Horizontal {
    /// Gradient across `length` pixels; positions past it take `end`.
    pub fn new(length: u32, start: Color, end: Color) -> Self {
        Self { length, start, end }
    }

    /// Gradient spanning the full width of `size`.
    pub fn across(size: Dimensions, start: Color, end: Color) -> Self {
        Self::new(size.width(), start, end)
    }
}

impl Fill for Horizontal {
    fn color_at(&self, point: Point) -> Color {
        self.start.blend(&self.end, gradient_weight(point.x, self.length))
    }
}

/// Linear gradient from `start` at the top edge to `end` at the bottom edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vertical {
    length: u32,
    start: Color,
    end: Color,
}

impl Vertical {
    pub fn new(length: u32, start: Color, end: Color) -> Self {
        Self { length, start, end }
    }

    pub fn across(size: Dimensions, start: Color, end: Color) -> Self {
        Self::new(size.height(), start, end)
    }
}

impl Fill for Vertical {
    fn color_at(&self, point: Point) -> Color {
        self.start.blend(&self.end, gradient_weight(point.y, self.length))
    }
}

/// Position along a gradient of `length` pixels: 0 at the first, 1 at the last.
fn gradient_weight(position: u32, length: u32) -> f64 {
    if length <= 1 {
        return 1.0;
    }
    (position as f64 / (length - 1) as f64).min(1.0)
}
