//! Coordinate and extent value types.
//!
//! - [`Point`]: a non-negative pixel position, `(0, 0)` is the top-left corner.
//! - [`Dimensions`]: a width/height extent; both sides are always at least 1.

use crate::error::{Error, Result};
use std::fmt;

/// A pixel position on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: u32,
    pub y: u32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Whether this point lies within `[0, width) × [0, height)` of `dims`.
    pub fn is_in(&self, dims: Dimensions) -> bool {
        self.x < dims.width && self.y < dims.height
    }

    /// Move the point by a signed offset, saturating at zero.
    pub fn offset(&self, dx: i64, dy: i64) -> Self {
        let shift = |v: u32, d: i64| (v as i64 + d).clamp(0, u32::MAX as i64) as u32;
        Self {
            x: shift(self.x, dx),
            y: shift(self.y, dy),
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a canvas or region.
///
/// Constructed through [`Dimensions::new`], which rejects zero-sized extents,
/// so every value in circulation has `width > 0` and `height > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::invalid_argument(format!(
                "Length of either side cannot be 0 or negative, current size is {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels covered.
    pub fn square(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether `other` placed with its top-left corner at `at` stays inside `self`.
    pub fn contains(&self, other: Dimensions, at: Point) -> bool {
        at.is_in(*self)
            && at.x as u64 + other.width as u64 <= self.width as u64
            && at.y as u64 + other.height as u64 <= self.height as u64
    }

    /// Multiply both sides by `ratio`, rounding each to the nearest integer.
    ///
    /// A side never rounds below 1.
    pub fn scale(&self, ratio: f64) -> Self {
        let side = |v: u32| ((v as f64 * ratio).round().max(1.0)).min(u32::MAX as f64) as u32;
        Self {
            width: side(self.width),
            height: side(self.height),
        }
    }

    /// Scale proportionally so the width becomes `width`.
    pub fn widen(&self, width: u32) -> Result<Self> {
        Dimensions::new(width, 1)?;
        Ok(self.scale(width as f64 / self.width as f64).with_width(width))
    }

    /// Scale proportionally so the height becomes `height`.
    pub fn heighten(&self, height: u32) -> Result<Self> {
        Dimensions::new(1, height)?;
        Ok(self.scale(height as f64 / self.height as f64).with_height(height))
    }

    /// Every position inside, in row-major order.
    pub fn points(self) -> impl Iterator<Item = Point> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Point::new(x, y)))
    }

    fn with_width(self, width: u32) -> Self {
        Self { width, ..self }
    }

    fn with_height(self, height: u32) -> Self {
        Self { height, ..self }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} px", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    // =========================================================================
    // Point
    // =========================================================================

    #[test]
    fn point_inside_half_open_range() {
        let area = dims(10, 20);
        assert!(Point::new(0, 0).is_in(area));
        assert!(Point::new(9, 19).is_in(area));
        assert!(!Point::new(10, 0).is_in(area));
        assert!(!Point::new(0, 20).is_in(area));
    }

    #[test]
    fn point_offset_saturates_at_zero() {
        assert_eq!(Point::new(5, 5).offset(-10, 3), Point::new(0, 8));
    }

    // =========================================================================
    // Dimensions
    // =========================================================================

    #[test]
    fn zero_sides_rejected() {
        assert!(matches!(Dimensions::new(0, 5), Err(Error::InvalidArgument(_))));
        assert!(matches!(Dimensions::new(5, 0), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn contains_exact_fit() {
        assert!(dims(10, 10).contains(dims(10, 10), Point::ORIGIN));
        assert!(dims(10, 10).contains(dims(5, 5), Point::new(5, 5)));
    }

    #[test]
    fn contains_rejects_overflowing_placement() {
        assert!(!dims(10, 10).contains(dims(11, 10), Point::ORIGIN));
        assert!(!dims(10, 10).contains(dims(5, 5), Point::new(6, 0)));
        assert!(!dims(10, 10).contains(dims(1, 1), Point::new(10, 0)));
    }

    #[test]
    fn scale_rounds_each_side() {
        assert_eq!(dims(20, 40).scale(0.5), dims(10, 20));
        assert_eq!(dims(3, 5).scale(0.5), dims(2, 3));
    }

    #[test]
    fn scale_never_reaches_zero() {
        assert_eq!(dims(1000, 10).scale(0.01), dims(10, 1));
    }

    #[test]
    fn widen_and_heighten_keep_aspect() {
        assert_eq!(dims(800, 600).widen(400).unwrap(), dims(400, 300));
        assert_eq!(dims(800, 600).heighten(150).unwrap(), dims(200, 150));
        assert!(dims(800, 600).widen(0).is_err());
    }

    #[test]
    fn points_are_row_major() {
        let points: Vec<Point> = dims(2, 2).points().collect();
        assert_eq!(
            points,
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn display_format() {
        assert_eq!(dims(20, 40).to_string(), "20x40 px");
        assert_eq!(Point::new(3, 4).to_string(), "(3, 4)");
    }
}
