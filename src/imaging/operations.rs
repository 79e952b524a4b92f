//! Derived-image operations built on the [`Image`] primitives.
//!
//! These combine the pure math in [`calculations`](super::calculations) with
//! pixel access and the crop/resize transforms. None of them touch a backend
//! directly, so they behave identically on every canvas.

use super::calculations::plan_thumbnail;
use super::params::ThumbnailMode;
use super::resource::Image;
use crate::color::{Color, MAX_ALPHA};
use crate::error::{Error, Result};
use crate::geometry::Dimensions;
use std::collections::HashSet;
use tracing::debug;

/// Alpha a pixel ends up with once the mask's red channel is applied.
///
/// A brighter mask reveals more of the remaining transparency; existing
/// opacity is never reduced.
pub fn masked_alpha(alpha: u8, mask_red: u8) -> u8 {
    let alpha = alpha as f64;
    let revealed = (MAX_ALPHA as f64 - alpha) * mask_red as f64 / 255.0;
    alpha.max(revealed).round() as u8
}

impl Image {
    /// Combine `mask`'s red channel into this image's alpha, pixel by pixel.
    ///
    /// The mask must come from the same backend and have the same size.
    pub fn apply_mask(&mut self, mask: &Image) -> Result<&mut Self> {
        if mask.kind() != self.kind() {
            return Err(Error::invalid_argument(format!(
                "Cannot mask {} image with {} image",
                self.kind(),
                mask.kind()
            )));
        }
        let size = self.size();
        if mask.size() != size {
            return Err(Error::invalid_argument(format!(
                "The given mask doesn't match current image's size, current mask's dimensions are {}, while image's dimensions are {size}",
                mask.size()
            )));
        }

        for point in size.points() {
            let color = self.color_at(point)?;
            let mask_color = mask.color_at(point)?;
            let alpha = masked_alpha(color.alpha(), mask_color.red());
            self.set_color_at(point, color.dissolve(alpha as i64 - color.alpha() as i64))?;
        }
        Ok(self)
    }

    /// A lightness-only copy of this image, suitable for [`Image::apply_mask`].
    ///
    /// Each pixel becomes gray at its HSL lightness; alpha is kept.
    pub fn mask(&self) -> Result<Image> {
        let mut mask = self.copy()?;
        mask.map_colors(|c| {
            let l = c.lightness();
            Color::rgb(l, l, l).with_alpha(c.alpha() as i64)
        })?;
        Ok(mask)
    }

    /// A new image scaled to fit (`Inset`) or cover-and-crop (`Outbound`) `size`.
    ///
    /// The source image is left untouched.
    pub fn thumbnail(&self, size: Dimensions, mode: ThumbnailMode) -> Result<Image> {
        let plan = plan_thumbnail(self.size(), size, mode);
        debug!(?mode, from = %self.size(), to = %plan.scaled, "thumbnail");

        let mut thumbnail = self.copy()?;
        thumbnail.resize(plan.scaled)?;
        if let Some((origin, window)) = plan.crop {
            let window = Dimensions::new(
                window.width().min(plan.scaled.width() - origin.x),
                window.height().min(plan.scaled.height() - origin.y),
            )?;
            thumbnail.crop(origin, window)?;
        }
        Ok(thumbnail)
    }

    /// Distinct colors of the canvas in row-major order of first appearance.
    pub fn histogram(&self) -> Result<Vec<Color>> {
        let mut seen = HashSet::new();
        let mut colors = Vec::new();
        for point in self.size().points() {
            let color = self.color_at(point)?;
            if seen.insert(color) {
                colors.push(color);
            }
        }
        Ok(colors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use crate::imaging::{BackendKind, Imagine};

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    fn canvas(kind: BackendKind, w: u32, h: u32, color: Color) -> Image {
        Imagine::new(kind).create(dims(w, h), Some(color)).unwrap()
    }

    // =========================================================================
    // Masking
    // =========================================================================

    #[test]
    fn masked_alpha_formula() {
        assert_eq!(masked_alpha(0, 255), 100);
        assert_eq!(masked_alpha(0, 0), 0);
        assert_eq!(masked_alpha(50, 255), 50);
        assert_eq!(masked_alpha(20, 51), 20);
        assert_eq!(masked_alpha(0, 128), 50);
    }

    #[test]
    fn white_mask_reveals_transparent_pixels() {
        let mut image = canvas(BackendKind::Rust, 4, 4, Color::rgb(200, 0, 0).with_alpha(0));
        let mask = canvas(BackendKind::Rust, 4, 4, Color::WHITE);
        image.apply_mask(&mask).unwrap();

        let color = image.color_at(Point::new(3, 3)).unwrap();
        assert_eq!(color.alpha(), 100);
        assert_eq!(color.red(), 200);
    }

    #[test]
    fn black_mask_keeps_existing_alpha() {
        let mut image = canvas(BackendKind::Rust, 4, 4, Color::WHITE.with_alpha(40));
        let mask = canvas(BackendKind::Rust, 4, 4, Color::BLACK);
        image.apply_mask(&mask).unwrap();
        assert_eq!(image.color_at(Point::ORIGIN).unwrap().alpha(), 40);
    }

    #[test]
    fn mask_size_mismatch_is_invalid() {
        let mut image = canvas(BackendKind::Rust, 4, 4, Color::WHITE);
        let mask = canvas(BackendKind::Rust, 4, 5, Color::WHITE);
        assert!(matches!(
            image.apply_mask(&mask),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mask_from_other_backend_is_invalid() {
        let mut image = canvas(BackendKind::Rust, 4, 4, Color::WHITE);
        let mask = canvas(BackendKind::Opaque, 4, 4, Color::WHITE);
        assert!(matches!(
            image.apply_mask(&mask),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn mask_is_gray_copy() {
        let image = canvas(BackendKind::Rust, 3, 3, Color::rgb(200, 100, 0).with_alpha(70));
        let mask = image.mask().unwrap();

        assert_eq!(mask.color_at(Point::ORIGIN).unwrap(), Color::rgb(100, 100, 100).with_alpha(70));
        assert_eq!(image.color_at(Point::ORIGIN).unwrap(), Color::rgb(200, 100, 0).with_alpha(70));
    }

    // =========================================================================
    // Thumbnail
    // =========================================================================

    #[test]
    fn outbound_thumbnail_is_exact() {
        let image = canvas(BackendKind::Rust, 20, 40, Color::WHITE);
        let thumb = image.thumbnail(dims(10, 10), ThumbnailMode::Outbound).unwrap();
        assert_eq!(thumb.size(), dims(10, 10));
    }

    #[test]
    fn inset_thumbnail_fits() {
        let image = canvas(BackendKind::Opaque, 20, 40, Color::WHITE);
        let thumb = image.thumbnail(dims(10, 10), ThumbnailMode::Inset).unwrap();
        assert_eq!(thumb.size(), dims(5, 10));
    }

    #[test]
    fn outbound_thumbnail_keeps_center() {
        let mut image = canvas(BackendKind::Rust, 30, 10, Color::BLACK);
        let stripe = |p: Point| {
            if (10..20).contains(&p.x) {
                Color::WHITE
            } else {
                Color::BLACK
            }
        };
        image.fill(&stripe).unwrap();
        let thumb = image.thumbnail(dims(10, 10), ThumbnailMode::Outbound).unwrap();
        assert_eq!(thumb.color_at(Point::new(5, 5)).unwrap(), Color::WHITE);
    }

    // =========================================================================
    // Histogram
    // =========================================================================

    #[test]
    fn histogram_of_flat_canvas_has_one_color() {
        let image = canvas(BackendKind::Rust, 13, 7, Color::rgb(9, 8, 7));
        assert_eq!(image.histogram().unwrap(), vec![Color::rgb(9, 8, 7)]);
    }

    #[test]
    fn histogram_lists_first_seen_order() {
        let mut image = canvas(BackendKind::Rust, 3, 2, Color::WHITE);
        image.set_color_at(Point::new(2, 0), Color::BLACK).unwrap();
        image.set_color_at(Point::new(0, 1), Color::BLACK).unwrap();
        assert_eq!(image.histogram().unwrap(), vec![Color::WHITE, Color::BLACK]);
    }
}
