//! The image resource: one owned canvas plus every operation on it.
//!
//! An [`Image`] exclusively owns a boxed [`Canvas`]. Geometric transforms
//! follow a copy-replace protocol: the backend builds a transformed canvas
//! first, and only when that succeeds is the old canvas dropped and the new
//! one installed. A failed transform therefore leaves the image exactly as it
//! was. Mutating methods return `&mut Self` so calls chain with `?`:
//!
//! ```no_run
//! # use imagery::geometry::{Dimensions, Point};
//! # use imagery::imaging::Image;
//! # fn demo(image: &mut Image) -> imagery::Result<()> {
//! image
//!     .crop(Point::new(10, 10), Dimensions::new(200, 100)?)?
//!     .flip_horizontally()?
//!     .resize(Dimensions::new(100, 50)?)?;
//! # Ok(())
//! # }
//! ```
//!
//! Masking, thumbnails and histograms live in [`operations`](super::operations).

use super::backend::{BackendKind, Canvas};
use super::params::{Format, SaveOptions};
use crate::color::{Color, Palette};
use crate::draw::PixelDrawer;
use crate::effects::PixelEffects;
use crate::error::{Error, Result};
use crate::fill::Fill;
use crate::geometry::{Dimensions, Point};
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

pub struct Image {
    canvas: Box<dyn Canvas>,
}

impl Image {
    pub(crate) fn from_canvas(canvas: Box<dyn Canvas>) -> Self {
        Self { canvas }
    }

    /// Which backend owns the canvas.
    pub fn kind(&self) -> BackendKind {
        self.canvas.kind()
    }

    pub fn palette(&self) -> Palette {
        self.canvas.palette()
    }

    /// Live size of the canvas.
    pub fn size(&self) -> Dimensions {
        self.canvas.dimensions()
    }

    /// Independent image with its own canvas.
    pub fn copy(&self) -> Result<Image> {
        Ok(Image::from_canvas(self.canvas.duplicate()?))
    }

    /// Release the canvas now instead of at end of scope.
    pub fn destroy(self) {}

    fn replace_canvas(&mut self, operation: &str, next: Box<dyn Canvas>) {
        debug!(
            operation,
            from = %self.canvas.dimensions(),
            to = %next.dimensions(),
            "replacing canvas"
        );
        self.canvas = next;
    }

    // =========================================================================
    // Geometric transforms
    // =========================================================================

    pub fn crop(&mut self, start: Point, size: Dimensions) -> Result<&mut Self> {
        let current = self.size();
        if !start.is_in(current) || !current.contains(size, start) {
            return Err(Error::out_of_bounds(format!(
                "Crop coordinates must start inside the image and the crop of {size} at {start} \
                 must not exceed the current {current} image borders"
            )));
        }
        let next = self.canvas.cropped(start, size)?;
        self.replace_canvas("crop", next);
        Ok(self)
    }

    /// Resize to exactly `size`; aspect ratio is not preserved.
    pub fn resize(&mut self, size: Dimensions) -> Result<&mut Self> {
        let next = self.canvas.resized(size)?;
        self.replace_canvas("resize", next);
        Ok(self)
    }

    /// Rotate clockwise by `angle` degrees. Uncovered area takes `background`,
    /// or the backend default (transparent for RGBA, white for opaque canvases).
    pub fn rotate(&mut self, angle: f64, background: Option<Color>) -> Result<&mut Self> {
        let next = self.canvas.rotated(angle, background)?;
        self.replace_canvas("rotate", next);
        Ok(self)
    }

    pub fn flip_horizontally(&mut self) -> Result<&mut Self> {
        let next = self.canvas.flipped_horizontally()?;
        self.replace_canvas("flip_horizontally", next);
        Ok(self)
    }

    pub fn flip_vertically(&mut self) -> Result<&mut Self> {
        let next = self.canvas.flipped_vertically()?;
        self.replace_canvas("flip_vertically", next);
        Ok(self)
    }

    /// Copy every pixel of `other` into this image with its top-left corner at `at`.
    pub fn paste(&mut self, other: &Image, at: Point) -> Result<&mut Self> {
        if other.kind() != self.kind() {
            return Err(Error::invalid_argument(format!(
                "{} images can only paste() {} images, {} given",
                self.kind(),
                self.kind(),
                other.kind()
            )));
        }
        let source = other.size();
        if !self.size().contains(source, at) {
            return Err(Error::out_of_bounds(format!(
                "Cannot paste image of {source} at {at}, as it moves outside of the current {} image",
                self.size()
            )));
        }

        for point in source.points() {
            let color = other.color_at(point)?;
            let target = Point::new(point.x + at.x, point.y + at.y);
            self.canvas.set_color_at(target, color)?;
        }
        Ok(self)
    }

    /// Remove embedded metadata (profiles, comments).
    pub fn strip(&mut self) -> Result<&mut Self> {
        self.canvas.strip()?;
        Ok(self)
    }

    // =========================================================================
    // Pixels
    // =========================================================================

    pub fn color_at(&self, point: Point) -> Result<Color> {
        let size = self.size();
        if !point.is_in(size) {
            return Err(Error::out_of_bounds(format!(
                "Error getting color at point {point}, the point must be inside the {size} image"
            )));
        }
        self.canvas
            .color_at(point)
            .ok_or_else(|| Error::runtime(format!("Backend returned no color at {point}")))
    }

    pub fn set_color_at(&mut self, point: Point, color: Color) -> Result<&mut Self> {
        let size = self.size();
        if !point.is_in(size) {
            return Err(Error::out_of_bounds(format!(
                "Error setting color at point {point}, the point must be inside the {size} image"
            )));
        }
        self.canvas.set_color_at(point, color)?;
        Ok(self)
    }

    /// Paint every pixel with `fill.color_at(point)`, row by row.
    pub fn fill(&mut self, fill: &dyn Fill) -> Result<&mut Self> {
        for point in self.size().points() {
            self.canvas.set_color_at(point, fill.color_at(point))?;
        }
        Ok(self)
    }

    /// Rewrite every pixel through `f`.
    pub(crate) fn map_colors(&mut self, mut f: impl FnMut(Color) -> Color) -> Result<()> {
        for point in self.size().points() {
            let color = self.color_at(point)?;
            self.canvas.set_color_at(point, f(color))?;
        }
        Ok(())
    }

    /// Drawing primitives operating on this image's canvas.
    pub fn draw(&mut self) -> PixelDrawer<'_> {
        PixelDrawer::new(self)
    }

    /// Color effects operating on this image's canvas.
    pub fn effects(&mut self) -> PixelEffects<'_> {
        PixelEffects::new(self)
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Encode to `format` (`jpeg`, `jpg`, `gif`, `png`, `wbmp`, `xbm`).
    pub fn get(&self, format: &str, options: SaveOptions) -> Result<Vec<u8>> {
        let format = Format::from_name(format)?;
        self.canvas.encode(format, options.quality)
    }

    /// Encode and write to `path`; the format comes from the extension.
    pub fn save(&self, path: impl AsRef<Path>, options: SaveOptions) -> Result<&Self> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let bytes = self.canvas.encode(format, options.quality)?;
        std::fs::write(path, bytes).map_err(|e| {
            Error::runtime(format!("Unable to save image to {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), %format, "saved image");
        Ok(self)
    }

    /// Write a `Content-type` header followed by the encoded image.
    pub fn show(&self, out: &mut impl Write, format: &str, options: SaveOptions) -> Result<&Self> {
        let format = Format::from_name(format)?;
        let bytes = self.canvas.encode(format, options.quality)?;
        let write_failed =
            |e: std::io::Error| Error::runtime(format!("Unable to output image: {e}"));
        write!(out, "Content-type: {}\r\n\r\n", format.mime_type()).map_err(write_failed)?;
        out.write_all(&bytes).map_err(write_failed)?;
        Ok(self)
    }

    /// PNG encoding, the default textual form of an image.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        self.get("png", SaveOptions::default())
    }
}

impl std::fmt::Debug for Image {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Image")
            .field("kind", &self.kind())
            .field("size", &self.size())
            .finish()
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        trace!(kind = %self.canvas.kind(), size = %self.canvas.dimensions(), "releasing canvas");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Imagine, ThumbnailMode};

    fn dims(w: u32, h: u32) -> Dimensions {
        Dimensions::new(w, h).unwrap()
    }

    fn canvas(w: u32, h: u32, color: Color) -> Image {
        Imagine::new(BackendKind::Rust)
            .create(dims(w, h), Some(color))
            .unwrap()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn copy_is_independent() {
        let mut original = canvas(4, 4, Color::WHITE);
        let copy = original.copy().unwrap();
        original.set_color_at(Point::ORIGIN, Color::BLACK).unwrap();
        original.resize(dims(2, 2)).unwrap();

        assert_eq!(copy.size(), dims(4, 4));
        assert_eq!(copy.color_at(Point::ORIGIN).unwrap(), Color::WHITE);
    }

    #[test]
    fn size_reflects_live_canvas() {
        let mut image = canvas(10, 10, Color::WHITE);
        image.resize(dims(3, 8)).unwrap();
        assert_eq!(image.size(), dims(3, 8));
        image.rotate(90.0, None).unwrap();
        assert_eq!(image.size(), dims(8, 3));
    }

    #[test]
    fn transforms_chain() {
        let mut image = canvas(20, 10, Color::WHITE);
        image
            .crop(Point::new(5, 0), dims(10, 10))
            .unwrap()
            .flip_vertically()
            .unwrap()
            .resize(dims(5, 5))
            .unwrap();
        assert_eq!(image.size(), dims(5, 5));
    }

    // =========================================================================
    // Crop
    // =========================================================================

    #[test]
    fn crop_too_wide_leaves_image_untouched() {
        let mut image = canvas(10, 10, Color::WHITE);
        image.set_color_at(Point::new(9, 9), Color::BLACK).unwrap();

        let err = image.crop(Point::ORIGIN, dims(11, 10)).unwrap_err();
        assert!(matches!(err, Error::OutOfBounds(_)));
        assert_eq!(image.size(), dims(10, 10));
        assert_eq!(image.color_at(Point::new(9, 9)).unwrap(), Color::BLACK);
    }

    #[test]
    fn crop_start_outside_is_out_of_bounds() {
        let mut image = canvas(10, 10, Color::WHITE);
        assert!(matches!(
            image.crop(Point::new(10, 0), dims(1, 1)),
            Err(Error::OutOfBounds(_))
        ));
    }

    // =========================================================================
    // Paste
    // =========================================================================

    #[test]
    fn paste_copies_pixels_at_offset() {
        let mut base = canvas(10, 10, Color::WHITE);
        let patch = canvas(3, 2, Color::rgb(255, 0, 0).with_alpha(60));
        base.paste(&patch, Point::new(7, 8)).unwrap();

        assert_eq!(
            base.color_at(Point::new(9, 9)).unwrap(),
            Color::rgb(255, 0, 0).with_alpha(60)
        );
        assert_eq!(base.color_at(Point::new(6, 9)).unwrap(), Color::WHITE);
    }

    #[test]
    fn paste_outside_is_out_of_bounds() {
        let mut base = canvas(10, 10, Color::WHITE);
        let patch = canvas(3, 3, Color::BLACK);
        assert!(matches!(
            base.paste(&patch, Point::new(8, 0)),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn paste_rejects_other_backend() {
        let mut base = canvas(10, 10, Color::WHITE);
        let foreign = Imagine::new(BackendKind::Opaque)
            .create(dims(2, 2), None)
            .unwrap();
        assert!(matches!(
            base.paste(&foreign, Point::ORIGIN),
            Err(Error::InvalidArgument(_))
        ));
    }

    // =========================================================================
    // Pixels & fill
    // =========================================================================

    #[test]
    fn color_at_outside_is_out_of_bounds() {
        let image = canvas(5, 5, Color::WHITE);
        assert!(matches!(
            image.color_at(Point::new(5, 0)),
            Err(Error::OutOfBounds(_))
        ));
    }

    #[test]
    fn fill_evaluates_every_point() {
        let mut image = canvas(4, 3, Color::WHITE);
        let checker = |p: Point| {
            if (p.x + p.y) % 2 == 0 {
                Color::BLACK
            } else {
                Color::WHITE
            }
        };
        image.fill(&checker).unwrap();
        assert_eq!(image.color_at(Point::new(0, 0)).unwrap(), Color::BLACK);
        assert_eq!(image.color_at(Point::new(1, 0)).unwrap(), Color::WHITE);
        assert_eq!(image.color_at(Point::new(3, 2)).unwrap(), Color::WHITE);
    }

    // =========================================================================
    // Output
    // =========================================================================

    #[test]
    fn show_writes_header_then_bytes() {
        let image = canvas(2, 2, Color::WHITE);
        let mut out = Vec::new();
        image.show(&mut out, "png", SaveOptions::default()).unwrap();

        let header = b"Content-type: image/png\r\n\r\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len() + 1..header.len() + 4], b"PNG");
    }

    #[test]
    fn get_unknown_format_is_runtime() {
        let image = canvas(2, 2, Color::WHITE);
        let err = image.get("bmp", SaveOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
        assert!(err.to_string().contains("jpeg, jpg, gif, png, wbmp, xbm"));
    }

    #[test]
    fn save_writes_file_by_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("out.jpg");
        canvas(8, 8, Color::rgb(20, 90, 240))
            .save(&path, SaveOptions::with_quality(90))
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn save_unknown_extension_is_runtime() {
        let tmp = tempfile::TempDir::new().unwrap();
        let err = canvas(2, 2, Color::WHITE)
            .save(tmp.path().join("out.tiff"), SaveOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Runtime(_)));
    }

    #[test]
    fn png_round_trips_through_factory() {
        let image = canvas(6, 4, Color::rgb(1, 2, 3));
        let reloaded = Imagine::new(BackendKind::Rust)
            .load(&image.to_png().unwrap())
            .unwrap();
        assert_eq!(reloaded.size(), dims(6, 4));
        assert_eq!(reloaded.color_at(Point::new(5, 3)).unwrap(), Color::rgb(1, 2, 3));
    }

    #[test]
    fn thumbnail_does_not_touch_source() {
        let image = canvas(20, 40, Color::WHITE);
        let thumb = image.thumbnail(dims(10, 10), ThumbnailMode::Outbound).unwrap();
        assert_eq!(thumb.size(), dims(10, 10));
        assert_eq!(image.size(), dims(20, 40));
    }
}
