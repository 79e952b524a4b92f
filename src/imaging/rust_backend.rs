//! Pure Rust RGBA backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, GIF) | `image::ImageReader` → `into_decoder` (keeps the ICC profile) |
//! | Crop | `image::imageops::crop_imm` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Rotate (multiples of 90°) | `image::imageops::rotate90/180/270` |
//! | Rotate (other angles) | nearest-neighbour inverse mapping onto the rotated bounding box |
//! | Flip | `image::imageops::flip_horizontal` / `flip_vertical` |
//! | Encode JPEG / PNG | `JpegEncoder` / `PngEncoder`, ICC profile embedded when present |
//! | Encode GIF | `DynamicImage::write_to` |
//! | Encode WBMP / XBM | [`bilevel`](super::bilevel) |
//!
//! The generic buffer helpers in this module are shared with
//! [`OpaqueBackend`](super::opaque_backend::OpaqueBackend), which differs only
//! in pixel type and metadata support.

use super::backend::{BackendKind, Canvas, ImageBackend};
use super::bilevel::Bilevel;
use super::params::{Format, Quality};
use crate::color::{Color, Palette};
use crate::error::{Error, Result};
use crate::geometry::{Dimensions, Point};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{
    DynamicImage, ExtendedColorType, ImageBuffer, ImageDecoder, ImageEncoder, ImageReader, Pixel,
    RgbaImage,
};
use std::io::Cursor;
use tracing::warn;

pub(super) type Buffer<P> = ImageBuffer<P, Vec<u8>>;

/// Pure Rust backend producing RGBA canvases.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rust
    }

    fn create(&self, size: Dimensions, background: Color) -> Result<Box<dyn Canvas>> {
        let pixel = pixel_for(Palette::RGBA, background);
        Ok(Box::new(RgbaCanvas {
            buffer: RgbaImage::from_pixel(size.width(), size.height(), pixel),
            icc_profile: None,
        }))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Canvas>> {
        let (img, icc_profile) = decode_with_icc(bytes)?;
        Ok(Box::new(RgbaCanvas {
            buffer: img.to_rgba8(),
            icc_profile,
        }))
    }
}

/// RGBA canvas with the ICC profile it was decoded with.
#[derive(Debug, Clone)]
pub struct RgbaCanvas {
    buffer: RgbaImage,
    icc_profile: Option<Vec<u8>>,
}

impl RgbaCanvas {
    fn derive(&self, buffer: RgbaImage) -> Box<dyn Canvas> {
        Box::new(RgbaCanvas {
            buffer,
            icc_profile: self.icc_profile.clone(),
        })
    }

    pub fn icc_profile(&self) -> Option<&[u8]> {
        self.icc_profile.as_deref()
    }
}

impl Canvas for RgbaCanvas {
    fn kind(&self) -> BackendKind {
        BackendKind::Rust
    }

    fn palette(&self) -> Palette {
        Palette::RGBA
    }

    fn dimensions(&self) -> Dimensions {
        buffer_dimensions(&self.buffer)
    }

    fn duplicate(&self) -> Result<Box<dyn Canvas>> {
        Ok(Box::new(self.clone()))
    }

    fn color_at(&self, point: Point) -> Option<Color> {
        read_pixel(&self.buffer, Palette::RGBA, point)
    }

    fn set_color_at(&mut self, point: Point, color: Color) -> Result<()> {
        write_pixel(&mut self.buffer, Palette::RGBA, point, color)
    }

    fn cropped(&self, start: Point, size: Dimensions) -> Result<Box<dyn Canvas>> {
        Ok(self.derive(crop(&self.buffer, start, size)?))
    }

    fn resized(&self, size: Dimensions) -> Result<Box<dyn Canvas>> {
        Ok(self.derive(resize(&self.buffer, size)))
    }

    fn rotated(&self, angle: f64, background: Option<Color>) -> Result<Box<dyn Canvas>> {
        let fill = background.unwrap_or(Color::WHITE.with_alpha(0));
        Ok(self.derive(rotate(&self.buffer, angle, pixel_for(Palette::RGBA, fill))?))
    }

    fn flipped_horizontally(&self) -> Result<Box<dyn Canvas>> {
        Ok(self.derive(imageops::flip_horizontal(&self.buffer)))
    }

    fn flipped_vertically(&self) -> Result<Box<dyn Canvas>> {
        Ok(self.derive(imageops::flip_vertical(&self.buffer)))
    }

    fn strip(&mut self) -> Result<()> {
        self.icc_profile = None;
        Ok(())
    }

    fn encode(&self, format: Format, quality: Quality) -> Result<Vec<u8>> {
        let img = DynamicImage::ImageRgba8(self.buffer.clone());
        encode_dynamic(&img, format, quality, self.icc_profile.as_deref())
    }
}

// =========================================================================
// Shared buffer helpers
// =========================================================================

pub(super) fn buffer_dimensions<P: Pixel<Subpixel = u8>>(buffer: &Buffer<P>) -> Dimensions {
    Dimensions {
        width: buffer.width(),
        height: buffer.height(),
    }
}

pub(super) fn pixel_for<P: Pixel<Subpixel = u8>>(palette: Palette, color: Color) -> P {
    let sample = palette.sample(color);
    *P::from_slice(&sample[..palette.channels()])
}

pub(super) fn read_pixel<P: Pixel<Subpixel = u8>>(
    buffer: &Buffer<P>,
    palette: Palette,
    point: Point,
) -> Option<Color> {
    buffer
        .get_pixel_checked(point.x, point.y)
        .map(|pixel| palette.color(pixel.channels()))
}

pub(super) fn write_pixel<P: Pixel<Subpixel = u8>>(
    buffer: &mut Buffer<P>,
    palette: Palette,
    point: Point,
    color: Color,
) -> Result<()> {
    let pixel = buffer
        .get_pixel_mut_checked(point.x, point.y)
        .ok_or_else(|| Error::out_of_bounds(format!("Pixel {point} is outside the canvas")))?;
    *pixel = pixel_for(palette, color);
    Ok(())
}

pub(super) fn crop<P: Pixel<Subpixel = u8> + 'static>(
    buffer: &Buffer<P>,
    start: Point,
    size: Dimensions,
) -> Result<Buffer<P>> {
    let bounds = buffer_dimensions(buffer);
    if !bounds.contains(size, start) {
        return Err(Error::out_of_bounds(format!(
            "Crop of {size} at {start} exceeds the {bounds} canvas"
        )));
    }
    Ok(imageops::crop_imm(buffer, start.x, start.y, size.width(), size.height()).to_image())
}

pub(super) fn resize<P: Pixel<Subpixel = u8> + 'static>(
    buffer: &Buffer<P>,
    size: Dimensions,
) -> Buffer<P> {
    imageops::resize(buffer, size.width(), size.height(), FilterType::Lanczos3)
}

/// Rotate clockwise by `angle` degrees onto the rotated bounding box.
pub(super) fn rotate<P: Pixel<Subpixel = u8> + 'static>(
    buffer: &Buffer<P>,
    angle: f64,
    background: P,
) -> Result<Buffer<P>> {
    if !angle.is_finite() {
        return Err(Error::runtime(format!("Cannot rotate by {angle} degrees")));
    }
    let normalized = angle.rem_euclid(360.0);
    if normalized == 0.0 {
        return Ok(buffer.clone());
    } else if normalized == 90.0 {
        return Ok(imageops::rotate90(buffer));
    } else if normalized == 180.0 {
        return Ok(imageops::rotate180(buffer));
    } else if normalized == 270.0 {
        return Ok(imageops::rotate270(buffer));
    }

    let (sin, cos) = normalized.to_radians().sin_cos();
    let (w, h) = (buffer.width() as f64, buffer.height() as f64);
    let out_w = (w * cos.abs() + h * sin.abs()).round().max(1.0) as u32;
    let out_h = (w * sin.abs() + h * cos.abs()).round().max(1.0) as u32;
    let (cx, cy) = (w / 2.0, h / 2.0);
    let (out_cx, out_cy) = (out_w as f64 / 2.0, out_h as f64 / 2.0);

    Ok(ImageBuffer::from_fn(out_w, out_h, |x, y| {
        let dx = x as f64 + 0.5 - out_cx;
        let dy = y as f64 + 0.5 - out_cy;
        // Inverse of a clockwise turn in y-down coordinates.
        let sx = dx * cos + dy * sin + cx;
        let sy = -dx * sin + dy * cos + cy;
        if sx >= 0.0 && sy >= 0.0 && sx < w && sy < h {
            *buffer.get_pixel(sx as u32, sy as u32)
        } else {
            background
        }
    }))
}

/// Decode bytes, returning the image and its ICC profile when the container has one.
pub(super) fn decode_with_icc(bytes: &[u8]) -> Result<(DynamicImage, Option<Vec<u8>>)> {
    let undecodable =
        |e: image::ImageError| Error::invalid_argument(format!("Cannot decode image: {e}"));

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| Error::invalid_argument(format!("Cannot read image data: {e}")))?;
    let mut decoder = reader.into_decoder().map_err(undecodable)?;
    let icc_profile = decoder.icc_profile().unwrap_or_else(|e| {
        warn!("ignoring unreadable ICC profile: {e}");
        None
    });
    let img = DynamicImage::from_decoder(decoder).map_err(undecodable)?;

    if img.width() == 0 || img.height() == 0 {
        return Err(Error::invalid_argument("Decoded image has no pixels"));
    }
    Ok((img, icc_profile))
}

/// Encode through the `image` codecs (or the bilevel encoders).
pub(super) fn encode_dynamic(
    img: &DynamicImage,
    format: Format,
    quality: Quality,
    icc_profile: Option<&[u8]>,
) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        Format::Jpeg => {
            let rgb = img.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.value() as u8);
            embed_icc(&mut encoder, icc_profile);
            encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)?;
        }
        Format::Png => {
            let mut encoder = PngEncoder::new(&mut out);
            embed_icc(&mut encoder, icc_profile);
            encoder.write_image(img.as_bytes(), img.width(), img.height(), img.color().into())?;
        }
        Format::Gif => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            rgba.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Gif)?;
        }
        Format::Wbmp => out = Bilevel::from_image(img).encode_wbmp(),
        Format::Xbm => out = Bilevel::from_image(img).encode_xbm("image").into_bytes(),
    }
    Ok(out)
}

fn embed_icc<E: ImageEncoder>(encoder: &mut E, icc_profile: Option<&[u8]>) {
    let Some(icc) = icc_profile else {
        return;
    };
    if let Err(e) = encoder.set_icc_profile(icc.to_vec()) {
        warn!("encoder dropped ICC profile: {e}");
    }
}
