//! RGB backend without an alpha channel or metadata.
//!
//! Shares the buffer helpers of [`rust_backend`](super::rust_backend) but stores
//! `image::RgbImage`: every pixel reads back fully opaque and the alpha of
//! written colors is discarded. It carries no metadata, so `strip` is an
//! unsupported capability rather than a silent no-op.

use super::backend::{BackendKind, Canvas, ImageBackend};
use super::params::{Format, Quality};
use super::rust_backend::{
    buffer_dimensions, crop, decode_with_icc, encode_dynamic, pixel_for, read_pixel, resize,
    rotate, write_pixel,
};
use crate::color::{Color, Palette};
use crate::error::{Error, Result};
use crate::geometry::{Dimensions, Point};
use image::imageops;
use image::{DynamicImage, RgbImage};

#[derive(Debug, Clone, Copy, Default)]
pub struct OpaqueBackend;

impl OpaqueBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ImageBackend for OpaqueBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Opaque
    }

    fn create(&self, size: Dimensions, background: Color) -> Result<Box<dyn Canvas>> {
        let pixel = pixel_for(Palette::RGB, background);
        Ok(Box::new(RgbCanvas {
            buffer: RgbImage::from_pixel(size.width(), size.height(), pixel),
        }))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Canvas>> {
        let (img, _) = decode_with_icc(bytes)?;
        Ok(Box::new(RgbCanvas {
            buffer: img.to_rgb8(),
        }))
    }
}

#[derive(Debug, Clone)]
pub struct RgbCanvas {
    buffer: RgbImage,
}

fn boxed(buffer: RgbImage) -> Box<dyn Canvas> {
    Box::new(RgbCanvas { buffer })
}

impl Canvas for RgbCanvas {
    fn kind(&self) -> BackendKind {
        BackendKind::Opaque
    }

    fn palette(&self) -> Palette {
        Palette::RGB
    }

    fn dimensions(&self) -> Dimensions {
        buffer_dimensions(&self.buffer)
    }

    fn duplicate(&self) -> Result<Box<dyn Canvas>> {
        Ok(Box::new(self.clone()))
    }

    fn color_at(&self, point: Point) -> Option<Color> {
        read_pixel(&self.buffer, Palette::RGB, point)
    }

    fn set_color_at(&mut self, point: Point, color: Color) -> Result<()> {
        write_pixel(&mut self.buffer, Palette::RGB, point, color)
    }

    fn cropped(&self, start: Point, size: Dimensions) -> Result<Box<dyn Canvas>> {
        Ok(boxed(crop(&self.buffer, start, size)?))
    }

    fn resized(&self, size: Dimensions) -> Result<Box<dyn Canvas>> {
        Ok(boxed(resize(&self.buffer, size)))
    }

    fn rotated(&self, angle: f64, background: Option<Color>) -> Result<Box<dyn Canvas>> {
        let fill = pixel_for(Palette::RGB, background.unwrap_or(Color::WHITE));
        Ok(boxed(rotate(&self.buffer, angle, fill)?))
    }

    fn flipped_horizontally(&self) -> Result<Box<dyn Canvas>> {
        Ok(boxed(imageops::flip_horizontal(&self.buffer)))
    }

    fn flipped_vertically(&self) -> Result<Box<dyn Canvas>> {
        Ok(boxed(imageops::flip_vertical(&self.buffer)))
    }

    fn strip(&mut self) -> Result<()> {
        Err(Error::runtime("The opaque backend does not support image strip"))
    }

    fn encode(&self, format: Format, quality: Quality) -> Result<Vec<u8>> {
        let img = DynamicImage::ImageRgb8(self.buffer.clone());
        encode_dynamic(&img, format, quality, None)
    }
}
