//! The factory that produces [`Image`]s.
//!
//! An [`Imagine`] picks one [`ImageBackend`] when it is built and every image
//! it creates, opens or loads lives on that backend.

use super::backend::{BackendKind, ImageBackend};
use super::params::SaveOptions;
use super::resource::Image;
use crate::color::Color;
use crate::config::ImagineConfig;
use crate::draw::Font;
use crate::error::{Error, Result};
use crate::geometry::Dimensions;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug)]
pub struct Imagine {
    backend: Box<dyn ImageBackend>,
    background: Color,
    save_options: SaveOptions,
}

impl Imagine {
    pub fn new(kind: BackendKind) -> Self {
        Self::with_backend(kind.backend())
    }

    /// Use a caller-provided backend implementation.
    pub fn with_backend(backend: Box<dyn ImageBackend>) -> Self {
        Self {
            backend,
            background: Color::WHITE,
            save_options: SaveOptions::default(),
        }
    }

    /// Factory configured from a validated [`ImagineConfig`].
    pub fn from_config(config: &ImagineConfig) -> Result<Self> {
        let background = config.canvas.color().map_err(|e| Error::invalid_argument(e.to_string()))?;
        Ok(Self {
            backend: config.backend.backend(),
            background,
            save_options: SaveOptions::with_quality(config.output.quality),
        })
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Encode options matching the configured quality.
    pub fn save_options(&self) -> SaveOptions {
        self.save_options
    }

    /// Blank canvas of `size`, filled with `color` or the default background.
    pub fn create(&self, size: Dimensions, color: Option<Color>) -> Result<Image> {
        let background = color.unwrap_or(self.background);
        let canvas = self.backend.create(size, background)?;
        debug!(backend = %self.kind(), %size, %background, "created canvas");
        Ok(Image::from_canvas(canvas))
    }

    pub fn open(&self, path: impl AsRef<Path>) -> Result<Image> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|_| {
            Error::invalid_argument(format!("File {} doesn't exist", path.display()))
        })?;
        debug!(path = %path.display(), "opening image");
        self.load(&bytes)
    }

    /// Decode an image from encoded bytes.
    pub fn load(&self, bytes: &[u8]) -> Result<Image> {
        Ok(Image::from_canvas(self.backend.decode(bytes)?))
    }

    /// Decode an image from everything `reader` yields.
    pub fn read(&self, mut reader: impl Read) -> Result<Image> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| Error::invalid_argument(format!("Cannot read image stream: {e}")))?;
        self.load(&bytes)
    }

    /// Font handle for [`Drawer::text`](crate::draw::Drawer::text).
    ///
    /// None of the built-in backends ship font metrics.
    pub fn font(&self, path: impl AsRef<Path>, size: u32, color: Color) -> Result<Box<dyn Font>> {
        Err(Error::runtime(format!(
            "Font {} ({size}pt, {color}) is not supported by the {} backend",
            path.as_ref().display(),
            self.kind()
        )))
    }
}

impl Default for Imagine {
    fn default() -> Self {
        Self::new(BackendKind::default())
    }
}
