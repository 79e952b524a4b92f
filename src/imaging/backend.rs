//! Image backend traits and shared types.
//!
//! Two traits split the backend contract:
//!
//! - [`ImageBackend`] is the factory side: it allocates canvases (blank or
//!   decoded). One backend is chosen when an [`Imagine`](super::Imagine) is
//!   built and never changes afterwards.
//! - [`Canvas`] is the native handle an [`Image`](super::Image) owns. Every
//!   geometric transform returns a *new* canvas and leaves `self` untouched,
//!   which is what lets `Image` swap handles without ever exposing a
//!   half-transformed state.
//!
//! Implementations: [`RustBackend`](super::rust_backend::RustBackend) (RGBA,
//! keeps ICC metadata) and [`OpaqueBackend`](super::opaque_backend::OpaqueBackend)
//! (RGB, no metadata).

use super::params::{Format, Quality};
use crate::color::{Color, Palette};
use crate::error::Result;
use crate::geometry::{Dimensions, Point};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a backend implementation.
///
/// Canvases from different kinds never mix: `paste` and `apply_mask` reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Rust,
    Opaque,
}

impl BackendKind {
    /// Build the backend this kind names.
    pub fn backend(self) -> Box<dyn ImageBackend> {
        match self {
            BackendKind::Rust => Box::new(super::rust_backend::RustBackend::new()),
            BackendKind::Opaque => Box::new(super::opaque_backend::OpaqueBackend::new()),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Rust => f.write_str("rust"),
            BackendKind::Opaque => f.write_str("opaque"),
        }
    }
}

/// A native pixel buffer.
///
/// Transform methods return a freshly allocated canvas; on error nothing has
/// changed. Pixel reads are bounds-checked and return `None` outside the canvas.
pub trait Canvas: fmt::Debug + Send {
    fn kind(&self) -> BackendKind;

    fn palette(&self) -> Palette;

    /// Live dimensions of the buffer.
    fn dimensions(&self) -> Dimensions;

    /// Independent deep copy.
    fn duplicate(&self) -> Result<Box<dyn Canvas>>;

    fn color_at(&self, point: Point) -> Option<Color>;

    /// Write one pixel. Fails with `OutOfBounds` outside the canvas.
    fn set_color_at(&mut self, point: Point, color: Color) -> Result<()>;

    fn cropped(&self, start: Point, size: Dimensions) -> Result<Box<dyn Canvas>>;

    fn resized(&self, size: Dimensions) -> Result<Box<dyn Canvas>>;

    /// Rotate clockwise by `angle` degrees. Exposed area is filled with
    /// `background`, or the backend's default when `None`.
    fn rotated(&self, angle: f64, background: Option<Color>) -> Result<Box<dyn Canvas>>;

    fn flipped_horizontally(&self) -> Result<Box<dyn Canvas>>;

    fn flipped_vertically(&self) -> Result<Box<dyn Canvas>>;

    /// Drop embedded metadata. Backends without metadata support fail with `Runtime`.
    fn strip(&mut self) -> Result<()>;

    fn encode(&self, format: Format, quality: Quality) -> Result<Vec<u8>>;
}

/// Factory for one backend's canvases.
pub trait ImageBackend: fmt::Debug + Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Blank canvas filled with `background`.
    fn create(&self, size: Dimensions, background: Color) -> Result<Box<dyn Canvas>>;

    /// Decode an encoded image. Undecodable input fails with `InvalidArgument`.
    fn decode(&self, bytes: &[u8]) -> Result<Box<dyn Canvas>>;
}
