//! # Imagery
//!
//! Backend-independent image manipulation. One contract for creating canvases,
//! transforming them, compositing alpha, and deriving new images (thumbnails,
//! masks, histograms), with the same documented arithmetic on every backend.
//!
//! ```no_run
//! use imagery::color::Color;
//! use imagery::geometry::Dimensions;
//! use imagery::imaging::{BackendKind, Imagine, SaveOptions, ThumbnailMode};
//!
//! # fn main() -> imagery::Result<()> {
//! let imagine = Imagine::new(BackendKind::Rust);
//! let mut image = imagine.open("photo.jpg")?;
//! image.rotate(90.0, None)?.flip_horizontally()?;
//!
//! let thumb = image.thumbnail(Dimensions::new(200, 200)?, ThumbnailMode::Outbound)?;
//! thumb.save("thumb.png", SaveOptions::default())?;
//!
//! let blank = imagine.create(Dimensions::new(64, 64)?, Some(Color::from_hex("#336699")?))?;
//! # let _ = blank;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | The [`Image`](imaging::Image) resource, the [`Imagine`](imaging::Imagine) factory, backends, thumbnails, masks |
//! | [`color`] | [`Color`](color::Color) with 0–100 alpha, blending, palettes |
//! | [`geometry`] | [`Point`](geometry::Point) and [`Dimensions`](geometry::Dimensions) |
//! | [`fill`] | Fill strategies: solid, gradients, closures |
//! | [`effects`] | Negative, grayscale, gamma, brightness |
//! | [`draw`] | Lines, arcs, ellipses, polygons rasterized onto an image |
//! | [`config`] | `imagery.toml` loading, validation and merging |
//! | [`error`] | The crate-wide [`Error`] |
//!
//! # Design Decisions
//!
//! ## Copy-Replace Transforms
//!
//! An image owns exactly one canvas. Crop, resize, rotate and flip build a new
//! canvas and swap it in only once it is complete, so a failed transform never
//! leaves a half-modified image behind. Copies are explicit
//! ([`Image::copy`](imaging::Image::copy)) and fully independent.
//!
//! ## Alpha on a 0–100 Scale
//!
//! Color alpha is an opacity percentage, not a byte. Backends convert to their
//! own sample range through a [`Palette`](color::Palette). All masking and
//! blending math is defined on the percentage.
//!
//! ## One Backend per Factory
//!
//! The backend is chosen once, when the [`Imagine`](imaging::Imagine) is built
//! (directly or from [`config`]). Images from different backends never mix:
//! pasting or masking across them is rejected.

pub mod color;
pub mod config;
pub mod draw;
pub mod effects;
pub mod error;
pub mod fill;
pub mod geometry;
pub mod imaging;

pub use error::{Error, Result};
