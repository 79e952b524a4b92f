//! Image resources, backends and derived-image operations, in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, GIF) + ICC profile capture |
//! | **Resize** | `imageops::resize`, Lanczos3 |
//! | **Rotate** | exact quarter turns, nearest-neighbour otherwise |
//! | **Encode** | `image` codecs for JPEG/PNG/GIF, built-in WBMP/XBM |
//! | **Thumbnail** | resize + centered crop |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for thumbnail geometry (unit testable)
//! - **Parameters**: Formats, quality, thumbnail modes
//! - **Backend**: [`ImageBackend`] / [`Canvas`] traits + [`RustBackend`] and [`OpaqueBackend`]
//! - **Image**: [`Image`], the owned canvas with copy-replace transforms
//! - **Operations**: masking, thumbnails and histograms on top of [`Image`]
//! - **Factory**: [`Imagine`], which creates, opens and loads images

pub mod backend;
mod bilevel;
mod calculations;
mod imagine;
pub mod opaque_backend;
pub mod operations;
mod params;
mod resource;
pub mod rust_backend;

pub use backend::{BackendKind, Canvas, ImageBackend};
pub use calculations::{ThumbnailPlan, plan_thumbnail};
pub use imagine::Imagine;
pub use opaque_backend::OpaqueBackend;
pub use params::{Format, Quality, SaveOptions, ThumbnailMode};
pub use resource::Image;
pub use rust_backend::RustBackend;
