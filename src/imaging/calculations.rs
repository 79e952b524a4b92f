//! Pure calculation functions for thumbnail geometry.
//!
//! All functions here are pure and testable without any canvas.

use super::params::ThumbnailMode;
use crate::geometry::{Dimensions, Point};

/// Scale factor that takes `source` to `target` under `mode`.
///
/// `Inset` picks the smaller of the two axis ratios so the whole image fits;
/// `Outbound` picks the larger so the image covers the target.
pub fn thumbnail_ratio(source: Dimensions, target: Dimensions, mode: ThumbnailMode) -> f64 {
    let width_ratio = target.width() as f64 / source.width() as f64;
    let height_ratio = target.height() as f64 / source.height() as f64;

    match mode {
        ThumbnailMode::Inset => width_ratio.min(height_ratio),
        ThumbnailMode::Outbound => width_ratio.max(height_ratio),
    }
}

/// Origin of a centered `target`-sized window inside `scaled`.
///
/// Per axis: `max(0, round((scaled - target) / 2))`.
pub fn center_crop_origin(scaled: Dimensions, target: Dimensions) -> Point {
    let axis = |s: u32, t: u32| (((s as f64 - t as f64) / 2.0).round()).max(0.0) as u32;
    Point::new(
        axis(scaled.width(), target.width()),
        axis(scaled.height(), target.height()),
    )
}

/// What a thumbnail needs: a resize and, for `Outbound`, a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThumbnailPlan {
    /// Size the source is resized to.
    pub scaled: Dimensions,
    /// Crop window applied after the resize.
    pub crop: Option<(Point, Dimensions)>,
}

/// Plan a thumbnail of `source` against `target`.
pub fn plan_thumbnail(
    source: Dimensions,
    target: Dimensions,
    mode: ThumbnailMode,
) -> ThumbnailPlan {
    let ratio = thumbnail_ratio(source, target, mode);
    let scaled = source.scale(ratio);

    let crop = match mode {
        ThumbnailMode::Inset => None,
        ThumbnailMode::Outbound => Some((center_crop_origin(scaled, target), target)),
    };

    ThumbnailPlan { scaled, crop }
}
