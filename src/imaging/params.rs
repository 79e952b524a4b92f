//! Parameter types for image operations.
//!
//! These describe *what* to produce, not *how*. They sit between the public
//! [`Image`](super::Image) API and the [`backend`](super::backend) canvases.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 75). Clamped on construction.
//! - [`SaveOptions`]: Options accepted by `save`, `get` and `show`.
//! - [`Format`]: The fixed output format table and its MIME types.
//! - [`ThumbnailMode`]: Fit-inside (`Inset`) or cover-and-crop (`Outbound`).

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// Options for encoding an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    pub quality: Quality,
}

impl SaveOptions {
    pub fn with_quality(quality: u32) -> Self {
        Self {
            quality: Quality::new(quality),
        }
    }
}

/// Output formats and their MIME types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Jpeg,
    Gif,
    Png,
    Wbmp,
    Xbm,
}

/// Accepted format names, in the order they are reported to callers.
const FORMAT_NAMES: &[(&str, Format)] = &[
    ("jpeg", Format::Jpeg),
    ("jpg", Format::Jpeg),
    ("gif", Format::Gif),
    ("png", Format::Png),
    ("wbmp", Format::Wbmp),
    ("xbm", Format::Xbm),
];

impl Format {
    /// Look up a format by name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self> {
        FORMAT_NAMES
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, format)| *format)
            .ok_or_else(|| {
                let supported: Vec<&str> = FORMAT_NAMES.iter().map(|(n, _)| *n).collect();
                Error::runtime(format!(
                    "Unsupported format given. Only {} are supported, {name} given",
                    supported.join(", ")
                ))
            })
    }

    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_name(ext)
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Format::Jpeg => "image/jpeg",
            Format::Gif => "image/gif",
            Format::Png => "image/png",
            Format::Wbmp => "image/vnd.wap.wbmp",
            Format::Xbm => "image/xbm",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Format::Jpeg => "jpeg",
            Format::Gif => "gif",
            Format::Png => "png",
            Format::Wbmp => "wbmp",
            Format::Xbm => "xbm",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// How a thumbnail relates to its target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThumbnailMode {
    /// Scale to fit entirely inside the target; one side matches, the other is ≤.
    #[default]
    Inset,
    /// Scale to cover the target, then center-crop to exactly the target.
    Outbound,
}

impl FromStr for ThumbnailMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inset" => Ok(ThumbnailMode::Inset),
            "outbound" => Ok(ThumbnailMode::Outbound),
            _ => Err(Error::invalid_argument(format!(
                "Invalid mode specified: {s}"
            ))),
        }
    }
}
