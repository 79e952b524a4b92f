//! Factory configuration.
//!
//! Handles loading, validating, and merging `imagery.toml` files. Stock
//! defaults form the base layer; a user file only overrides the keys it sets.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! backend = "rust"          # "rust" (RGBA, keeps ICC profiles) or "opaque" (RGB)
//!
//! [output]
//! quality = 75              # JPEG quality (1-100)
//!
//! [canvas]
//! background = "#ffffff"    # Fill of create() when no color is given
//! alpha = 100               # Opacity of that fill (0-100)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::color::{Color, MAX_ALPHA};
use crate::imaging::BackendKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "imagery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Factory configuration loaded from `imagery.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagineConfig {
    /// Backend every image of the factory lives on.
    pub backend: BackendKind,
    pub output: OutputConfig,
    pub canvas: CanvasConfig,
}

impl ImagineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        if self.canvas.alpha > MAX_ALPHA as u32 {
            return Err(ConfigError::Validation(
                "canvas.alpha must be 0-100".into(),
            ));
        }
        self.canvas.color()?;
        Ok(())
    }
}

/// Encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { quality: 75 }
    }
}

/// Default canvas fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanvasConfig {
    /// Hex color, `#rgb` or `#rrggbb`.
    pub background: String,
    pub alpha: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            alpha: MAX_ALPHA as u32,
        }
    }
}

impl CanvasConfig {
    /// The configured background as a [`Color`].
    pub fn color(&self) -> Result<Color, ConfigError> {
        let color = Color::from_hex(&self.background)
            .map_err(|e| ConfigError::Validation(format!("canvas.background: {e}")))?;
        Ok(color.with_alpha(self.alpha as i64))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ImagineConfig::default())
        .map_err(|e| ConfigError::Validation(format!("stock defaults: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist, `Err` if it exists but
/// contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<ImagineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ImagineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path`, merged on top of stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<ImagineConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Load `imagery.toml` from a directory, if present.
pub fn load_config_in(dir: &Path) -> Result<ImagineConfig, ConfigError> {
    load_config(&dir.join(CONFIG_FILE_NAME))
}

/// Returns a fully-commented stock `imagery.toml` with all keys and explanations.
pub fn stock_config_toml() -> &'static str {
    r##"# Imagery Configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Backend used for every image: "rust" keeps an alpha channel and embedded
# ICC profiles; "opaque" stores RGB only and cannot strip metadata.
backend = "rust"

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[output]
# JPEG quality (1-100). Ignored by lossless formats.
quality = 75

# ---------------------------------------------------------------------------
# Blank canvases
# ---------------------------------------------------------------------------
[canvas]
# Fill used by create() when no color is passed. "#rgb" or "#rrggbb".
background = "#ffffff"
# Opacity of the fill, 0 (transparent) to 100 (opaque).
alpha = 100
"##
}
