//! Color values and backend palettes.
//!
//! A [`Color`] holds three 8-bit channels plus an alpha on a **0–100** scale
//! (100 is fully opaque). Alpha is deliberately not on the 0–255 scale of the
//! channels; palettes convert between the two when talking to a backend.
//!
//! ## Blending
//!
//! [`Color::blend`] interpolates from the first color towards the second:
//!
//! ```text
//! channel = clamp(round(a + (b - a) * weight))
//! ```
//!
//! `weight = 0` yields `a`, `weight = 1` yields `b`, and weights outside
//! `[0, 1]` extrapolate. Rounding is half away from zero. Alpha is blended the
//! same way and clamped to `[0, 100]`.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

pub const MAX_ALPHA: u8 = 100;

/// An immutable RGB color with a 0–100 alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    red: u8,
    green: u8,
    blue: u8,
    alpha: u8,
}

fn clamp_channel(value: i64) -> u8 {
    value.clamp(0, 255) as u8
}

fn clamp_alpha(value: i64) -> u8 {
    value.clamp(0, MAX_ALPHA as i64) as u8
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    /// Opaque color from in-range channels.
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: MAX_ALPHA,
        }
    }

    /// Build a color from possibly out-of-range values; everything is clamped.
    pub fn new(red: i64, green: i64, blue: i64, alpha: i64) -> Self {
        Self {
            red: clamp_channel(red),
            green: clamp_channel(green),
            blue: clamp_channel(blue),
            alpha: clamp_alpha(alpha),
        }
    }

    /// Build a color from `[r, g, b]` or `[r, g, b, alpha]`.
    ///
    /// The fourth entry is alpha on the 0–100 scale.
    pub fn from_channels(channels: &[i64]) -> Result<Self> {
        match *channels {
            [r, g, b] => Ok(Self::new(r, g, b, MAX_ALPHA as i64)),
            [r, g, b, a] => Ok(Self::new(r, g, b, a)),
            _ => Err(Error::invalid_argument(format!(
                "Color expects 3 or 4 channels, {} given",
                channels.len()
            ))),
        }
    }

    /// Parse `#rgb`, `rgb`, `#rrggbb` or `rrggbb`. The result is opaque.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || {
            Error::invalid_argument(format!(
                "Color must be a hex value like #fff or #ffffff, {hex:?} given"
            ))
        };

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return Err(invalid()),
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Same RGB with a replaced (clamped) alpha.
    pub fn with_alpha(self, alpha: i64) -> Self {
        Self {
            alpha: clamp_alpha(alpha),
            ..self
        }
    }

    pub fn red(&self) -> u8 {
        self.red
    }

    pub fn green(&self) -> u8 {
        self.green
    }

    pub fn blue(&self) -> u8 {
        self.blue
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }

    pub fn is_opaque(&self) -> bool {
        self.alpha == MAX_ALPHA
    }

    /// Adjust alpha by a signed percentage, clamped to `[0, 100]`.
    pub fn dissolve(&self, delta: i64) -> Self {
        self.with_alpha(self.alpha as i64 + delta)
    }

    /// Linear interpolation from `self` towards `other`. See the module docs.
    pub fn blend(&self, other: &Color, weight: f64) -> Self {
        let lerp = |a: u8, b: u8| {
            let value = a as f64 + (b as f64 - a as f64) * weight;
            value.round() as i64
        };
        Self::new(
            lerp(self.red, other.red),
            lerp(self.green, other.green),
            lerp(self.blue, other.blue),
            lerp(self.alpha, other.alpha),
        )
    }

    /// Rec.601 luma, rounded.
    pub fn luma(&self) -> u8 {
        let y = 0.299 * self.red as f64 + 0.587 * self.green as f64 + 0.114 * self.blue as f64;
        clamp_channel(y.round() as i64)
    }

    /// HSL lightness: the midpoint of the largest and smallest channel.
    pub fn lightness(&self) -> u8 {
        let max = self.red.max(self.green).max(self.blue) as f64;
        let min = self.red.min(self.green).min(self.blue) as f64;
        clamp_channel(((max + min) / 2.0).round() as i64)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

/// Channel layout of a backend's raw samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

/// Maps raw backend samples to [`Color`] and back.
///
/// Each backend picks one palette when it is built and never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    layout: ChannelLayout,
}

impl Palette {
    pub const RGB: Palette = Palette {
        layout: ChannelLayout::Rgb,
    };
    pub const RGBA: Palette = Palette {
        layout: ChannelLayout::Rgba,
    };

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        match self.layout {
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    pub fn has_alpha(&self) -> bool {
        self.layout == ChannelLayout::Rgba
    }

    /// Interpret a raw sample. Missing channels read as 0, missing alpha as opaque.
    pub fn color(&self, sample: &[u8]) -> Color {
        let at = |i: usize| sample.get(i).copied().unwrap_or(0);
        let alpha = match self.layout {
            ChannelLayout::Rgb => MAX_ALPHA,
            ChannelLayout::Rgba => sample.get(3).copied().map_or(MAX_ALPHA, sample_to_alpha),
        };
        Color::rgb(at(0), at(1), at(2)).with_alpha(alpha as i64)
    }

    /// Raw sample for `color`; only the first [`channels`](Self::channels) entries are meaningful.
    pub fn sample(&self, color: Color) -> [u8; 4] {
        let alpha = match self.layout {
            ChannelLayout::Rgb => 255,
            ChannelLayout::Rgba => alpha_to_sample(color.alpha),
        };
        [color.red, color.green, color.blue, alpha]
    }
}

fn alpha_to_sample(alpha: u8) -> u8 {
    (alpha as f64 * 255.0 / MAX_ALPHA as f64).round() as u8
}

fn sample_to_alpha(sample: u8) -> u8 {
    (sample as f64 * MAX_ALPHA as f64 / 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Construction
    // =========================================================================

    #[test]
    fn channels_clamped_on_construction() {
        let c = Color::new(-20, 300, 128, 150);
        assert_eq!((c.red(), c.green(), c.blue(), c.alpha()), (0, 255, 128, 100));
    }

    #[test]
    fn three_channels_default_to_opaque() {
        let c = Color::from_channels(&[23, 24, 0]).unwrap();
        assert_eq!(c.alpha(), 100);
    }

    #[test]
    fn fourth_channel_is_alpha_percent() {
        let c = Color::from_channels(&[23, 24, 0, 34]).unwrap();
        assert_eq!(c.alpha(), 34);
        assert_eq!(c.red(), 23);
    }

    #[test]
    fn wrong_channel_count_rejected() {
        assert!(matches!(
            Color::from_channels(&[1, 2]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Color::from_channels(&[1, 2, 3, 4, 5]).is_err());
    }

    #[test]
    fn hex_short_and_long_forms() {
        assert_eq!(Color::from_hex("ff0").unwrap(), Color::rgb(255, 255, 0));
        assert_eq!(Color::from_hex("#ff0").unwrap(), Color::rgb(255, 255, 0));
        assert_eq!(Color::from_hex("#5E5F01").unwrap(), Color::rgb(0x5e, 0x5f, 0x01));
        assert_eq!("111".parse::<Color>().unwrap(), Color::rgb(0x11, 0x11, 0x11));
    }

    #[test]
    fn hex_rejects_garbage() {
        assert!(Color::from_hex("#ff").is_err());
        assert!(Color::from_hex("zzzzzz").is_err());
        assert!(Color::from_hex("#ff00ff00").is_err());
    }

    #[test]
    fn display_omits_alpha() {
        assert_eq!(Color::rgb(0, 0, 255).with_alpha(10).to_string(), "#0000ff");
        assert_eq!(Color::rgb(86, 86, 86).to_string(), "#565656");
    }

    // =========================================================================
    // Dissolve / blend
    // =========================================================================

    #[test]
    fn dissolve_clamps_both_ends() {
        assert_eq!(Color::BLACK.with_alpha(0).dissolve(-50).alpha(), 0);
        assert_eq!(Color::BLACK.dissolve(50).alpha(), 100);
        assert_eq!(Color::BLACK.with_alpha(40).dissolve(25).alpha(), 65);
    }

    #[test]
    fn dissolve_keeps_rgb() {
        let c = Color::rgb(1, 2, 3).dissolve(-30);
        assert_eq!((c.red(), c.green(), c.blue()), (1, 2, 3));
    }

    #[test]
    fn blend_interpolates_from_first_to_second() {
        let a = Color::rgb(1, 2, 3);
        let b = Color::rgb(50, 25, 32);
        assert_eq!(a.blend(&b, 0.4), Color::rgb(21, 11, 15));
        assert_eq!(a.blend(&b, 0.0), a);
        assert_eq!(a.blend(&b, 1.0), b);
    }

    #[test]
    fn blend_extrapolates_and_clamps() {
        let a = Color::rgb(128, 0, 0);
        let b = Color::rgb(230, 0, 0);
        assert_eq!(a.blend(&b, 1.1), Color::rgb(240, 0, 0));
        assert_eq!(a.blend(&Color::WHITE, 3.0).red(), 255);
        assert_eq!(a.blend(&Color::BLACK, -1.0).red(), 255);
    }

    #[test]
    fn blend_interpolates_alpha() {
        let a = Color::BLACK.with_alpha(0);
        let b = Color::BLACK;
        assert_eq!(a.blend(&b, 0.25).alpha(), 25);
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    #[test]
    fn luma_uses_rec601_weights() {
        assert_eq!(Color::rgb(20, 90, 240).luma(), 86);
        assert_eq!(Color::WHITE.luma(), 255);
    }

    #[test]
    fn lightness_is_extreme_midpoint() {
        assert_eq!(Color::rgb(255, 0, 0).lightness(), 128);
        assert_eq!(Color::rgb(20, 90, 240).lightness(), 130);
    }

    // =========================================================================
    // Palette
    // =========================================================================

    #[test]
    fn rgba_palette_maps_alpha_scale() {
        let p = Palette::RGBA;
        assert_eq!(p.color(&[10, 20, 30, 255]).alpha(), 100);
        assert_eq!(p.color(&[10, 20, 30, 0]).alpha(), 0);
        assert_eq!(p.color(&[10, 20, 30, 128]).alpha(), 50);
        assert_eq!(p.sample(Color::BLACK.with_alpha(50)), [0, 0, 0, 128]);
    }

    #[test]
    fn rgba_palette_round_trips_every_alpha() {
        let p = Palette::RGBA;
        for alpha in 0..=100 {
            let c = Color::rgb(1, 2, 3).with_alpha(alpha);
            assert_eq!(p.color(&p.sample(c)), c);
        }
    }

    #[test]
    fn rgb_palette_is_always_opaque() {
        let p = Palette::RGB;
        assert_eq!(p.channels(), 3);
        assert!(!p.has_alpha());
        assert_eq!(p.color(&[1, 2, 3]).alpha(), 100);
        assert_eq!(p.sample(Color::BLACK.with_alpha(0))[..3], [0, 0, 0]);
    }
}
