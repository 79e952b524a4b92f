//! Per-pixel color effects.
//!
//! The arithmetic lives in plain functions on [`Color`] so it can be tested
//! without a canvas; [`PixelEffects`] applies them to every pixel of an image.
//! Alpha is never changed by an effect.

use crate::color::Color;
use crate::error::{Error, Result};
use crate::imaging::Image;

/// One brightness step subtracts 1/15 of the channel range.
const DARKEN_STEP: f64 = 17.0;

/// Effects available on an image.
pub trait Effects {
    /// Invert every channel: `255 - c`.
    fn negative(&mut self) -> Result<&mut Self>;

    /// Replace every channel with the Rec.601 luma of the pixel.
    fn grayscale(&mut self) -> Result<&mut Self>;

    /// Gamma-correct every channel: `255 * (c / 255) ^ (1 / exponent)`.
    fn gamma(&mut self, exponent: f64) -> Result<&mut Self>;

    /// Multiply every channel by `multiplier`, or darken by `|multiplier|`
    /// steps when it is negative. `0` gives black.
    fn brightness(&mut self, multiplier: f64) -> Result<&mut Self>;
}

pub fn negative(color: Color) -> Color {
    map_channels(color, |c| 255.0 - c)
}

pub fn grayscale(color: Color) -> Color {
    let luma = color.luma();
    Color::rgb(luma, luma, luma).with_alpha(color.alpha() as i64)
}

pub fn gamma(color: Color, exponent: f64) -> Color {
    map_channels(color, |c| 255.0 * (c / 255.0).powf(1.0 / exponent))
}

pub fn brightness(color: Color, multiplier: f64) -> Color {
    if multiplier >= 0.0 {
        map_channels(color, |c| c * multiplier)
    } else {
        map_channels(color, |c| c + multiplier * DARKEN_STEP)
    }
}

fn map_channels(color: Color, f: impl Fn(f64) -> f64) -> Color {
    let channel = |c: u8| f(c as f64).round() as i64;
    Color::new(
        channel(color.red()),
        channel(color.green()),
        channel(color.blue()),
        color.alpha() as i64,
    )
}

fn check_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::invalid_argument(format!(
            "{name} must be a finite number, {value} given"
        )));
    }
    Ok(())
}

/// [`Effects`] bound to one image.
pub struct PixelEffects<'a> {
    image: &'a mut Image,
}

impl<'a> PixelEffects<'a> {
    pub(crate) fn new(image: &'a mut Image) -> Self {
        Self { image }
    }
}

impl Effects for PixelEffects<'_> {
    fn negative(&mut self) -> Result<&mut Self> {
        self.image.map_colors(negative)?;
        Ok(self)
    }

    fn grayscale(&mut self) -> Result<&mut Self> {
        self.image.map_colors(grayscale)?;
        Ok(self)
    }

    fn gamma(&mut self, exponent: f64) -> Result<&mut Self> {
        check_finite("Gamma", exponent)?;
        if exponent <= 0.0 {
            return Err(Error::invalid_argument(format!(
                "Gamma must be greater than 0, {exponent} given"
            )));
        }
        self.image.map_colors(|c| gamma(c, exponent))?;
        Ok(self)
    }

    fn brightness(&mut self, multiplier: f64) -> Result<&mut Self> {
        check_finite("Brightness", multiplier)?;
        self.image.map_colors(|c| brightness(c, multiplier))?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Dimensions, Point};
    use crate::imaging::{BackendKind, Imagine};

    fn canvas(color: Color) -> Image {
        Imagine::new(BackendKind::Rust)
            .create(Dimensions::new(20, 20).unwrap(), Some(color))
            .unwrap()
    }

    fn center(image: &Image) -> Color {
        image.color_at(Point::new(10, 10)).unwrap()
    }

    // =========================================================================
    // Color arithmetic
    // =========================================================================

    #[test]
    fn negative_inverts_and_keeps_alpha() {
        let color = Color::rgb(255, 255, 0).with_alpha(40);
        assert_eq!(negative(color), Color::rgb(0, 0, 255).with_alpha(40));
        assert_eq!(negative(negative(color)), color);
    }

    #[test]
    fn grayscale_uses_luma() {
        assert_eq!(grayscale(Color::rgb(20, 90, 240)), Color::rgb(86, 86, 86));
    }

    #[test]
    fn gamma_one_is_identity() {
        let color = Color::rgb(12, 130, 250);
        assert_eq!(gamma(color, 1.0), color);
    }

    #[test]
    fn gamma_above_one_brightens_midtones() {
        assert_eq!(gamma(Color::rgb(64, 0, 255), 2.0), Color::rgb(128, 0, 255));
    }

    #[test]
    fn brightness_multiplies_and_darkens() {
        assert_eq!(brightness(Color::rgb(17, 17, 17), 2.0), Color::rgb(34, 34, 34));
        assert_eq!(brightness(Color::WHITE, -2.0), Color::rgb(221, 221, 221));
        assert_eq!(brightness(Color::rgb(200, 100, 50), 0.0), Color::BLACK);
        assert_eq!(brightness(Color::rgb(200, 100, 50), 2.0), Color::rgb(255, 200, 100));
    }

    // =========================================================================
    // Applied to images
    // =========================================================================

    #[test]
    fn negative_twice_restores_canvas() {
        let mut image = canvas(Color::from_hex("#ffff00").unwrap());
        image.effects().negative().unwrap();
        assert_eq!(center(&image).to_string(), "#0000ff");
        image.effects().negative().unwrap();
        assert_eq!(center(&image).to_string(), "#ffff00");
    }

    #[test]
    fn effects_chain() {
        let mut image = canvas(Color::rgb(20, 90, 240));
        image.effects().grayscale().unwrap().negative().unwrap();
        assert_eq!(center(&image), Color::rgb(169, 169, 169));
    }

    #[test]
    fn gamma_rejects_non_positive() {
        let mut image = canvas(Color::WHITE);
        assert!(matches!(
            image.effects().gamma(0.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            image.effects().gamma(f64::NAN),
            Err(Error::InvalidArgument(_))
        ));
    }
}
