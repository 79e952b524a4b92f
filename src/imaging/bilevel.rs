//! One-bit output formats: WBMP (type 0) and XBM.
//!
//! The `image` crate has no encoder for either, and both are trivial
//! bit-packing formats. A pixel is black when it is mostly opaque and its
//! Rec.601 luma is below 128; everything else (including transparency) is white.

use crate::color::Color;
use image::DynamicImage;

const LUMA_THRESHOLD: u8 = 128;
const XBM_VALUES_PER_LINE: usize = 12;

/// A black/white raster in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Bilevel {
    width: u32,
    height: u32,
    black: Vec<bool>,
}

impl Bilevel {
    pub(super) fn from_image(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba8();
        let black = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                a >= 128 && Color::rgb(r, g, b).luma() < LUMA_THRESHOLD
            })
            .collect();
        Self {
            width: rgba.width(),
            height: rgba.height(),
            black,
        }
    }

    /// Pack each row into bytes, padding the last byte of a row with zeros.
    fn packed_rows(&self, bit_set: impl Fn(bool) -> bool, msb_first: bool) -> Vec<u8> {
        let row_bytes = self.width.div_ceil(8) as usize;
        let mut out = vec![0u8; row_bytes * self.height as usize];

        for (i, &black) in self.black.iter().enumerate() {
            if !bit_set(black) {
                continue;
            }
            let (x, y) = (i % self.width as usize, i / self.width as usize);
            let bit = if msb_first { 7 - (x % 8) } else { x % 8 };
            out[y * row_bytes + x / 8] |= 1 << bit;
        }
        out
    }

    /// WBMP type 0: two zero header bytes, multi-byte width and height, then
    /// rows with white as 1, most significant bit first.
    pub(super) fn encode_wbmp(&self) -> Vec<u8> {
        let mut out = vec![0u8, 0u8];
        push_multibyte(&mut out, self.width);
        push_multibyte(&mut out, self.height);
        out.extend(self.packed_rows(|black| !black, true));
        out
    }

    /// XBM C source with black as 1, least significant bit first.
    pub(super) fn encode_xbm(&self, name: &str) -> String {
        let values: Vec<String> = self
            .packed_rows(|black| black, false)
            .iter()
            .map(|b| format!("0x{b:02x}"))
            .collect();
        let body = values
            .chunks(XBM_VALUES_PER_LINE)
            .map(|line| format!("   {}", line.join(", ")))
            .collect::<Vec<_>>()
            .join(",\n");

        format!(
            "#define {name}_width {}\n#define {name}_height {}\nstatic unsigned char {name}_bits[] = {{\n{body}}};\n",
            self.width, self.height
        )
    }
}

/// WBMP multi-byte integer: 7 bits per byte, high bit marks continuation.
fn push_multibyte(out: &mut Vec<u8>, mut value: u32) {
    let mut groups = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        groups.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.extend(groups.iter().rev());
}
