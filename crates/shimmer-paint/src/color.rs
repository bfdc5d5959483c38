use std::str::FromStr;

use palette::{FromColor, LinSrgba, Srgb, Srgba};

use crate::error::{PaintError, Result};
use crate::scene::ColorLinPremul;

impl ColorLinPremul {
    /// sRGB bytes, e.g. `Color::rgba(0xe0, 0xe0, 0xe0, 0xff)`.
    #[inline]
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_srgba_u8([r, g, b, a])
    }

    #[inline]
    pub fn from_srgba_u8([r, g, b, a]: [u8; 4]) -> Self {
        Self::from_srgba(r, g, b, f32::from(a) / 255.0)
    }

    /// sRGB channels with straight alpha, converted to premultiplied linear.
    pub fn from_srgba(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        let encoded = Srgba::<u8>::new(r, g, b, 255).into_format::<f32, f32>();
        let linear = LinSrgba::<f32>::from_color(encoded);
        let alpha = alpha.clamp(0.0, 1.0);
        Self {
            r: linear.red * alpha,
            g: linear.green * alpha,
            b: linear.blue * alpha,
            a: alpha,
        }
    }

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let trimmed = hex.trim();
        let digits = trimmed.trim_start_matches('#');
        let invalid = || PaintError::InvalidColor(trimmed.to_string());
        if !digits.is_ascii() {
            return Err(invalid());
        }

        let (rgb, alpha) = match digits.len() {
            3 | 6 => (digits, 255u8),
            8 => {
                let a = u8::from_str_radix(&digits[6..], 16).map_err(|_| invalid())?;
                (&digits[..6], a)
            }
            _ => return Err(invalid()),
        };
        let srgb = Srgb::<u8>::from_str(rgb).map_err(|_| invalid())?;
        Ok(Self::from_srgba_u8([srgb.red, srgb.green, srgb.blue, alpha]))
    }

    /// Straight-alpha sRGB bytes.
    pub fn to_srgba_u8(&self) -> [u8; 4] {
        let straight = if self.a > 1e-4 {
            LinSrgba::new(self.r / self.a, self.g / self.a, self.b / self.a, self.a)
        } else {
            LinSrgba::new(0.0, 0.0, 0.0, 0.0)
        };
        let encoded: Srgba<u8> = Srgba::<f32>::from_color(straight).into_format();
        [encoded.red, encoded.green, encoded.blue, encoded.alpha]
    }

    /// `#rrggbbaa` form of [`Self::to_srgba_u8`].
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_srgba_u8();
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}
