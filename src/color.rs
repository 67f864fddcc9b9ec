use palette::{FromColor, IntoColor, Lab, Srgb};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Core color type used throughout the pipeline.
/// Wraps sRGB u8 components, so every value is a valid 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a hex color string like `#ff8800`, `#FF8800` or `ff8800`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        hex_to_rgb(hex)
    }

    /// Serialize to lowercase hex `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Convert to CIELAB (for K-means clustering and deduplication).
    pub fn to_lab(self) -> Lab {
        let srgb_f32: Srgb<f32> = Srgb::new(self.r, self.g, self.b).into_format();
        srgb_f32.into_color()
    }

    /// Create from CIELAB (K-means centroids come back in Lab).
    pub fn from_lab(lab: Lab) -> Self {
        let srgb_f32: Srgb<f32> = Srgb::from_color(lab);
        Self::from_srgb_f32_clamped(srgb_f32)
    }

    /// Clamp an Srgb<f32> to [0, 1] and convert to Color.
    fn from_srgb_f32_clamped(srgb: Srgb<f32>) -> Self {
        let r = (srgb.red.clamp(0.0, 1.0) * 255.0).round() as u8;
        let g = (srgb.green.clamp(0.0, 1.0) * 255.0).round() as u8;
        let b = (srgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { r, g, b }
    }

    /// WCAG 2.0 relative luminance.
    ///
    /// Linearizes each sRGB channel, then computes the weighted sum.
    pub fn relative_luminance(self) -> f32 {
        fn linearize(c: u8) -> f32 {
            let c = c as f32 / 255.0;
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let r = linearize(self.r);
        let g = linearize(self.g);
        let b = linearize(self.b);
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

impl From<Color> for [u8; 3] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Convert a `#rrggbb` (or `rrggbb`) string to a [`Color`]. Case-insensitive.
pub fn hex_to_rgb(hex: &str) -> Result<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::invalid_color(format!(
            "expected 6 hex digits, got {hex:?}"
        )));
    }
    // All six bytes are ASCII hex digits, so the slices and parses cannot fail.
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).unwrap_or_default();
    Ok(Color::new(channel(0), channel(2), channel(4)))
}

/// Convert raw RGB components to a lowercase `#rrggbb` string.
///
/// Fails unless there are exactly three components, each in `0..=255`.
pub fn rgb_to_hex(components: &[i64]) -> Result<String> {
    checked_rgb(components).map(Color::to_hex)
}

fn checked_rgb(components: &[i64]) -> Result<Color> {
    let [r, g, b] = components else {
        return Err(Error::invalid_color(format!(
            "expected 3 RGB components, got {}",
            components.len()
        )));
    };
    let channel = |value: i64| {
        u8::try_from(value).map_err(|_| {
            Error::invalid_color(format!("RGB component {value} is outside 0..=255"))
        })
    };
    Ok(Color::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

/// A color as it arrives at the system boundary, before validation.
///
/// Each shape has its own normalization rule in [`normalize`]; nothing is
/// coerced between shapes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawColor {
    /// `#rrggbb` or `rrggbb`
    Hex(String),
    /// A fixed RGB triple
    Rgb([i64; 3]),
    /// An RGB component sequence of unchecked length
    Components(Vec<i64>),
    /// A single number, which is not a color
    Scalar(i64),
}

impl RawColor {
    /// Interpret a command-line token.
    ///
    /// `r,g,b` (optionally wrapped in brackets or parentheses) becomes
    /// [`RawColor::Components`], a lone integer becomes [`RawColor::Scalar`],
    /// and everything else is treated as hex.
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim();
        // "123456" is a hex color before it is a number
        if hex_to_rgb(trimmed).is_ok() {
            return Self::Hex(trimmed.to_string());
        }
        if let Some(value) = parse_integer(trimmed) {
            return Self::Scalar(value);
        }
        if trimmed.contains(',') {
            let inner = trimmed
                .trim_start_matches(['[', '('])
                .trim_end_matches([']', ')']);
            let parsed: std::result::Result<Vec<i64>, _> =
                inner.split(',').map(|part| part.trim().parse::<i64>()).collect();
            if let Ok(components) = parsed {
                return Self::Components(components);
            }
        }
        Self::Hex(trimmed.to_string())
    }
}

/// A signed run of ASCII digits, saturated to the `i64` range.
fn parse_integer(token: &str) -> Option<i64> {
    let digits = token.strip_prefix(['+', '-']).unwrap_or(token);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let saturated = if token.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    };
    Some(token.parse().unwrap_or(saturated))
}

impl From<Color> for RawColor {
    fn from(color: Color) -> Self {
        let [r, g, b] = color.to_array();
        Self::Rgb([r.into(), g.into(), b.into()])
    }
}

impl From<[u8; 3]> for RawColor {
    fn from(rgb: [u8; 3]) -> Self {
        Color::from(rgb).into()
    }
}

impl From<(u8, u8, u8)> for RawColor {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b).into()
    }
}

impl From<&str> for RawColor {
    fn from(hex: &str) -> Self {
        Self::Hex(hex.to_string())
    }
}

impl From<String> for RawColor {
    fn from(hex: String) -> Self {
        Self::Hex(hex)
    }
}

/// Turn a boundary color into a canonical [`Color`].
pub fn normalize(raw: &RawColor) -> Result<Color> {
    match raw {
        RawColor::Hex(hex) => hex_to_rgb(hex),
        RawColor::Rgb(rgb) => checked_rgb(rgb),
        RawColor::Components(components) => checked_rgb(components),
        RawColor::Scalar(value) => Err(Error::UnsupportedColorType {
            found: format!("scalar {value}"),
        }),
    }
}
