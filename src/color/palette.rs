//! Palettes: a categorical cycle and continuous gradients

use serde::{Deserialize, Serialize};

/// An sRGB color, serialized as `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Color for chains with no group, no score, or no palette slot
pub const FALLBACK_GRAY: Rgb = Rgb::new(0x9c, 0xa3, 0xaf);

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Linear interpolation between two colors, `t` clamped to [0, 1]
    pub fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Rgb::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hex()
    }
}

const TABLEAU10: [Rgb; 10] = [
    Rgb::new(0x4e, 0x79, 0xa7),
    Rgb::new(0xf2, 0x8e, 0x2b),
    Rgb::new(0xe1, 0x57, 0x59),
    Rgb::new(0x76, 0xb7, 0xb2),
    Rgb::new(0x59, 0xa1, 0x4f),
    Rgb::new(0xed, 0xc9, 0x48),
    Rgb::new(0xb0, 0x7a, 0xa1),
    Rgb::new(0xff, 0x9d, 0xa7),
    Rgb::new(0x9c, 0x75, 0x5f),
    Rgb::new(0xba, 0xb0, 0xac),
];

const SET2: [Rgb; 8] = [
    Rgb::new(0x66, 0xc2, 0xa5),
    Rgb::new(0xfc, 0x8d, 0x62),
    Rgb::new(0x8d, 0xa0, 0xcb),
    Rgb::new(0xe7, 0x8a, 0xc3),
    Rgb::new(0xa6, 0xd8, 0x54),
    Rgb::new(0xff, 0xd9, 0x2f),
    Rgb::new(0xe5, 0xc4, 0x94),
    Rgb::new(0xb3, 0xb3, 0xb3),
];

const DARK2: [Rgb; 8] = [
    Rgb::new(0x1b, 0x9e, 0x77),
    Rgb::new(0xd9, 0x5f, 0x02),
    Rgb::new(0x75, 0x70, 0xb3),
    Rgb::new(0xe7, 0x29, 0x8a),
    Rgb::new(0x66, 0xa6, 0x1e),
    Rgb::new(0xe6, 0xab, 0x02),
    Rgb::new(0xa6, 0x76, 0x1d),
    Rgb::new(0x66, 0x66, 0x66),
];

/// A fixed cycle of distinct colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalPalette {
    #[default]
    Tableau10,
    Set2,
    Dark2,
}

impl CategoricalPalette {
    pub fn colors(&self) -> &'static [Rgb] {
        match self {
            Self::Tableau10 => &TABLEAU10,
            Self::Set2 => &SET2,
            Self::Dark2 => &DARK2,
        }
    }

    /// Color at a position, wrapping around the cycle
    pub fn color_at(&self, index: usize) -> Rgb {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

const VIRIDIS: [Rgb; 5] = [
    Rgb::new(0x44, 0x01, 0x54),
    Rgb::new(0x3b, 0x52, 0x8b),
    Rgb::new(0x21, 0x90, 0x8c),
    Rgb::new(0x5d, 0xc8, 0x63),
    Rgb::new(0xfd, 0xe7, 0x25),
];

const PLASMA: [Rgb; 5] = [
    Rgb::new(0x0d, 0x08, 0x87),
    Rgb::new(0x7e, 0x03, 0xa8),
    Rgb::new(0xcc, 0x47, 0x78),
    Rgb::new(0xf8, 0x95, 0x40),
    Rgb::new(0xf0, 0xf9, 0x21),
];

const BLUES: [Rgb; 3] = [
    Rgb::new(0xde, 0xeb, 0xf7),
    Rgb::new(0x6b, 0xae, 0xd6),
    Rgb::new(0x08, 0x30, 0x6b),
];

const RED_YELLOW_GREEN: [Rgb; 3] = [
    Rgb::new(0xd7, 0x30, 0x27),
    Rgb::new(0xff, 0xff, 0xbf),
    Rgb::new(0x1a, 0x98, 0x50),
];

/// A gradient sampled over [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContinuousPalette {
    #[default]
    Viridis,
    Plasma,
    Blues,
    RedYellowGreen,
}

impl ContinuousPalette {
    fn stops(&self) -> &'static [Rgb] {
        match self {
            Self::Viridis => &VIRIDIS,
            Self::Plasma => &PLASMA,
            Self::Blues => &BLUES,
            Self::RedYellowGreen => &RED_YELLOW_GREEN,
        }
    }

    /// Sample the gradient at `t`, clamped to [0, 1]
    pub fn sample(&self, t: f64) -> Rgb {
        let stops = self.stops();
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
        let segments = (stops.len() - 1) as f64;
        let scaled = t * segments;
        let i = (scaled.floor() as usize).min(stops.len() - 2);
        stops[i].lerp(stops[i + 1], scaled - i as f64)
    }
}
