use std::{
    fmt::Display,
    ops::{Add, Div, Mul, Not, Rem, Sub},
    str::FromStr,
};

use bytemuck::{Pod, Zeroable};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ColorError {
    #[error("{channel} channel value {value} is outside [0, 255]")]
    ChannelOutOfRange { channel: &'static str, value: i64 },

    #[error("expected 3 or 4 color channels, got {0}")]
    ChannelCount(usize),

    #[error("'{0}' is not a valid hex color")]
    InvalidHex(String),

    #[error("{space} component {component} = {value} is outside [{min}, {max}]")]
    ComponentOutOfRange {
        space: &'static str,
        component: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },

    #[error("{space} value does not map to an RGB color")]
    OutOfGamut { space: &'static str },
}

/// An 8-bit per channel RGBA color.
///
/// Channel arithmetic saturates at 0 and 255. Division and modulo by a zero
/// channel yield 0 for that channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Deserialize)]
#[serde(try_from = "ColorValue")]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from wide integers, rejecting any channel outside
    /// `[0, 255]`.
    pub fn try_rgba(r: i64, g: i64, b: i64, a: i64) -> Result<Self, ColorError> {
        Ok(Self {
            r: channel("red", r)?,
            g: channel("green", g)?,
            b: channel("blue", b)?,
            a: channel("alpha", a)?,
        })
    }

    /// Decodes `0xRRGGBBAA`.
    pub const fn from_rgba_u32(v: u32) -> Self {
        let [r, g, b, a] = v.to_be_bytes();
        Self::rgba(r, g, b, a)
    }

    /// Decodes `0xAARRGGBB`.
    pub const fn from_argb_u32(v: u32) -> Self {
        let [a, r, g, b] = v.to_be_bytes();
        Self::rgba(r, g, b, a)
    }

    pub const fn to_rgba_u32(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    pub const fn to_argb_u32(self) -> u32 {
        u32::from_be_bytes([self.a, self.r, self.g, self.b])
    }

    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Channels scaled to `[0, 1]`.
    pub fn normalize(self) -> [f32; 4] {
        self.to_array().map(|c| c as f32 / 255.0)
    }

    pub fn to_hex(self) -> String {
        format!(
            "#{:02x}{:02x}{:02x}{:02x}",
            self.r, self.g, self.b, self.a
        )
    }

    /// The four-digit `#rgba` form, if every channel repeats its nibble.
    pub fn to_short_hex(self) -> Option<String> {
        let channels = self.to_array();
        if channels.iter().any(|c| c >> 4 != c & 0x0f) {
            return None;
        }

        let [r, g, b, a] = channels.map(|c| c & 0x0f);
        Some(format!("#{r:x}{g:x}{b:x}{a:x}"))
    }

    /// Hue in `[0, 360)`, saturation, value and alpha in `[0, 100]`.
    pub fn to_hsva(self) -> (f32, f32, f32, f32) {
        let [r, g, b, a] = self.normalize();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);

        let v = max * 100.0;
        let a = a * 100.0;
        if max == min {
            return (0.0, 0.0, v, a);
        }

        let s = 100.0 * (max - min) / max;
        (hue(r, g, b, max, min), s, v, a)
    }

    pub fn from_hsva(h: f32, s: f32, v: f32, a: f32) -> Result<Self, ColorError> {
        check("HSVA", "hue", h, 0.0, 360.0)?;
        check("HSVA", "saturation", s, 0.0, 100.0)?;
        check("HSVA", "value", v, 0.0, 100.0)?;
        check("HSVA", "alpha", a, 0.0, 100.0)?;

        let s = s / 100.0;
        let v = v / 100.0;
        let h = if h >= 360.0 { 0.0 } else { h / 60.0 };

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        from_unit("HSVA", r, g, b, a / 100.0)
    }

    /// Hue in `[0, 360)`, saturation, lightness and alpha in `[0, 100]`.
    pub fn to_hsla(self) -> (f32, f32, f32, f32) {
        let [r, g, b, a] = self.normalize();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = max - min;

        let l = 50.0 * (max + min);
        let a = a * 100.0;
        if max == min {
            return (0.0, 0.0, l, a);
        }

        let s = if l <= 50.0 {
            diff / (max + min) * 100.0
        } else {
            diff / (2.0 - max - min) * 100.0
        };

        (hue(r, g, b, max, min), s, l, a)
    }

    pub fn from_hsla(h: f32, s: f32, l: f32, a: f32) -> Result<Self, ColorError> {
        check("HSLA", "hue", h, 0.0, 360.0)?;
        check("HSLA", "saturation", s, 0.0, 100.0)?;
        check("HSLA", "lightness", l, 0.0, 100.0)?;
        check("HSLA", "alpha", a, 0.0, 100.0)?;

        let s = s / 100.0;
        let l = l / 100.0;
        let a = a / 100.0;

        if s == 0.0 {
            return from_unit("HSLA", l, l, l, a);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let h = h / 360.0;

        let r = hue_to_channel(p, q, h + 1.0 / 3.0);
        let g = hue_to_channel(p, q, h);
        let b = hue_to_channel(p, q, h - 1.0 / 3.0);

        from_unit("HSLA", r, g, b, a)
    }

    /// Cyan, magenta and yellow in `[0, 1]`. Alpha is not represented.
    pub fn to_cmy(self) -> (f32, f32, f32) {
        let [r, g, b, _] = self.normalize();
        (1.0 - r, 1.0 - g, 1.0 - b)
    }

    /// Builds an opaque color from CMY components.
    pub fn from_cmy(c: f32, m: f32, y: f32) -> Result<Self, ColorError> {
        check("CMY", "cyan", c, 0.0, 1.0)?;
        check("CMY", "magenta", m, 0.0, 1.0)?;
        check("CMY", "yellow", y, 0.0, 1.0)?;

        from_unit("CMY", 1.0 - c, 1.0 - m, 1.0 - y, 1.0)
    }

    /// The I1I2I3 (Ohta) color space. Alpha is not represented.
    pub fn to_i1i2i3(self) -> (f32, f32, f32) {
        let [r, g, b, _] = self.normalize();

        let i1 = (r + g + b) / 3.0;
        let i2 = (r - b) / 2.0;
        let i3 = (2.0 * g - r - b) / 4.0;

        (i1, i2, i3)
    }

    /// Builds an opaque color from I1I2I3 components. Component triples that
    /// fall outside the RGB cube are rejected.
    pub fn from_i1i2i3(i1: f32, i2: f32, i3: f32) -> Result<Self, ColorError> {
        check("I1I2I3", "i1", i1, 0.0, 1.0)?;
        check("I1I2I3", "i2", i2, -0.5, 0.5)?;
        check("I1I2I3", "i3", i3, -0.5, 0.5)?;

        let b = i1 - i2 - 2.0 * i3 / 3.0;
        let r = 2.0 * i2 + b;
        let g = 3.0 * i1 - r - b;

        from_unit("I1I2I3", r, g, b, 1.0)
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8, ColorError> {
    u8::try_from(value).map_err(|_| ColorError::ChannelOutOfRange {
        channel: name,
        value,
    })
}

fn check(
    space: &'static str,
    component: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ColorError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ColorError::ComponentOutOfRange {
            space,
            component,
            value,
            min,
            max,
        })
    }
}

fn hue(r: f32, g: f32, b: f32, max: f32, min: f32) -> f32 {
    let diff = max - min;
    let h = if max == r {
        (60.0 * (g - b) / diff).rem_euclid(360.0)
    } else if max == g {
        60.0 * (b - r) / diff + 120.0
    } else {
        60.0 * (r - g) / diff + 240.0
    };

    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

fn hue_to_channel(p: f32, q: f32, h: f32) -> f32 {
    let h = if h < 0.0 {
        h + 1.0
    } else if h > 1.0 {
        h - 1.0
    } else {
        h
    };

    if h < 1.0 / 6.0 {
        p + (q - p) * 6.0 * h
    } else if h < 0.5 {
        q
    } else if h < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - h)
    } else {
        p
    }
}

fn from_unit(space: &'static str, r: f32, g: f32, b: f32, a: f32) -> Result<Color, ColorError> {
    let scale = |c: f32| -> Result<u8, ColorError> {
        let c = (c * 255.0).round();
        if (0.0..=255.0).contains(&c) {
            Ok(c as u8)
        } else {
            Err(ColorError::OutOfGamut { space })
        }
    };

    Ok(Color::rgba(scale(r)?, scale(g)?, scale(b)?, scale(a)?))
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Parses `RGB`, `RGBA`, `RRGGBB` and `RRGGBBAA`, optionally prefixed with
/// `#` or `0x`. Forms without alpha are opaque.
impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ColorError::InvalidHex(s.to_string());

        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix('#'))
            .unwrap_or(s);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let expanded: String = match digits.len() {
            3 | 4 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 | 8 => digits.to_string(),
            _ => return Err(invalid()),
        };

        let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| invalid());
        let a = if expanded.len() == 8 { byte(6)? } else { 255 };

        Ok(Color::rgba(byte(0)?, byte(2)?, byte(4)?, a))
    }
}

impl TryFrom<&[i64]> for Color {
    type Error = ColorError;

    /// Three channels produce an opaque color.
    fn try_from(channels: &[i64]) -> Result<Self, Self::Error> {
        match *channels {
            [r, g, b] => Self::try_rgba(r, g, b, 255),
            [r, g, b, a] => Self::try_rgba(r, g, b, a),
            _ => Err(ColorError::ChannelCount(channels.len())),
        }
    }
}

/// The forms a color may take in configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Argb(u32),
    Channels(Vec<i64>),
}

impl TryFrom<ColorValue> for Color {
    type Error = ColorError;

    fn try_from(value: ColorValue) -> Result<Self, Self::Error> {
        match value {
            ColorValue::Hex(s) => s.parse(),
            ColorValue::Argb(v) => Ok(Color::from_argb_u32(v)),
            ColorValue::Channels(channels) => Color::try_from(channels.as_slice()),
        }
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, c: Self) -> Self::Output {
        Color::rgba(
            self.r.saturating_add(c.r),
            self.g.saturating_add(c.g),
            self.b.saturating_add(c.b),
            self.a.saturating_add(c.a),
        )
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, c: Self) -> Self::Output {
        Color::rgba(
            self.r.saturating_sub(c.r),
            self.g.saturating_sub(c.g),
            self.b.saturating_sub(c.b),
            self.a.saturating_sub(c.a),
        )
    }
}

impl Mul for Color {
    type Output = Color;

    fn mul(self, c: Self) -> Self::Output {
        Color::rgba(
            self.r.saturating_mul(c.r),
            self.g.saturating_mul(c.g),
            self.b.saturating_mul(c.b),
            self.a.saturating_mul(c.a),
        )
    }
}

impl Div for Color {
    type Output = Color;

    fn div(self, c: Self) -> Self::Output {
        Color::rgba(
            self.r.checked_div(c.r).unwrap_or(0),
            self.g.checked_div(c.g).unwrap_or(0),
            self.b.checked_div(c.b).unwrap_or(0),
            self.a.checked_div(c.a).unwrap_or(0),
        )
    }
}

impl Rem for Color {
    type Output = Color;

    fn rem(self, c: Self) -> Self::Output {
        Color::rgba(
            self.r.checked_rem(c.r).unwrap_or(0),
            self.g.checked_rem(c.g).unwrap_or(0),
            self.b.checked_rem(c.b).unwrap_or(0),
            self.a.checked_rem(c.a).unwrap_or(0),
        )
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Self::Output {
        Color::rgba(255 - self.r, 255 - self.g, 255 - self.b, 255 - self.a)
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> Self {
        let [r, g, b, a] = color.normalize();
        wgpu::Color {
            r: r as f64,
            g: g as f64,
            b: b as f64,
            a: a as f64,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn sample_colors() -> Vec<Color> {
        let steps = [0u8, 1, 17, 64, 127, 128, 200, 254, 255];
        let mut colors = Vec::new();
        for r in steps {
            for g in steps {
                for b in steps {
                    colors.push(Color::rgba(r, g, b, 255 - r / 2));
                }
            }
        }
        colors
    }

    fn assert_close(expected: Color, actual: Color) {
        let close = expected
            .to_array()
            .iter()
            .zip(actual.to_array())
            .all(|(e, a)| e.abs_diff(a) <= 1);
        assert!(close, "expected {expected}, got {actual}");
    }

    #[test]
    fn out_of_range_channels_are_rejected() {
        assert_eq!(
            Err(ColorError::ChannelOutOfRange {
                channel: "green",
                value: 256
            }),
            Color::try_rgba(0, 256, 0, 0)
        );
        assert!(Color::try_rgba(-1, 0, 0, 0).is_err());
        assert_eq!(Ok(Color::rgba(1, 2, 3, 4)), Color::try_rgba(1, 2, 3, 4));
    }

    #[test]
    fn arithmetic_saturates() {
        let a = Color::rgba(200, 10, 128, 255);
        let b = Color::rgba(100, 20, 2, 1);

        assert_eq!(Color::rgba(255, 30, 130, 255), a + b);
        assert_eq!(Color::rgba(100, 0, 126, 254), a - b);
        assert_eq!(Color::rgba(255, 200, 255, 255), a * b);
    }

    #[test]
    fn division_and_modulo_by_zero_channel_yield_zero() {
        let a = Color::rgba(200, 10, 128, 255);
        let b = Color::rgba(3, 0, 7, 2);

        assert_eq!(Color::rgba(66, 0, 18, 127), a / b);
        assert_eq!(Color::rgba(2, 0, 2, 1), a % b);
    }

    #[test]
    fn invert_flips_every_channel() {
        assert_eq!(Color::rgba(255, 0, 155, 0), !Color::rgba(0, 255, 100, 255));
    }

    #[test]
    fn packed_integers_round_trip() {
        let c = Color::rgba(0x12, 0x34, 0x56, 0x78);
        assert_eq!(0x12345678, c.to_rgba_u32());
        assert_eq!(0x78123456, c.to_argb_u32());
        assert_eq!(c, Color::from_rgba_u32(c.to_rgba_u32()));
        assert_eq!(c, Color::from_argb_u32(c.to_argb_u32()));
    }

    #[test]
    fn parses_every_hex_form() {
        let cases = [
            ("fff", Color::WHITE),
            ("#000", Color::BLACK),
            ("0x000f", Color::BLACK),
            ("#0000", Color::TRANSPARENT),
            ("ff0000", Color::RED),
            ("#00ff00", Color::GREEN),
            ("0x0000ffff", Color::BLUE),
            ("#ffffff00", Color::rgba(255, 255, 255, 0)),
            ("#1a2B3c", Color::rgb(0x1a, 0x2b, 0x3c)),
        ];
        for (s, expected) in cases {
            assert_eq!(Ok(expected), s.parse::<Color>(), "{s}");
        }
    }

    #[test]
    fn rejects_malformed_hex() {
        for s in ["", "#12", "12345", "#gg0000", "+ff", "0x#fff", "#1234567"] {
            assert!(s.parse::<Color>().is_err(), "{s}");
        }
    }

    #[test]
    fn hex_strings_round_trip() {
        let c = Color::rgba(0x1a, 0x2b, 0x3c, 0x4d);
        assert_eq!("#1a2b3c4d", c.to_hex());
        assert_eq!(Ok(c), c.to_hex().parse());

        let short = Color::rgba(0x11, 0xaa, 0xff, 0x00);
        assert_eq!(Some("#1af0".to_string()), short.to_short_hex());
        assert_eq!(Ok(short), "#1af0".parse());
        assert_eq!(None, c.to_short_hex());
    }

    #[test]
    fn converts_channel_slices() {
        assert_eq!(Ok(Color::rgb(1, 2, 3)), Color::try_from(&[1i64, 2, 3][..]));
        assert_eq!(
            Ok(Color::rgba(1, 2, 3, 4)),
            Color::try_from(&[1i64, 2, 3, 4][..])
        );
        assert_eq!(
            Err(ColorError::ChannelCount(2)),
            Color::try_from(&[1i64, 2][..])
        );
        assert!(Color::try_from(&[1i64, 2, 300][..]).is_err());
    }

    #[test]
    fn deserializes_from_hex_argb_and_channels() {
        let hex: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        let argb: Color = serde_json::from_str("4278255360").unwrap(); // 0xff00ff00
        let channels: Color = serde_json::from_str("[0, 255, 0, 255]").unwrap();

        assert_eq!(Color::GREEN, hex);
        assert_eq!(Color::GREEN, argb);
        assert_eq!(Color::GREEN, channels);
        assert!(serde_json::from_str::<Color>("[0, 256, 0]").is_err());
    }

    #[test]
    fn hsva_of_primaries() {
        assert_eq!((0.0, 100.0, 100.0, 100.0), Color::RED.to_hsva());
        assert_eq!((120.0, 100.0, 100.0, 100.0), Color::GREEN.to_hsva());
        assert_eq!((240.0, 100.0, 100.0, 100.0), Color::BLUE.to_hsva());
        assert_eq!((0.0, 0.0, 0.0, 100.0), Color::BLACK.to_hsva());
    }

    #[test]
    fn hsva_round_trips() {
        for c in sample_colors() {
            let (h, s, v, a) = c.to_hsva();
            assert_close(c, Color::from_hsva(h, s, v, a).unwrap());
        }
    }

    #[test]
    fn hsla_round_trips() {
        for c in sample_colors() {
            let (h, s, l, a) = c.to_hsla();
            assert_close(c, Color::from_hsla(h, s, l, a).unwrap());
        }
    }

    #[test]
    fn cmy_round_trips() {
        for c in sample_colors() {
            let (cy, m, y) = c.to_cmy();
            let back = Color::from_cmy(cy, m, y).unwrap();
            assert_close(Color { a: 255, ..c }, back);
        }
    }

    #[test]
    fn i1i2i3_round_trips() {
        for c in sample_colors() {
            let (i1, i2, i3) = c.to_i1i2i3();
            let back = Color::from_i1i2i3(i1, i2, i3).unwrap();
            assert_close(Color { a: 255, ..c }, back);
        }
    }

    #[test]
    fn hue_of_360_wraps_to_red() {
        assert_eq!(Ok(Color::RED), Color::from_hsva(360.0, 100.0, 100.0, 100.0));
    }

    #[test]
    fn invalid_color_space_components_are_rejected() {
        assert!(Color::from_hsva(361.0, 0.0, 0.0, 0.0).is_err());
        assert!(Color::from_hsla(0.0, 101.0, 0.0, 0.0).is_err());
        assert!(Color::from_cmy(-0.1, 0.0, 0.0).is_err());
        assert!(Color::from_i1i2i3(0.0, 0.6, 0.0).is_err());
        // Inside the component ranges but outside the RGB cube.
        assert_eq!(
            Err(ColorError::OutOfGamut { space: "I1I2I3" }),
            Color::from_i1i2i3(0.0, 0.5, 0.0)
        );
    }
}
