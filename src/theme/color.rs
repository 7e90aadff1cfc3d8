//! CSS colors and the lightness/mixing helpers the style generators use.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color `{0}`")]
pub struct ColorParseError(pub String);

/// An sRGB color with straight alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
    a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0.0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self { r, g, b, a: 1.0 } }
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self { Self { r, g, b, a } }

    pub fn red(&self) -> u8 { self.r }
    pub fn green(&self) -> u8 { self.g }
    pub fn blue(&self) -> u8 { self.b }
    pub fn alpha(&self) -> f64 { self.a }

    /// Same color with alpha set to `alpha`. A non-finite alpha leaves the color unchanged.
    pub fn fade(&self, alpha: f64) -> Self {
        if !alpha.is_finite() {
            return *self;
        }
        Self { a: alpha.clamp(0.0, 1.0), ..*self }
    }

    /// Sass-style mix; `weight` is the share of `self`.
    pub fn mix(&self, other: &Color, weight: f64) -> Self {
        let weight = weight.clamp(0.0, 1.0);
        let w = 2.0 * weight - 1.0;
        let a = self.a - other.a;
        let w1 = if w * a == -1.0 { w } else { (w + a) / (1.0 + w * a) };
        let w1 = (w1 + 1.0) / 2.0;
        let w2 = 1.0 - w1;
        let channel = |x: u8, y: u8| (x as f64 * w1 + y as f64 * w2).round().clamp(0.0, 255.0) as u8;
        Self {
            r: channel(self.r, other.r),
            g: channel(self.g, other.g),
            b: channel(self.b, other.b),
            a: self.a * weight + other.a * (1.0 - weight),
        }
    }

    /// HSL lightness in `[0, 1]`.
    pub fn lightness(&self) -> f64 { self.to_hsl().2 }

    pub fn lighten(&self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l + amount).clamp(0.0, 1.0), self.a)
    }

    pub fn darken(&self, amount: f64) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l - amount).clamp(0.0, 1.0), self.a)
    }

    fn to_hsl(&self) -> (f64, f64, f64) {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f64, s: f64, l: f64, a: f64) -> Self {
        let to_u8 = |v: f64| (v * 255.0).round().clamp(0.0, 255.0) as u8;
        if s == 0.0 {
            let v = to_u8(l);
            return Self { r: v, g: v, b: v, a };
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        let hue = |mut t: f64| {
            if t < 0.0 { t += 1.0; }
            if t > 1.0 { t -= 1.0; }
            if t < 1.0 / 6.0 { p + (q - p) * 6.0 * t }
            else if t < 0.5 { q }
            else if t < 2.0 / 3.0 { p + (q - p) * (2.0 / 3.0 - t) * 6.0 }
            else { p }
        };
        Self {
            r: to_u8(hue(h + 1.0 / 3.0)),
            g: to_u8(hue(h)),
            b: to_u8(hue(h - 1.0 / 3.0)),
            a,
        }
    }

    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = (self.a * 1000.0).round() / 1000.0;
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, a)
        }
    }
}

/// Darken light colors and lighten dark ones (the reverse when `inverse`).
///
/// `weight` is clamped to `[0, 1]`.
pub fn modify_color_based_on_lightness(color: &Color, weight: f64, inverse: bool) -> Color {
    let weight = weight.clamp(0.0, 1.0);
    let is_light = color.lightness() >= 0.5;
    if is_light != inverse { color.darken(weight) } else { color.lighten(weight) }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        let err = || ColorParseError(s.to_string());
        match raw.as_str() {
            "white" => return Ok(Color::WHITE),
            "black" => return Ok(Color::BLACK),
            "transparent" => return Ok(Color::TRANSPARENT),
            _ => {}
        }
        if let Some(hex) = raw.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(err);
        }
        let args = raw
            .strip_prefix("rgba(")
            .or_else(|| raw.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let parts: Vec<&str> = args.split(',').map(str::trim).collect();
        if parts.len() != 3 && parts.len() != 4 {
            return Err(err());
        }
        let number = |p: &str| p.parse::<f64>().ok().filter(|v| v.is_finite());
        let channel = |p: &str| number(p).map(|v| v.round().clamp(0.0, 255.0) as u8);
        let r = channel(parts[0]).ok_or_else(err)?;
        let g = channel(parts[1]).ok_or_else(err)?;
        let b = channel(parts[2]).ok_or_else(err)?;
        let a = match parts.get(3) {
            Some(p) => number(p).ok_or_else(err)?.clamp(0.0, 1.0),
            None => 1.0,
        };
        Ok(Color { r, g, b, a })
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
        4 => Some(Color::rgba(nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)? as f64 / 255.0)),
        6 => Some(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Color::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)? as f64 / 255.0)),
        _ => None,
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;
    fn try_from(s: String) -> Result<Self, Self::Error> { s.parse() }
}

impl From<Color> for String {
    fn from(c: Color) -> Self { c.to_css() }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_css()) }
}
