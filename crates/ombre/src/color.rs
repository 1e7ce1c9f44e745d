use crate::{Error, Result};
use serde::Serialize;
use std::str::FromStr;

/// An 8-bit RGBA color. The all-zero value doubles as the "unset" sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Whether this is the zero value, i.e. no color has been established yet.
    pub fn is_unset(&self) -> bool {
        *self == Self::default()
    }

    /// `#rrggbbaa`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }

    /// Converts the zero sentinel to `None`.
    pub fn established(self) -> Option<Self> {
        if self.is_unset() { None } else { Some(self) }
    }
}

/// Maps a color token (name, hex, functional notation) to a concrete color.
///
/// `context` is the previously established color, if any. Resolvers use it for partial forms
/// that only make sense relative to another color (`currentcolor`, alpha-only modifiers).
pub trait ColorResolver {
    fn resolve(&self, token: &str, context: Option<Rgba>) -> Result<Rgba>;
}

impl<F> ColorResolver for F
where
    F: Fn(&str, Option<Rgba>) -> Result<Rgba>,
{
    fn resolve(&self, token: &str, context: Option<Rgba>) -> Result<Rgba> {
        self(token, context)
    }
}

/// The default resolver: CSS color syntax via `svgtypes`, plus the context-relative
/// `lighten-N`, `darken-N`, `clearer-N` and `opaquer-N` modifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssColorResolver;

impl ColorResolver for CssColorResolver {
    fn resolve(&self, token: &str, context: Option<Rgba>) -> Result<Rgba> {
        let token = token.trim();
        let lower = token.to_ascii_lowercase();
        let base = context.unwrap_or(Rgba::BLACK);

        match lower.as_str() {
            "transparent" => return Ok(Rgba::TRANSPARENT),
            "currentcolor" => return Ok(base),
            _ => {}
        }

        if let Some((name, amount)) = lower.split_once('-') {
            let modifier = match name {
                "lighten" => Some(Modifier::Lighten),
                "darken" => Some(Modifier::Darken),
                "clearer" => Some(Modifier::Clearer),
                "opaquer" => Some(Modifier::Opaquer),
                _ => None,
            };
            if let Some(modifier) = modifier {
                let pct = amount
                    .trim_end_matches('%')
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| Error::InvalidColor {
                        token: token.to_string(),
                    })?;
                return Ok(modifier.apply(base, pct));
            }
        }

        let color = svgtypes::Color::from_str(&lower).map_err(|_| Error::InvalidColor {
            token: token.to_string(),
        })?;
        Ok(Rgba::new(color.red, color.green, color.blue, color.alpha))
    }
}

#[derive(Debug, Clone, Copy)]
enum Modifier {
    Lighten,
    Darken,
    Clearer,
    Opaquer,
}

impl Modifier {
    fn apply(self, base: Rgba, pct: f64) -> Rgba {
        match self {
            Modifier::Lighten => with_lightness_delta(base, pct),
            Modifier::Darken => with_lightness_delta(base, -pct),
            Modifier::Clearer => {
                let a = f64::from(base.a) * (100.0 - pct) / 100.0;
                Rgba { a: to_channel(a), ..base }
            }
            Modifier::Opaquer => {
                let a = f64::from(base.a) + (255.0 - f64::from(base.a)) * pct / 100.0;
                Rgba { a: to_channel(a), ..base }
            }
        }
    }
}

fn to_channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[derive(Debug, Clone, Copy)]
struct Hsl {
    h_deg: f64,
    s_pct: f64,
    l_pct: f64,
}

fn with_lightness_delta(base: Rgba, l_delta: f64) -> Rgba {
    let mut hsl = rgb_to_hsl(base);
    hsl.l_pct = (hsl.l_pct + l_delta).clamp(0.0, 100.0);
    let (r, g, b) = hsl_to_rgb01(hsl);
    Rgba::new(
        to_channel(r * 255.0),
        to_channel(g * 255.0),
        to_channel(b * 255.0),
        base.a,
    )
}

fn rgb_to_hsl(c: Rgba) -> Hsl {
    let r = f64::from(c.r) / 255.0;
    let g = f64::from(c.g) / 255.0;
    let b = f64::from(c.b) / 255.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl {
            h_deg: 0.0,
            s_pct: 0.0,
            l_pct: l * 100.0,
        };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let mut h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h /= 6.0;

    Hsl {
        h_deg: h * 360.0,
        s_pct: s * 100.0,
        l_pct: l * 100.0,
    }
}

fn hsl_to_rgb01(hsl: Hsl) -> (f64, f64, f64) {
    let h = (hsl.h_deg / 360.0) % 1.0;
    let s = (hsl.s_pct / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l_pct / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return (l, l, l);
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    (
        hue_to_rgb(p, q, h + 1.0 / 3.0),
        hue_to_rgb(p, q, h),
        hue_to_rgb(p, q, h - 1.0 / 3.0),
    )
}
