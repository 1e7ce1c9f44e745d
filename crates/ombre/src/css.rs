//! CSS gradient descriptors: `linear-gradient(...)`, `radial-gradient(...)` and their
//! `repeating-` forms.
//!
//! Only the subset below is understood; everything else degrades to a warning.
//!
//! ```text
//! descriptor    := ["repeating-"] kind "-gradient(" arglist ")"
//! arglist       := segment {", " segment}
//! segment       := angle | "to " side {" " side} | "circle" | "ellipse"
//!                | "at " side {" " side} | color [" " offset]
//! ```

use crate::color::{ColorResolver, Rgba};
use crate::error::{Warning, report};
use crate::geom::point;
use crate::gradient::{Gradient, Linear, Paint, Radial, Radius, Spread, Stop};
use crate::stops::{normalize_stops, parse_color_stop};
use std::str::FromStr;

/// Resolves a `url(...)` reference to a previously parsed gradient.
pub type UrlResolver<'a> = &'a dyn Fn(&str) -> Option<Gradient>;

/// The result of [`parse_css`].
#[derive(Debug, Clone, PartialEq)]
pub struct CssParse {
    pub paint: Paint,
    /// `false` when the descriptor could not be used at all (unresolved `url(...)`, missing
    /// parameter list, unresolvable plain color).
    pub success: bool,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientFunction {
    Linear,
    RepeatingLinear,
    Radial,
    RepeatingRadial,
}

impl FromStr for GradientFunction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(Self::Linear),
            "repeating-linear" => Ok(Self::RepeatingLinear),
            "radial" => Ok(Self::Radial),
            "repeating-radial" => Ok(Self::RepeatingRadial),
            _ => Err(()),
        }
    }
}

impl GradientFunction {
    fn new_gradient(self) -> Gradient {
        match self {
            Self::Linear => Gradient::linear(),
            Self::RepeatingLinear => Gradient::linear().with_spread(Spread::Repeat),
            Self::Radial => Gradient::radial(),
            Self::RepeatingRadial => Gradient::radial().with_spread(Spread::Repeat),
        }
    }

    fn is_radial(self) -> bool {
        matches!(self, Self::Radial | Self::RepeatingRadial)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            _ => Err(()),
        }
    }
}

impl Side {
    /// The y axis is flipped: SVG space grows downwards.
    fn apply_to_line(self, line: &mut Linear) {
        match self {
            Side::Top => {
                line.start.y = 1.0;
                line.end.y = 0.0;
            }
            Side::Bottom => {
                line.start.y = 0.0;
                line.end.y = 1.0;
            }
            Side::Left => {
                line.start.x = 1.0;
                line.end.x = 0.0;
            }
            Side::Right => {
                line.start.x = 0.0;
                line.end.x = 1.0;
            }
        }
    }

    fn apply_to_position(self, radial: &mut Radial) {
        match self {
            Side::Top => radial.position.y = 1.0,
            Side::Bottom => radial.position.y = 0.0,
            Side::Left => radial.position.x = 1.0,
            Side::Right => radial.position.x = 0.0,
        }
    }
}

use Side::{Bottom, Left, Right, Top};

/// Angles are only accepted on the compass directions; trig would not give exact 0/1 extremes.
pub const DEGREE_SIDES: [(&str, &[Side]); 16] = [
    ("0deg", &[Top]),
    ("360deg", &[Top]),
    ("45deg", &[Top, Right]),
    ("-315deg", &[Top, Right]),
    ("90deg", &[Right]),
    ("-270deg", &[Right]),
    ("135deg", &[Bottom, Right]),
    ("-225deg", &[Bottom, Right]),
    ("180deg", &[Bottom]),
    ("-180deg", &[Bottom]),
    ("225deg", &[Bottom, Left]),
    ("-135deg", &[Bottom, Left]),
    ("270deg", &[Left]),
    ("-90deg", &[Left]),
    ("315deg", &[Top, Left]),
    ("-45deg", &[Top, Left]),
];

pub fn sides_for_angle(angle: &str) -> Option<&'static [Side]> {
    DEGREE_SIDES
        .iter()
        .find(|(deg, _)| *deg == angle)
        .map(|(_, sides)| *sides)
}

/// Parses a CSS gradient descriptor or plain color.
///
/// `base` is the caller's current solid color: it seeds the first stop's relative keywords and
/// is returned untouched when no gradient can be assigned.
pub fn parse_css(
    descriptor: &str,
    base: Rgba,
    resolver: &dyn ColorResolver,
    url_resolver: Option<UrlResolver<'_>>,
) -> CssParse {
    let mut warnings = Vec::new();
    let trimmed = descriptor.trim();

    if trimmed.starts_with("url(") {
        if let Some(gradient) = url_resolver.and_then(|resolve| resolve(trimmed)) {
            return CssParse {
                paint: Paint::from_gradient(gradient, base),
                success: true,
                warnings,
            };
        }
        report(
            &mut warnings,
            Warning::UnresolvedUrl {
                url: trimmed.to_string(),
            },
        );
        return CssParse {
            paint: Paint::solid(Rgba::BLACK),
            success: false,
            warnings,
        };
    }

    let lower = trimmed.to_ascii_lowercase();
    let marker = "-gradient";
    let Some(gidx) = lower.find(marker).filter(|&idx| idx > 0) else {
        return match resolver.resolve(&lower, None) {
            Ok(color) => CssParse {
                paint: Paint::solid(color),
                success: true,
                warnings,
            },
            Err(_) => {
                report(&mut warnings, Warning::InvalidColor { token: lower });
                CssParse {
                    paint: Paint::solid(base),
                    success: false,
                    warnings,
                }
            }
        };
    };

    let kind = &lower[..gidx];
    let rest = &lower[gidx + marker.len()..];
    let Some(pidx) = rest.find('(') else {
        report(
            &mut warnings,
            Warning::MissingParameters {
                descriptor: lower.clone(),
            },
        );
        return CssParse {
            paint: Paint::solid(base),
            success: false,
            warnings,
        };
    };
    let params = &rest[pidx + 1..];
    let params = params
        .strip_suffix(");")
        .or_else(|| params.strip_suffix(')'))
        .unwrap_or(params);

    let Ok(function) = kind.parse::<GradientFunction>() else {
        report(
            &mut warnings,
            Warning::UnsupportedGradient {
                kind: kind.to_string(),
            },
        );
        return CssParse {
            paint: Paint::solid(base),
            success: true,
            warnings,
        };
    };

    let mut args = ArgParser {
        gradient: function.new_gradient(),
        solid: base,
        prev: base.established(),
        resolver,
        warnings,
    };
    if function.is_radial() {
        args.parse_radial(params);
    } else {
        args.parse_linear(params);
    }

    let ArgParser {
        mut gradient,
        solid,
        warnings,
        ..
    } = args;
    normalize_stops(&mut gradient.stops);
    CssParse {
        paint: Paint {
            solid,
            gradient: Some(gradient),
        },
        success: true,
        warnings,
    }
}

struct ArgParser<'a> {
    gradient: Gradient,
    solid: Rgba,
    prev: Option<Rgba>,
    resolver: &'a dyn ColorResolver,
    warnings: Vec<Warning>,
}

fn segments(params: &str) -> impl Iterator<Item = &str> {
    params
        .split(", ")
        .map(|seg| seg.trim().trim_end_matches(','))
}

impl ArgParser<'_> {
    fn parse_linear(&mut self, params: &str) {
        for seg in segments(params) {
            if seg.contains("deg") {
                match sides_for_angle(seg) {
                    Some(sides) => self.set_line_sides(sides.iter().copied()),
                    None => report(
                        &mut self.warnings,
                        Warning::InvalidAngle {
                            angle: seg.to_string(),
                        },
                    ),
                }
            } else if let Some(sides) = seg.strip_prefix("to ") {
                let sides = self.parse_sides(sides, seg);
                self.set_line_sides(sides.into_iter());
            } else if seg.starts_with(')') {
                break;
            } else {
                self.push_stop(seg);
            }
        }
    }

    // TODO: compute center and radius for `at <position>` per css3-images radial gradients
    // instead of only moving the position anchor.
    fn parse_radial(&mut self, params: &str) {
        for seg in segments(params) {
            if seg.contains("circle") {
                self.reset_radial(Radius::Uniform(0.5));
            } else if seg.contains("ellipse") {
                self.reset_radial(Radius::Elliptical { x: 0.5, y: 0.5 });
            } else if let Some(sides) = seg.strip_prefix("at ") {
                let sides = self.parse_sides(sides, seg);
                let radial = self.gradient.make_radial();
                radial.center = point(0.0, 0.0);
                radial.focal = point(0.0, 0.0);
                radial.radius = Radius::Uniform(0.0);
                for side in sides {
                    side.apply_to_position(radial);
                }
            } else if seg.starts_with(')') {
                break;
            } else {
                self.push_stop(seg);
            }
        }
    }

    fn parse_sides(&mut self, words: &str, seg: &str) -> Vec<Side> {
        let mut sides = Vec::new();
        for word in words.split(' ').filter(|w| !w.is_empty()) {
            match word.parse::<Side>() {
                Ok(side) => sides.push(side),
                Err(()) => report(
                    &mut self.warnings,
                    Warning::UnknownKeyword {
                        keyword: word.to_string(),
                        segment: seg.to_string(),
                    },
                ),
            }
        }
        sides
    }

    fn set_line_sides(&mut self, sides: impl Iterator<Item = Side>) {
        let line = self.gradient.make_linear();
        line.start = point(0.0, 0.0);
        line.end = point(0.0, 0.0);
        for side in sides {
            side.apply_to_line(line);
        }
    }

    fn reset_radial(&mut self, radius: Radius) {
        let radial = self.gradient.make_radial();
        radial.center = point(0.5, 0.5);
        radial.focal = point(0.5, 0.5);
        radial.radius = radius;
    }

    fn push_stop(&mut self, seg: &str) {
        match parse_color_stop(seg, self.prev, self.resolver) {
            Ok(stop) => self.accept_stop(stop),
            Err(err) => report(
                &mut self.warnings,
                Warning::RejectedStop {
                    segment: seg.to_string(),
                    reason: err.to_string(),
                },
            ),
        }
    }

    fn accept_stop(&mut self, stop: Stop) {
        if self.gradient.stops.is_empty() {
            self.solid = stop.color;
        }
        self.prev = stop.color.established();
        self.gradient.stops.push(stop);
    }
}
