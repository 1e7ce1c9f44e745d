use crate::color::Rgba;
use crate::geom::{Point, Transform, point};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GradientKind {
    Linear,
    Radial,
}

/// How the gradient is rendered past its defined extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Spread {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

impl FromStr for Spread {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pad" => Ok(Self::Pad),
            "reflect" => Ok(Self::Reflect),
            "repeat" => Ok(Self::Repeat),
            _ => Err(()),
        }
    }
}

/// The coordinate system of the gradient geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Units {
    #[default]
    ObjectBoundingBox,
    UserSpaceOnUse,
}

impl FromStr for Units {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "objectBoundingBox" => Ok(Self::ObjectBoundingBox),
            "userSpaceOnUse" => Ok(Self::UserSpaceOnUse),
            _ => Err(()),
        }
    }
}

/// A color checkpoint along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stop {
    /// Position along the gradient. Only guaranteed to lie in `[0, 1]` and be non-decreasing
    /// once [`crate::stops::normalize_stops`] has run.
    pub offset: f64,
    pub color: Rgba,
    pub opacity: f64,
}

impl Default for Stop {
    fn default() -> Self {
        Self {
            offset: 0.0,
            color: Rgba::BLACK,
            opacity: 1.0,
        }
    }
}

impl Stop {
    pub fn new(offset: f64, color: Rgba) -> Self {
        Self {
            offset,
            color,
            opacity: 1.0,
        }
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Linear {
    /// `x1`/`y1` in SVG.
    pub start: Point,
    /// `x2`/`y2` in SVG.
    pub end: Point,
}

impl Default for Linear {
    /// Left to right.
    fn default() -> Self {
        Self {
            start: point(0.0, 0.0),
            end: point(1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Radius {
    Uniform(f64),
    Elliptical { x: f64, y: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Radial {
    pub center: Point,
    pub focal: Point,
    pub radius: Radius,
    /// Anchor adjusted by the CSS `at <side>` form.
    pub position: Point,
}

impl Default for Radial {
    fn default() -> Self {
        Self {
            center: point(0.5, 0.5),
            focal: point(0.5, 0.5),
            radius: Radius::Uniform(0.5),
            position: point(0.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Shape {
    Linear(Linear),
    Radial(Radial),
}

/// The canonical gradient descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Gradient {
    #[serde(flatten)]
    pub shape: Shape,
    pub spread: Spread,
    pub units: Units,
    pub transform: Transform,
    pub stops: Vec<Stop>,
}

impl Gradient {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            spread: Spread::default(),
            units: Units::default(),
            transform: Transform::identity(),
            stops: Vec::new(),
        }
    }

    pub fn linear() -> Self {
        Self::new(Shape::Linear(Linear::default()))
    }

    pub fn radial() -> Self {
        Self::new(Shape::Radial(Radial::default()))
    }

    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    pub fn with_stops(mut self, stops: Vec<Stop>) -> Self {
        self.stops = stops;
        self
    }

    pub fn kind(&self) -> GradientKind {
        match self.shape {
            Shape::Linear(_) => GradientKind::Linear,
            Shape::Radial(_) => GradientKind::Radial,
        }
    }

    pub fn as_linear(&self) -> Option<&Linear> {
        match &self.shape {
            Shape::Linear(linear) => Some(linear),
            Shape::Radial(_) => None,
        }
    }

    pub fn as_radial(&self) -> Option<&Radial> {
        match &self.shape {
            Shape::Radial(radial) => Some(radial),
            Shape::Linear(_) => None,
        }
    }

    /// Transitions to a linear gradient and returns its geometry.
    ///
    /// A radial gradient is reinterpreted with the default left-to-right geometry. Stops, spread,
    /// units and transform are kept.
    pub fn make_linear(&mut self) -> &mut Linear {
        if let Shape::Radial(_) = self.shape {
            self.shape = Shape::Linear(Linear::default());
        }
        match &mut self.shape {
            Shape::Linear(linear) => linear,
            Shape::Radial(_) => unreachable!("shape was just made linear"),
        }
    }

    /// Transitions to a radial gradient and returns its geometry. See [`Gradient::make_linear`].
    pub fn make_radial(&mut self) -> &mut Radial {
        if let Shape::Linear(_) = self.shape {
            self.shape = Shape::Radial(Radial::default());
        }
        match &mut self.shape {
            Shape::Radial(radial) => radial,
            Shape::Linear(_) => unreachable!("shape was just made radial"),
        }
    }
}

/// A solid color plus an optional gradient.
///
/// The solid color is the fallback when no gradient could be built, and otherwise tracks the
/// first stop's color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paint {
    pub solid: Rgba,
    pub gradient: Option<Gradient>,
}

impl Paint {
    pub fn solid(color: Rgba) -> Self {
        Self {
            solid: color,
            gradient: None,
        }
    }

    pub fn from_gradient(gradient: Gradient, fallback: Rgba) -> Self {
        let solid = gradient
            .stops
            .first()
            .map(|stop| stop.color)
            .unwrap_or(fallback);
        Self {
            solid,
            gradient: Some(gradient),
        }
    }

    pub fn is_gradient(&self) -> bool {
        self.gradient.is_some()
    }
}
