#![forbid(unsafe_code)]

use crate::{Error, Result};
use std::str::FromStr;

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Transform = euclid::Transform2D<f64, Unit, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Parses an SVG transform list (`translate(...) rotate(...)`, `matrix(...)`, ...) into a
/// single affine matrix.
pub fn parse_transform(text: &str) -> Result<Transform> {
    let ts = svgtypes::Transform::from_str(text.trim()).map_err(|err| Error::InvalidNumber {
        attribute: "gradientTransform".to_string(),
        value: format!("{text} ({err})"),
    })?;
    Ok(Transform::new(ts.a, ts.b, ts.c, ts.d, ts.e, ts.f))
}
