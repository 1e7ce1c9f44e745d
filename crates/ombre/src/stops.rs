//! Color stops: the fraction reader, the CSS color-stop parser and the CSS3 color-stop fixup.

use crate::color::{ColorResolver, Rgba};
use crate::gradient::Stop;
use crate::{Error, Result};

/// Reads a plain or percentage number as a fraction.
///
/// `"50%"` and `"0.5"` both read as `0.5`. Negative values clamp to 0; values above 1 are kept
/// and left for [`normalize_stops`].
pub fn read_fraction(text: &str) -> Result<f64> {
    let v = text.trim();
    let (num, div) = match v.strip_suffix('%') {
        Some(num) => (num.trim_end(), 100.0),
        None => (v, 1.0),
    };
    let f = num
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .ok_or_else(|| Error::InvalidFraction {
            value: text.to_string(),
        })?
        / div;
    Ok(if f < 0.0 { 0.0 } else { f })
}

/// Keywords that reuse a base color and only change the stop opacity.
///
/// Blending towards a fully transparent color in pre-multiplied space darkens the midpoint, so
/// `transparent` keeps the neighbouring color and drops the opacity instead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RelativeKeyword {
    /// `clearer-N`: opacity `(100 - N) / 100`.
    Clearer(f64),
    Transparent,
}

impl RelativeKeyword {
    pub fn parse(token: &str) -> Option<Self> {
        if token == "transparent" {
            return Some(Self::Transparent);
        }
        let pct = token.strip_prefix("clearer-")?;
        let pct = pct.trim_end_matches('%').parse::<f64>().ok()?;
        pct.is_finite().then_some(Self::Clearer(pct))
    }

    pub fn opacity(self) -> f64 {
        match self {
            Self::Clearer(pct) => ((100.0 - pct) / 100.0).clamp(0.0, 1.0),
            Self::Transparent => 0.0,
        }
    }
}

/// Parses one `color [offset]` argument of a CSS gradient.
///
/// `prev` is the previously resolved stop color (the base color for the first stop), `None`
/// when no color has been established yet. An omitted offset stays 0, the marker that
/// [`normalize_stops`] fills in.
pub fn parse_color_stop(
    segment: &str,
    prev: Option<Rgba>,
    resolver: &dyn ColorResolver,
) -> Result<Stop> {
    let mut stop = Stop::default();

    let (token, rest) = match segment.split_once(' ') {
        Some((token, rest)) if !token.is_empty() => (token, Some(rest.trim())),
        _ => (segment, None),
    };
    let keyword = RelativeKeyword::parse(token);

    // `clearer-50 red 40%` names the keyword's base color explicitly.
    let mut explicit_base = None;
    if let Some(rest) = rest {
        match read_fraction(rest) {
            Ok(offset) => stop.offset = offset,
            Err(_) if keyword.is_some() => {
                let (base, offset) = match rest.split_once(' ') {
                    Some((base, offset)) => (base, Some(offset.trim())),
                    None => (rest, None),
                };
                explicit_base = Some(resolver.resolve(base, prev)?);
                if let Some(offset) = offset {
                    stop.offset = read_fraction(offset)?;
                }
            }
            Err(err) => return Err(err),
        }
    }

    match keyword {
        Some(keyword) if explicit_base.is_some() || prev.is_none() => {
            stop.color = explicit_base.or(prev).unwrap_or_default();
            stop.opacity = keyword.opacity();
        }
        _ => stop.color = resolver.resolve(token, prev)?,
    }

    Ok(stop)
}

/// Applies the CSS3 color-stop fixup
/// (<https://www.w3.org/TR/css3-images/#color-stop-syntax>).
///
/// An offset of exactly 0 on any stop but the first means "unspecified". Runs of unspecified
/// stops are spread evenly between the explicit stops around them, the last stop defaults to
/// 1.0, and explicit offsets never move backwards.
pub fn normalize_stops(stops: &mut [Stop]) {
    let len = stops.len();
    if len == 0 {
        return;
    }

    let mut run_start: Option<usize> = None;
    let mut last = 0.0_f64;
    for i in 0..len {
        if stops[i].offset != 0.0 && stops[i].offset < last {
            stops[i].offset = last;
        }
        if i == len - 1 && stops[i].offset == 0.0 {
            stops[i].offset = if last < 1.0 { 1.0 } else { last };
        }

        if i > 0 && stops[i].offset == 0.0 {
            if run_start.is_none() {
                run_start = Some(i);
                stops[i].offset = last;
            }
            continue;
        }

        if let Some(start_idx) = run_start.take() {
            let start = stops[start_idx].offset;
            let end = stops[i].offset;
            let step = (end - start) / ((i - start_idx) + 1) as f64;
            let mut cur = start + step;
            for stop in &mut stops[start_idx..i] {
                stop.offset = cur;
                cur += step;
            }
        }
        last = stops[i].offset;
    }
}
