//! SVG `<linearGradient>` / `<radialGradient>` / `<stop>` markup.

use crate::color::ColorResolver;
use crate::error::{Warning, report};
use crate::geom::parse_transform;
use crate::gradient::{Gradient, Radius, Spread, Stop, Units};
use crate::stops::{normalize_stops, read_fraction};
use crate::{Error, Result};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::io::{BufRead, BufReader, Cursor, Read};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Element {
    LinearGradient,
    RadialGradient,
    Stop,
}

impl Element {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"linearGradient" => Some(Self::LinearGradient),
            b"radialGradient" => Some(Self::RadialGradient),
            b"stop" => Some(Self::Stop),
            _ => None,
        }
    }

    fn is_gradient(self) -> bool {
        matches!(self, Self::LinearGradient | Self::RadialGradient)
    }
}

/// Decodes raw XML bytes into UTF-8.
///
/// - A BOM, if present, determines the encoding and is stripped.
/// - Otherwise the `encoding="..."` label of the XML declaration is honored.
/// - Otherwise UTF-8 is used.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    let (enc, bom_len) = sniff_encoding(bytes)?;
    let (text, _) = enc.decode_without_bom_handling(&bytes[bom_len..]);
    Ok(text.into_owned())
}

/// How many leading bytes are inspected for a BOM or an XML declaration.
const SNIFF_LEN: u64 = 1024;

/// The document encoding and the length of its BOM, from the first bytes of a document.
fn sniff_encoding(head: &[u8]) -> Result<(&'static Encoding, usize)> {
    if let Some(found) = Encoding::for_bom(head) {
        return Ok(found);
    }
    match declared_encoding(head) {
        Some(label) => Encoding::for_label(label)
            .map(|enc| (enc, 0))
            .ok_or_else(|| Error::UnsupportedEncoding {
                label: String::from_utf8_lossy(label).into_owned(),
            }),
        None => Ok((UTF_8, 0)),
    }
}

fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let decl = bytes.strip_prefix(b"<?xml")?;
    let end = decl.windows(2).position(|w| w == b"?>")?;
    let decl = &decl[..end];
    let at = decl.windows(8).position(|w| w == b"encoding")?;
    let mut rest = &decl[at + 8..];
    while let [b, tail @ ..] = rest {
        if !b.is_ascii_whitespace() {
            break;
        }
        rest = tail;
    }
    let rest = rest.strip_prefix(b"=")?;
    let start = rest.iter().position(|b| !b.is_ascii_whitespace())?;
    let rest = &rest[start..];
    let quote = *rest.first().filter(|q| **q == b'"' || **q == b'\'')?;
    let rest = &rest[1..];
    let len = rest.iter().position(|b| *b == quote)?;
    Some(&rest[..len])
}

/// Token-driven reader for one gradient element and its `<stop>` children.
pub struct SvgGradientReader<'a> {
    resolver: &'a dyn ColorResolver,
    gradient: Option<Gradient>,
    warnings: Vec<Warning>,
}

impl<'a> SvgGradientReader<'a> {
    pub fn new(resolver: &'a dyn ColorResolver) -> Self {
        Self {
            resolver,
            gradient: None,
            warnings: Vec::new(),
        }
    }

    /// Starts from an existing gradient, e.g. the target of an `href` reference. Its stops are
    /// kept and the element's attributes are applied on top.
    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.gradient = Some(gradient);
        self
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Reads a whole document: non-element tokens are skipped until the first element, which
    /// is then read with [`SvgGradientReader::read_element`].
    pub fn read_document(&mut self, text: &str) -> Result<Gradient> {
        self.read_stream(Reader::from_str(text))
    }

    /// [`SvgGradientReader::read_document`] over a UTF-8 byte stream. Nothing past the end of
    /// the first gradient element is read from `reader`.
    pub fn read_stream<R: BufRead>(&mut self, mut reader: Reader<R>) -> Result<Gradient> {
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf).map_err(Error::xml)? {
                Event::Start(start) => return self.read_element(&mut reader, &start, false),
                Event::Empty(start) => return self.read_element(&mut reader, &start, true),
                Event::Eof => return Err(Error::MissingGradient),
                _ => {}
            }
            buf.clear();
        }
    }

    /// Reads from `start` up to the end of the enclosing gradient element.
    ///
    /// `self_closing` tells whether `start` came from an empty element (`<radialGradient/>`),
    /// in which case nothing further is consumed from `reader`.
    pub fn read_element<R: BufRead>(
        &mut self,
        reader: &mut Reader<R>,
        start: &BytesStart<'_>,
        self_closing: bool,
    ) -> Result<Gradient> {
        let first = self.start_element(start)?;
        if !(self_closing && first.is_some_and(Element::is_gradient)) {
            let mut buf = Vec::new();
            loop {
                match reader.read_event_into(&mut buf).map_err(Error::xml)? {
                    Event::Start(e) => {
                        self.start_element(&e)?;
                    }
                    Event::Empty(e) => {
                        if self.start_element(&e)?.is_some_and(Element::is_gradient) {
                            break;
                        }
                    }
                    Event::End(e) => {
                        let name = e.local_name();
                        match Element::from_local_name(name.as_ref()) {
                            Some(element) if element.is_gradient() => break,
                            Some(Element::Stop) => {}
                            _ => report(
                                &mut self.warnings,
                                Warning::UnexpectedEndElement {
                                    name: String::from_utf8_lossy(name.as_ref()).into_owned(),
                                },
                            ),
                        }
                    }
                    Event::Eof => break,
                    _ => {}
                }
                buf.clear();
            }
        }

        let mut gradient = self.gradient.take().ok_or(Error::MissingGradient)?;
        normalize_stops(&mut gradient.stops);
        Ok(gradient)
    }

    fn start_element(&mut self, e: &BytesStart<'_>) -> Result<Option<Element>> {
        let name = e.local_name();
        let element = Element::from_local_name(name.as_ref());
        match element {
            Some(Element::LinearGradient) => self.linear_gradient(e)?,
            Some(Element::RadialGradient) => self.radial_gradient(e)?,
            Some(Element::Stop) => self.stop(e)?,
            None => report(
                &mut self.warnings,
                Warning::UnknownElement {
                    name: String::from_utf8_lossy(name.as_ref()).into_owned(),
                },
            ),
        }
        Ok(element)
    }

    fn linear_gradient(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let attrs = attributes(e)?;
        let gradient = self.gradient.get_or_insert_with(Gradient::linear);
        let mut common = Vec::new();
        let line = gradient.make_linear();
        for (name, value) in attrs {
            match name.as_str() {
                "x1" => line.start.x = read_fraction(&value)?,
                "y1" => line.start.y = read_fraction(&value)?,
                "x2" => line.end.x = read_fraction(&value)?,
                "y2" => line.end.y = read_fraction(&value)?,
                _ => common.push((name, value)),
            }
        }
        for (name, value) in common {
            self.gradient_attr(&name, &value);
        }
        Ok(())
    }

    fn radial_gradient(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let attrs = attributes(e)?;
        let gradient = self.gradient.get_or_insert_with(Gradient::radial);
        let mut common = Vec::new();
        let radial = gradient.make_radial();
        let (mut set_fx, mut set_fy) = (false, false);
        for (name, value) in attrs {
            match name.as_str() {
                "r" => radial.radius = Radius::Uniform(read_fraction(&value)?),
                "cx" => radial.center.x = read_fraction(&value)?,
                "cy" => radial.center.y = read_fraction(&value)?,
                "fx" => {
                    set_fx = true;
                    radial.focal.x = read_fraction(&value)?;
                }
                "fy" => {
                    set_fy = true;
                    radial.focal.y = read_fraction(&value)?;
                }
                _ => common.push((name, value)),
            }
        }
        // cx/cy may come after fx/fy, so the focal default waits for the full list.
        if !set_fx {
            radial.focal.x = radial.center.x;
        }
        if !set_fy {
            radial.focal.y = radial.center.y;
        }
        for (name, value) in common {
            self.gradient_attr(&name, &value);
        }
        Ok(())
    }

    /// Attributes shared by both gradient elements. `id`, `href` and friends are the caller's
    /// business and ignored here.
    fn gradient_attr(&mut self, name: &str, value: &str) {
        let Some(gradient) = self.gradient.as_mut() else {
            return;
        };
        let unknown = match name {
            "gradientTransform" => match parse_transform(value) {
                Ok(transform) => {
                    gradient.transform = transform;
                    false
                }
                Err(_) => true,
            },
            "gradientUnits" => match value.parse::<Units>() {
                Ok(units) => {
                    gradient.units = units;
                    false
                }
                Err(()) => true,
            },
            "spreadMethod" => match value.parse::<Spread>() {
                Ok(spread) => {
                    gradient.spread = spread;
                    false
                }
                Err(()) => true,
            },
            _ => false,
        };
        if unknown {
            report(
                &mut self.warnings,
                Warning::UnknownAttributeValue {
                    attribute: name.to_string(),
                    value: value.to_string(),
                },
            );
        }
    }

    fn stop(&mut self, e: &BytesStart<'_>) -> Result<()> {
        let mut attrs = attributes(e)?;
        let style = attrs
            .iter()
            .find(|(name, _)| name == "style")
            .map(|(_, value)| value.clone());
        if let Some(style) = style {
            for decl in style.split(';') {
                let Some((name, value)) = decl.trim().split_once(':') else {
                    continue;
                };
                attrs.push((name.trim().to_string(), value.trim().to_string()));
            }
        }

        let mut stop = Stop::default();
        for (name, value) in &attrs {
            match name.as_str() {
                "offset" => stop.offset = read_fraction(value)?,
                "stop-color" => stop.color = self.resolver.resolve(value, None)?,
                "stop-opacity" => {
                    let opacity = value
                        .trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| !v.is_nan())
                        .ok_or_else(|| Error::InvalidNumber {
                            attribute: name.clone(),
                            value: value.clone(),
                        })?;
                    stop.opacity = opacity.clamp(0.0, 1.0);
                }
                _ => {}
            }
        }

        match self.gradient.as_mut() {
            Some(gradient) => gradient.stops.push(stop),
            None => report(&mut self.warnings, Warning::StopOutsideGradient),
        }
        Ok(())
    }
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    e.attributes()
        .map(|attr| {
            let attr = attr.map_err(Error::xml)?;
            let name = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value().map_err(Error::xml)?.into_owned();
            Ok((name, value))
        })
        .collect()
}

/// Reads the first gradient element of an XML document.
///
/// UTF-8 input is parsed as it streams in and reading stops at the end of the gradient element.
/// Other encodings are decoded in full first.
pub fn read_xml(mut input: impl Read, resolver: &dyn ColorResolver) -> Result<Gradient> {
    let mut head = Vec::new();
    input.by_ref().take(SNIFF_LEN).read_to_end(&mut head)?;
    let (enc, bom_len) = sniff_encoding(&head)?;
    let mut svg = SvgGradientReader::new(resolver);

    if enc == UTF_8 {
        head.drain(..bom_len);
        let stream = BufReader::new(Cursor::new(head).chain(input));
        return svg.read_stream(Reader::from_reader(stream));
    }

    tracing::debug!(encoding = enc.name(), "decoding XML input up front");
    input.read_to_end(&mut head)?;
    let (text, _) = enc.decode_without_bom_handling(&head[bom_len..]);
    svg.read_document(&text)
}

/// Reads one gradient element from inside a larger `quick_xml` parse.
pub fn parse_xml_element<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
    self_closing: bool,
    resolver: &dyn ColorResolver,
) -> Result<Gradient> {
    SvgGradientReader::new(resolver).read_element(reader, start, self_closing)
}
