#![forbid(unsafe_code)]

//! CSS and SVG gradient descriptors, parsed into one canonical [`Gradient`] model.
//!
//! Two front ends feed the same stop normalization:
//! - [`css`]: `linear-gradient(...)`, `radial-gradient(...)` and their `repeating-` forms
//! - [`svg`]: `<linearGradient>` / `<radialGradient>` / `<stop>` markup
//!
//! Recoverable problems are logged through `tracing` and returned as [`Warning`]s; only
//! structural failures surface as [`Error`].

pub mod cache;
pub mod color;
pub mod css;
pub mod error;
pub mod geom;
pub mod gradient;
pub mod stops;
pub mod svg;

pub use cache::GradientCache;
pub use color::{ColorResolver, CssColorResolver, Rgba};
pub use css::{CssParse, UrlResolver};
pub use error::{Error, Result, Warning};
pub use gradient::{
    Gradient, GradientKind, Linear, Paint, Radial, Radius, Shape, Spread, Stop, Units,
};
pub use svg::SvgGradientReader;

use quick_xml::Reader;
use quick_xml::events::BytesStart;
use std::io::{BufRead, Read};
use std::sync::Arc;

/// Parser front door: holds the color resolver and an optional descriptor cache.
#[derive(Clone)]
pub struct Engine {
    resolver: Arc<dyn ColorResolver + Send + Sync>,
    cache: Option<Arc<GradientCache>>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            resolver: Arc::new(CssColorResolver),
            cache: None,
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl Engine {
    fn parse_timing_enabled() -> bool {
        static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
        *ENABLED.get_or_init(|| match std::env::var("OMBRE_PARSE_TIMING").as_deref() {
            Ok("1") | Ok("true") => true,
            _ => false,
        })
    }

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_color_resolver(mut self, resolver: Arc<dyn ColorResolver + Send + Sync>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Memoizes successful gradient parses in `cache`.
    ///
    /// Entries are not keyed by resolver, so engines with different resolvers should not share
    /// a cache.
    pub fn with_cache(mut self, cache: Arc<GradientCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Uses the process-wide [`GradientCache::shared`] instance.
    pub fn with_shared_cache(self) -> Self {
        self.with_cache(GradientCache::shared())
    }

    pub fn resolver(&self) -> &(dyn ColorResolver + Send + Sync) {
        self.resolver.as_ref()
    }

    pub fn cache(&self) -> Option<&GradientCache> {
        self.cache.as_deref()
    }

    /// Parses a CSS gradient descriptor (or plain color). See [`css::parse_css`].
    pub fn parse_css(
        &self,
        descriptor: &str,
        base: Rgba,
        url_resolver: Option<UrlResolver<'_>>,
    ) -> CssParse {
        let start = Self::parse_timing_enabled().then(std::time::Instant::now);

        let key = self
            .cache
            .as_ref()
            .map(|_| GradientCache::key(base, descriptor));
        if let (Some(cache), Some(key)) = (self.cache.as_deref(), key.as_deref()) {
            if let Some(paint) = cache.get(key) {
                tracing::trace!(descriptor, "gradient cache hit");
                return CssParse {
                    paint,
                    success: true,
                    warnings: Vec::new(),
                };
            }
        }

        let parsed = css::parse_css(descriptor, base, self.resolver.as_ref(), url_resolver);

        if let (Some(cache), Some(key)) = (self.cache.as_deref(), key) {
            let from_url = descriptor.trim_start().starts_with("url(");
            if parsed.success && parsed.paint.is_gradient() && !from_url {
                cache.insert(key, parsed.paint.clone());
            }
        }

        if let Some(start) = start {
            tracing::debug!(
                elapsed = ?start.elapsed(),
                warnings = parsed.warnings.len(),
                input_bytes = descriptor.len(),
                "[parse-timing] css"
            );
        }
        parsed
    }

    /// Reads the first gradient element of an XML document.
    pub fn read_xml(&self, input: impl Read) -> Result<Gradient> {
        let start = Self::parse_timing_enabled().then(std::time::Instant::now);
        let gradient = svg::read_xml(input, self.resolver.as_ref());
        if let Some(start) = start {
            tracing::debug!(elapsed = ?start.elapsed(), "[parse-timing] xml");
        }
        gradient
    }

    /// Reads one gradient element from inside a larger `quick_xml` parse.
    pub fn parse_xml_element<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        start: &BytesStart<'_>,
        self_closing: bool,
    ) -> Result<Gradient> {
        svg::parse_xml_element(reader, start, self_closing, self.resolver.as_ref())
    }

    /// An SVG reader bound to this engine's resolver, for callers that want the warnings or
    /// need to seed an `href`-referenced gradient.
    pub fn svg_reader(&self) -> SvgGradientReader<'_> {
        SvgGradientReader::new(self.resolver.as_ref())
    }
}

/// [`Engine::parse_css`] with the default engine.
pub fn parse_css(descriptor: &str, base: Rgba, url_resolver: Option<UrlResolver<'_>>) -> CssParse {
    Engine::default().parse_css(descriptor, base, url_resolver)
}

/// [`Engine::read_xml`] with the default engine.
pub fn read_xml(input: impl Read) -> Result<Gradient> {
    Engine::default().read_xml(input)
}

/// [`Engine::parse_xml_element`] with the default engine.
pub fn parse_xml_element<R: BufRead>(
    reader: &mut Reader<R>,
    start: &BytesStart<'_>,
    self_closing: bool,
) -> Result<Gradient> {
    Engine::default().parse_xml_element(reader, start, self_closing)
}

#[cfg(test)]
mod tests;
