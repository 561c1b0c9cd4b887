// src/crawl/links.rs
// =============================================================================
// This module turns fetched page content into URLs worth crawling.
//
// A link is "internal" when its raw href starts with the site's path prefix
// (e.g. "/wiki/"). Internal links are made absolute by gluing the site origin
// in front of them; everything else is dropped. The test runs on the raw href,
// so absolute links to the same host ("https://site/wiki/X") are NOT internal.
//
// Rust concepts:
// - Iterators: flat_map/filter/map keep the extraction a single pass
// - url::Url: used once, to split a seed URL into origin and path
// =============================================================================

use url::Url;

use crate::error::ConfigError;
use crate::page::PageContent;

pub const DEFAULT_INTERNAL_PREFIX: &str = "/wiki/";

// Extracts the internal links of a page
//
// Parameters:
//   content: the fetched page
//   site_origin: scheme + host, e.g. "https://en.wikipedia.org"
//   internal_prefix: path prefix that marks a link as internal, e.g. "/wiki/"
//
// Returns: absolute URLs in block order, then anchor order. Repeated anchors
// produce repeated links.
pub fn extract_internal_links(
    content: &PageContent,
    site_origin: &str,
    internal_prefix: &str,
) -> Vec<String> {
    content
        .anchors()
        .filter(|href| href.starts_with(internal_prefix))
        .map(|href| format!("{}{}", site_origin, href))
        .collect()
}

// Parses a URL that is allowed into the frontier
//
// The URL must be absolute, use http or https, and have a host.
// Relative paths like "/wiki/A" fail here: Url::parse has no base to
// resolve them against, so it returns RelativeUrlWithoutBase.
pub(crate) fn parse_absolute(url: &str) -> Result<Url, ConfigError> {
    // A small closure so every early return builds the same error shape
    let invalid = |reason: &str| ConfigError::InvalidSeed {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;

    // matches! is a shorthand for "does this value fit one of these patterns?"
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid("only http and https seeds can be crawled"));
    }
    if parsed.host_str().is_none() {
        return Err(invalid("seed has no host"));
    }

    Ok(parsed)
}

/// Optional clean-up applied to each internal link after the prefix test.
/// Both switches are off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Normalization {
    pub strip_fragment: bool,
    pub strip_query: bool,
}

impl Normalization {
    pub fn is_identity(&self) -> bool {
        !self.strip_fragment && !self.strip_query
    }

    pub fn apply(&self, link: &str) -> String {
        let (rest, fragment) = match link.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (link, None),
        };
        let rest = if self.strip_query {
            rest.split_once('?').map_or(rest, |(path, _)| path)
        } else {
            rest
        };

        match fragment {
            Some(fragment) if !self.strip_fragment => format!("{}#{}", rest, fragment),
            _ => rest.to_string(),
        }
    }
}

/// Which links a crawl session follows, and how it writes them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPolicy {
    pub site_origin: String,
    pub internal_prefix: String,
    pub normalization: Normalization,
}

impl LinkPolicy {
    pub fn new(site_origin: impl Into<String>, internal_prefix: impl Into<String>) -> Self {
        Self {
            site_origin: site_origin.into(),
            internal_prefix: internal_prefix.into(),
            normalization: Normalization::default(),
        }
    }

    // Builds a policy whose origin is taken from the seed URL
    //
    // Example:
    //   seed = "https://en.wikipedia.org/wiki/Rust", prefix = "/wiki/"
    //   origin = "https://en.wikipedia.org"
    pub fn for_seed(seed: &str, internal_prefix: &str) -> Result<Self, ConfigError> {
        // Reject anything that is not "http(s)://host/..." before looking at the prefix
        let parsed = parse_absolute(seed)?;

        if !internal_prefix.starts_with('/') {
            return Err(ConfigError::InvalidPrefix(internal_prefix.to_string()));
        }

        // ascii_serialization() is "scheme://host[:port]" with no trailing slash
        Ok(Self::new(parsed.origin().ascii_serialization(), internal_prefix))
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn extract(&self, content: &PageContent) -> Vec<String> {
        let links = extract_internal_links(content, &self.site_origin, &self.internal_prefix);
        if self.normalization.is_identity() {
            return links;
        }
        links
            .iter()
            .map(|link| self.normalization.apply(link))
            .collect()
    }
}
