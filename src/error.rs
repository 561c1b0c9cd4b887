// src/error.rs
// =============================================================================
// Error types for the crawl core.
//
// There are two collaborator failures (fetching a page, talking to the index)
// and one wrapper, CrawlError, which is what Crawler::step returns. Nothing in
// the core retries: every error goes straight back to the caller.
//
// Rust concepts:
// - thiserror: #[derive(Error)] writes the Display and Error impls for us
// - #[error("...")]: the message; {url} and {0} refer to the variant's fields
// - #[source]: keeps the underlying reqwest error reachable via .source()
// - #[from]: generates From<FetchError> for CrawlError, which is what lets
//   the ? operator convert between them
// =============================================================================

use thiserror::Error;

// Failure reaching or reading a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be configured
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The server answered with a non-success status code
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The content selector could not be parsed
    #[error("invalid CSS selector '{0}'")]
    Selector(String),

    /// Failure reported by a non-HTTP fetcher
    #[error("{0}")]
    Other(String),
}

// Failure persisting to or querying the index
#[derive(Debug, Error)]
pub enum IndexError {
    /// A lock guarding the index was poisoned by a panicking writer
    #[error("index lock poisoned")]
    Poisoned,

    /// Backend-specific failure
    #[error("index backend error: {0}")]
    Backend(String),
}

// Bad crawl settings (caught before any network traffic)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeed { url: String, reason: String },

    #[error("internal link prefix must start with '/', got '{0}'")]
    InvalidPrefix(String),
}

// Everything that can go wrong during one crawl step
// #[error(transparent)] shows the inner error's message unchanged
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Index(#[from] IndexError),
}
