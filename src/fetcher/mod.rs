// src/fetcher/mod.rs
// =============================================================================
// Fetchers turn a URL into PageContent.
//
// Submodules:
// - http: downloads a page with reqwest and parses it with scraper
//
// The Crawler only sees the Fetcher trait, so tests can hand it a scripted
// fetcher instead of touching the network.
// =============================================================================

mod http;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::page::PageContent;

pub use http::{parse_page, FetcherConfig, HttpFetcher, DEFAULT_CONTENT_SELECTOR};

#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Retrieve and parse one page
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError>;
}
