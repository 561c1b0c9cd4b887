// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Submodules:
// - frontier: FIFO queue of URLs waiting to be crawled
// - links: picks the internal links out of a fetched page
// - controller: the Crawler, which runs one fetch -> index -> enqueue step
//   at a time
//
// Frontier and link extraction do no I/O. Only the Crawler talks to the
// fetcher and the index.
// =============================================================================

mod controller;
mod frontier;
mod links;

pub use controller::{CrawlMode, Crawler};
pub use frontier::Frontier;
pub use links::{extract_internal_links, LinkPolicy, Normalization, DEFAULT_INTERNAL_PREFIX};
