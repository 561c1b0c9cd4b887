// src/index/mod.rs
// =============================================================================
// The index stores crawled pages and answers "where does this word appear?".
//
// Submodules:
// - memory: an in-process inverted index (per-page term counters)
//
// The Crawler only needs is_indexed and index_page. get_counts is for the
// program driving the crawl, once it wants search results.
// =============================================================================

mod memory;

use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::IndexError;
use crate::page::PageContent;

pub use memory::{count_terms, MemoryIndex};

#[async_trait]
pub trait Index: Send + Sync {
    /// Has this URL been indexed before? No side effects.
    async fn is_indexed(&self, url: &str) -> Result<bool, IndexError>;

    /// Store a page and make it searchable. Indexing the same URL again
    /// replaces what was stored for it.
    async fn index_page(&self, url: &str, content: &PageContent) -> Result<(), IndexError>;

    /// URL -> number of times `term` occurs on that page
    async fn get_counts(&self, term: &str) -> Result<HashMap<String, usize>, IndexError>;
}
