// src/lib.rs
// =============================================================================
// The crawl core: a frontier of pending URLs, a pure link extractor, and a
// controller that runs one fetch -> index -> enqueue step at a time.
//
// Layout:
// - page: the PageContent value type produced by fetchers
// - error: typed failures (fetch, index, configuration)
// - crawl: Frontier, link extraction and the Crawler controller
// - fetcher: the Fetcher trait plus an HTTP implementation
// - index: the Index trait plus an in-memory inverted index
// =============================================================================

pub mod crawl;
pub mod error;
pub mod fetcher;
pub mod index;
pub mod page;

pub use crawl::{extract_internal_links, CrawlMode, Crawler, Frontier, LinkPolicy, Normalization};
pub use error::{ConfigError, CrawlError, FetchError, IndexError};
pub use fetcher::{Fetcher, FetcherConfig, HttpFetcher};
pub use index::{Index, MemoryIndex};
pub use page::{ContentBlock, PageContent};
