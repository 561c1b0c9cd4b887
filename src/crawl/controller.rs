// src/crawl/controller.rs
// =============================================================================
// The Crawler runs a crawl one step at a time.
//
// One step:
// 1. Take the next URL off the frontier (nothing left -> None)
// 2. In DedupAware mode, ask the index whether the URL is already there and
//    skip it if so (the URL is still consumed)
// 3. Fetch the page, index it, and push its internal links onto the frontier
// 4. Return the URL that was crawled
//
// Failures are never retried. A URL whose fetch or indexing fails has already
// left the frontier and does not come back, and none of its links are queued.
//
// Concurrency:
// step() takes &mut self, so there is at most one step in flight per Crawler.
// If several crawlers ever share one index, the is_indexed / index_page pair
// is not atomic: two of them can both see "not indexed" and both crawl the
// same page. That is harmless for this index (re-indexing replaces) but an
// index with side effects would need a compare-and-set primitive.
//
// Rust concepts:
// - Generics with trait bounds: Crawler<F: Fetcher, I: Index> works with any
//   fetcher and any index, including the fakes in the tests below
// - Arc: shared ownership of the index between the crawler and its caller
// - The ? operator: turns FetchError / IndexError into CrawlError via From
// =============================================================================

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::frontier::Frontier;
use super::links::{parse_absolute, LinkPolicy};
use crate::error::{ConfigError, CrawlError};
use crate::fetcher::Fetcher;
use crate::index::Index;
use crate::page::PageContent;

/// How a step treats URLs the index already has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlMode {
    /// Always fetch and index the dequeued URL. Results do not depend on what
    /// the index already holds, which keeps test runs reproducible.
    Unconditional,
    /// Skip URLs the index already has
    DedupAware,
}

// One crawl session
//
// The crawler owns its frontier and its fetcher outright. The index is behind
// an Arc because the caller keeps its own handle to run queries afterwards.
pub struct Crawler<F, I> {
    source: String,      // The seed URL this session started from
    frontier: Frontier,  // URLs waiting to be crawled, front = next
    policy: LinkPolicy,  // Which links count as internal
    fetcher: F,
    index: Arc<I>,
}

impl<F: Fetcher, I: Index> Crawler<F, I> {
    // Starts a session whose frontier holds only the seed URL
    //
    // Parameters:
    //   source: the seed URL, must be absolute http(s) with a host
    //   policy: which links to follow (see LinkPolicy::for_seed)
    //   fetcher: turns URLs into PageContent
    //   index: where crawled pages are stored
    //
    // Returns: Err(ConfigError::InvalidSeed) for relative or non-http seeds,
    // so nothing but absolute URLs ever reaches the frontier
    pub fn new(
        source: impl Into<String>,
        policy: LinkPolicy,
        fetcher: F,
        index: Arc<I>,
    ) -> Result<Self, ConfigError> {
        let source = source.into();
        parse_absolute(&source)?;

        // The seed is the first (and for now only) URL to visit
        let mut frontier = Frontier::new();
        frontier.offer(source.clone());

        Ok(Self {
            source,
            frontier,
            policy,
            fetcher,
            index,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn queue_size(&self) -> usize {
        self.frontier.size()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn policy(&self) -> &LinkPolicy {
        &self.policy
    }

    // Runs one crawl step
    //
    // Returns:
    //   Ok(Some(url)) = url was fetched and indexed
    //   Ok(None)      = the frontier is empty, or (DedupAware only) the URL at
    //                   the front was already indexed and has been dropped
    //   Err(_)        = fetching or indexing failed; the URL is dropped
    pub async fn step(&mut self, mode: CrawlMode) -> Result<Option<String>, CrawlError> {
        // poll() hands back None instead of failing when the queue is empty
        let url = match self.frontier.poll() {
            Some(url) => url,
            None => {
                debug!("frontier exhausted");
                return Ok(None);
            }
        };

        // && short-circuits: the index is only asked in DedupAware mode.
        // A failing is_indexed() leaves through the ? with the URL already gone.
        if mode == CrawlMode::DedupAware && self.index.is_indexed(&url).await? {
            debug!(url = %url, remaining = self.frontier.size(), "already indexed, skipping");
            return Ok(None);
        }

        if let Err(e) = self.crawl_page(&url).await {
            warn!(url = %url, error = %e, "crawl step failed, dropping url");
            return Err(e);
        }

        Ok(Some(url))
    }

    // Fetches a page, indexes it and queues its internal links
    //
    // Does not touch the frontier until both the fetch and the indexing have
    // succeeded.
    pub async fn crawl_page(&mut self, url: &str) -> Result<(), CrawlError> {
        // Each ? converts the collaborator's error into CrawlError and returns early
        let content = self.fetcher.fetch(url).await?;
        self.index.index_page(url, &content).await?;

        let queued = self.queue_internal_links(&content);
        info!(url, queued, frontier = self.frontier.size(), "indexed page");
        Ok(())
    }

    // Extracts the page's internal links and appends them to the frontier,
    // in extraction order. Returns how many were queued.
    pub fn queue_internal_links(&mut self, content: &PageContent) -> usize {
        let links = self.policy.extract(content);
        let count = links.len();
        // Frontier implements Extend, so this is a batch of offer() calls
        self.frontier.extend(links);
        count
    }

    // Calls step until a page is actually indexed
    //
    // Stops early when the frontier runs dry or after `max_steps` calls, and
    // returns None in both cases. Errors stop the loop and are returned.
    pub async fn step_until_indexed(
        &mut self,
        mode: CrawlMode,
        max_steps: usize,
    ) -> Result<Option<String>, CrawlError> {
        for _ in 0..max_steps {
            if self.frontier.is_empty() {
                break;
            }
            if let Some(url) = self.step(mode).await? {
                return Ok(Some(url));
            }
        }
        Ok(None)
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does step() return Option inside Result?
//    - Err means something broke (network, store)
//    - Ok(None) means "nothing was crawled this time", which is normal
//    - Ok(Some(url)) means one page made it into the index
//
// 2. Why &mut self on step()?
//    - step() pops from and pushes to the frontier, so it needs a mutable borrow
//    - The borrow checker refuses a second &mut borrow while one step is running
//
// 3. What does Arc::clone do?
//    - It bumps a reference count; the index itself is not copied
//    - The last Arc to be dropped frees the index
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FetchError, IndexError};
    use crate::index::MemoryIndex;
    use crate::page::ContentBlock;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const ORIGIN: &str = "https://site";
    const SEED: &str = "https://site/wiki/Start";

    // Serves canned pages; any other URL fails like a 404
    #[derive(Default)]
    struct ScriptedFetcher {
        pages: HashMap<String, PageContent>,
        calls: Arc<AtomicUsize>,
    }

    impl ScriptedFetcher {
        fn with_page(mut self, url: &str, anchors: &[&str]) -> Self {
            let block = ContentBlock::new(
                "the page text",
                anchors.iter().map(|a| a.to_string()).collect(),
            );
            self.pages.insert(url.to_string(), PageContent::new(vec![block]));
            self
        }

        fn call_counter(&self) -> Arc<AtomicUsize> {
            Arc::clone(&self.calls)
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
    }

    // An index whose writes always fail
    struct BrokenIndex;

    // An index that cannot even answer is_indexed
    struct UnreachableIndex;

    #[async_trait]
    impl Index for UnreachableIndex {
        async fn is_indexed(&self, _url: &str) -> Result<bool, IndexError> {
            Err(IndexError::Backend("connection refused".to_string()))
        }

        async fn index_page(&self, _url: &str, _content: &PageContent) -> Result<(), IndexError> {
            Ok(())
        }

        async fn get_counts(&self, _term: &str) -> Result<HashMap<String, usize>, IndexError> {
            Ok(HashMap::new())
        }
    }

    #[async_trait]
    impl Index for BrokenIndex {
        async fn is_indexed(&self, _url: &str) -> Result<bool, IndexError> {
            Ok(false)
        }

        async fn index_page(&self, _url: &str, _content: &PageContent) -> Result<(), IndexError> {
            Err(IndexError::Backend("disk full".to_string()))
        }

        async fn get_counts(&self, _term: &str) -> Result<HashMap<String, usize>, IndexError> {
            Ok(HashMap::new())
        }
    }

    fn crawler<I: Index>(fetcher: ScriptedFetcher, index: Arc<I>) -> Crawler<ScriptedFetcher, I> {
        Crawler::new(SEED, LinkPolicy::new(ORIGIN, "/wiki/"), fetcher, index).unwrap()
    }

    fn pending<F: Fetcher, I: Index>(crawler: &Crawler<F, I>) -> Vec<&str> {
        crawler.frontier().iter().collect()
    }

    #[test]
    fn test_new_session_holds_seed() {
        let c = crawler(ScriptedFetcher::default(), Arc::new(MemoryIndex::new()));
        assert_eq!(c.source(), SEED);
        assert_eq!(c.queue_size(), 1);
        assert_eq!(pending(&c), vec![SEED]);
    }

    #[test]
    fn test_new_rejects_relative_seed() {
        for seed in ["/wiki/Start", "wiki/Start", "ftp://site/wiki/Start"] {
            let result = Crawler::new(
                seed,
                LinkPolicy::new(ORIGIN, "/wiki/"),
                ScriptedFetcher::default(),
                Arc::new(MemoryIndex::new()),
            );
            assert!(matches!(result, Err(ConfigError::InvalidSeed { .. })), "{}", seed);
        }
    }

    #[test]
    fn test_policy_accessor() {
        let c = crawler(ScriptedFetcher::default(), Arc::new(MemoryIndex::new()));
        assert_eq!(c.policy().site_origin, ORIGIN);
        assert_eq!(c.policy().internal_prefix, "/wiki/");
    }

    #[tokio::test]
    async fn test_crawl_page_expands_seed() {
        let fetcher = ScriptedFetcher::default().with_page(
            SEED,
            &["/wiki/A", "https://other.site/x", "/wiki/B"],
        );
        let index = Arc::new(MemoryIndex::new());
        let mut c = crawler(fetcher, Arc::clone(&index));
        c.frontier.poll();

        c.crawl_page(SEED).await.unwrap();

        assert_eq!(pending(&c), vec!["https://site/wiki/A", "https://site/wiki/B"]);
        assert!(index.is_indexed(SEED).await.unwrap());
    }

    #[tokio::test]
    async fn test_unconditional_step_visits_indexed_url() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &[]);
        let calls = fetcher.call_counter();
        let index = Arc::new(MemoryIndex::new());
        index.index_page(SEED, &PageContent::default()).await.unwrap();
        let mut c = crawler(fetcher, index);

        let visited = c.step(CrawlMode::Unconditional).await.unwrap();

        assert_eq!(visited.as_deref(), Some(SEED));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dedup_aware_step_skips_indexed_url() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/A"]);
        let calls = fetcher.call_counter();
        let index = Arc::new(MemoryIndex::new());
        index.index_page(SEED, &PageContent::default()).await.unwrap();
        let mut c = crawler(fetcher, index);

        let visited = c.step(CrawlMode::DedupAware).await.unwrap();

        assert_eq!(visited, None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(c.queue_size(), 0);
    }

    #[tokio::test]
    async fn test_dedup_aware_step_visits_new_url() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/A"]);
        let mut c = crawler(fetcher, Arc::new(MemoryIndex::new()));

        let visited = c.step(CrawlMode::DedupAware).await.unwrap();

        assert_eq!(visited.as_deref(), Some(SEED));
        assert_eq!(pending(&c), vec!["https://site/wiki/A"]);
    }

    #[tokio::test]
    async fn test_exhausted_frontier_keeps_returning_none() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &[]);
        let mut c = crawler(fetcher, Arc::new(MemoryIndex::new()));
        c.step(CrawlMode::Unconditional).await.unwrap();

        for mode in [CrawlMode::Unconditional, CrawlMode::DedupAware, CrawlMode::Unconditional] {
            assert_eq!(c.step(mode).await.unwrap(), None);
            assert_eq!(c.queue_size(), 0);
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_drops_url() {
        // The seed links to a page the fetcher cannot serve
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/Missing", "/wiki/B"]);
        let index = Arc::new(MemoryIndex::new());
        let mut c = crawler(fetcher, Arc::clone(&index));
        c.step(CrawlMode::Unconditional).await.unwrap();
        assert_eq!(c.queue_size(), 2);

        let result = c.step(CrawlMode::Unconditional).await;

        assert!(matches!(
            result,
            Err(CrawlError::Fetch(FetchError::Status { status: 404, .. }))
        ));
        assert_eq!(pending(&c), vec!["https://site/wiki/B"]);
        assert!(!index.is_indexed("https://site/wiki/Missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_index_failure_propagates_without_queueing_links() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/A"]);
        let mut c = crawler(fetcher, Arc::new(BrokenIndex));

        let result = c.step(CrawlMode::DedupAware).await;

        assert!(matches!(result, Err(CrawlError::Index(IndexError::Backend(_)))));
        assert_eq!(c.queue_size(), 0);
    }

    #[tokio::test]
    async fn test_dedup_check_failure_propagates() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/A"]);
        let calls = fetcher.call_counter();
        let mut c = crawler(fetcher, Arc::new(UnreachableIndex));

        let result = c.step(CrawlMode::DedupAware).await;

        assert!(matches!(result, Err(CrawlError::Index(IndexError::Backend(_)))));
        // The seed was consumed and never fetched
        assert_eq!(c.queue_size(), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unconditional_step_never_asks_the_index() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/A"]);
        let mut c = crawler(fetcher, Arc::new(UnreachableIndex));

        let visited = c.step(CrawlMode::Unconditional).await.unwrap();

        assert_eq!(visited.as_deref(), Some(SEED));
        assert_eq!(pending(&c), vec!["https://site/wiki/A"]);
    }

    #[tokio::test]
    async fn test_breadth_first_order() {
        let fetcher = ScriptedFetcher::default()
            .with_page(SEED, &["/wiki/A", "/wiki/B"])
            .with_page("https://site/wiki/A", &["/wiki/C"])
            .with_page("https://site/wiki/B", &[]);
        let mut c = crawler(fetcher, Arc::new(MemoryIndex::new()));

        let mut visited = Vec::new();
        while let Some(url) = c.step(CrawlMode::Unconditional).await.unwrap() {
            visited.push(url);
            if visited.len() == 3 {
                break;
            }
        }

        assert_eq!(
            visited,
            vec![SEED, "https://site/wiki/A", "https://site/wiki/B"]
        );
        assert_eq!(pending(&c), vec!["https://site/wiki/C"]);
    }

    #[tokio::test]
    async fn test_step_until_indexed_skips_duplicates() {
        // The seed links to itself and to A
        let fetcher = ScriptedFetcher::default()
            .with_page(SEED, &["/wiki/Start", "/wiki/A"])
            .with_page("https://site/wiki/A", &[]);
        let calls = fetcher.call_counter();
        let mut c = crawler(fetcher, Arc::new(MemoryIndex::new()));
        c.step(CrawlMode::DedupAware).await.unwrap();

        let next = c.step_until_indexed(CrawlMode::DedupAware, 10).await.unwrap();

        assert_eq!(next.as_deref(), Some("https://site/wiki/A"));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_step_until_indexed_gives_up() {
        let fetcher = ScriptedFetcher::default().with_page(SEED, &["/wiki/Start"; 5]);
        let mut c = crawler(fetcher, Arc::new(MemoryIndex::new()));
        c.step(CrawlMode::DedupAware).await.unwrap();
        assert_eq!(c.queue_size(), 5);

        // Every queued URL is the seed, which is already indexed
        let next = c.step_until_indexed(CrawlMode::DedupAware, 3).await.unwrap();
        assert_eq!(next, None);
        assert_eq!(c.queue_size(), 2);

        let next = c.step_until_indexed(CrawlMode::DedupAware, 10).await.unwrap();
        assert_eq!(next, None);
        assert_eq!(c.queue_size(), 0);
    }
}
