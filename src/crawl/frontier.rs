// src/crawl/frontier.rs
// =============================================================================
// The frontier: URLs that have been discovered but not visited yet.
//
// It is a plain FIFO. Insertion order is visitation order, which gives a
// breadth-first crawl. The same URL may sit in the queue several times;
// whether a page was already visited is the index's question, asked when the
// URL comes off the front (see CrawlMode::DedupAware).
// =============================================================================

use std::collections::VecDeque;

#[derive(Debug, Clone, Default)]
pub struct Frontier {
    queue: VecDeque<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    // Appends a URL to the back of the queue
    pub fn offer(&mut self, url: impl Into<String>) {
        self.queue.push_back(url.into());
    }

    // Removes and returns the front URL, or None when the queue is empty
    pub fn poll(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    pub fn size(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending URLs, front first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.queue.iter().map(String::as_str)
    }
}

impl Extend<String> for Frontier {
    fn extend<T: IntoIterator<Item = String>>(&mut self, urls: T) {
        self.queue.extend(urls);
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why VecDeque?
//    - push_back() and pop_front() are both O(1)
//    - A Vec would need remove(0), which shifts every element
//
// 2. Why no HashSet of seen URLs?
//    - The index already knows what has been crawled
//    - Keeping a second copy here would grow without bound on large sites
// -----------------------------------------------------------------------------
