// src/index/memory.rs
// =============================================================================
// An inverted index kept in memory.
//
// For every indexed URL we keep a term counter: lowercase word -> count.
// Words are runs of alphanumeric characters; everything else separates them.
// A lookup for a term walks the counters and reports the pages where the
// count is non-zero.
//
// Rust concepts:
// - RwLock: many readers or one writer at a time; the trait methods take &self,
//   so the lock gives us the mutability we need behind a shared reference
// - map_err: turns a poisoned lock into IndexError::Poisoned
// - The entry API: counter.entry(word).or_insert(0) inserts on first sight
// =============================================================================

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use super::Index;
use crate::error::IndexError;
use crate::page::PageContent;

// word -> number of occurrences on one page
type TermCounter = HashMap<String, usize>;

// The index itself: URL -> that page's term counter
#[derive(Debug, Default)]
pub struct MemoryIndex {
    pages: RwLock<HashMap<String, TermCounter>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // Number of indexed pages
    //
    // A poisoned lock is reported like everywhere else, not read as "empty"
    pub fn len(&self) -> Result<usize, IndexError> {
        let pages = self.pages.read().map_err(|_| IndexError::Poisoned)?;
        Ok(pages.len())
    }

    pub fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.len()? == 0)
    }

    /// Indexed URLs, sorted
    pub fn indexed_urls(&self) -> Result<Vec<String>, IndexError> {
        let pages = self.pages.read().map_err(|_| IndexError::Poisoned)?;
        let mut urls: Vec<String> = pages.keys().cloned().collect();
        urls.sort();
        Ok(urls)
    }
}

#[async_trait]
impl Index for MemoryIndex {
    async fn is_indexed(&self, url: &str) -> Result<bool, IndexError> {
        let pages = self.pages.read().map_err(|_| IndexError::Poisoned)?;
        Ok(pages.contains_key(url))
    }

    async fn index_page(&self, url: &str, content: &PageContent) -> Result<(), IndexError> {
        // Counting happens before the write lock is taken
        let counter = count_terms(content);
        debug!(url, terms = counter.len(), "indexing page");

        let mut pages = self.pages.write().map_err(|_| IndexError::Poisoned)?;
        // insert() replaces any earlier counter for the same URL
        pages.insert(url.to_string(), counter);
        Ok(())
    }

    async fn get_counts(&self, term: &str) -> Result<HashMap<String, usize>, IndexError> {
        // Counters store lowercase words, so "The" and "the" are the same term
        let term = term.to_lowercase();
        let pages = self.pages.read().map_err(|_| IndexError::Poisoned)?;

        Ok(pages
            .iter()
            .filter_map(|(url, counter)| {
                counter
                    .get(&term)
                    .filter(|&&count| count > 0)
                    .map(|&count| (url.clone(), count))
            })
            .collect())
    }
}

// Counts the words of every block on a page
pub fn count_terms(content: &PageContent) -> TermCounter {
    let mut counter = TermCounter::new();

    for block in &content.blocks {
        let text = block.text.to_lowercase();
        // Any non-alphanumeric character ends a word ("cat," -> "cat")
        for word in text.split(|c: char| !c.is_alphanumeric()) {
            // Two separators in a row produce an empty piece; skip it
            if !word.is_empty() {
                *counter.entry(word.to_string()).or_insert(0) += 1;
            }
        }
    }

    counter
}
