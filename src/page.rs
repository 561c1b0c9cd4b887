// src/page.rs
// =============================================================================
// PageContent is what a Fetcher hands back: the paragraph-like blocks of a
// page, in document order. Each block keeps its visible text (for indexing)
// and the raw href of every anchor inside it (for link extraction).
// =============================================================================

use serde::{Deserialize, Serialize};

/// One paragraph-equivalent unit of a page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    /// Visible text with whitespace collapsed
    pub text: String,
    /// Raw anchor targets, exactly as written in the markup
    pub anchors: Vec<String>,
}

impl ContentBlock {
    pub fn new(text: impl Into<String>, anchors: Vec<String>) -> Self {
        Self {
            text: text.into(),
            anchors,
        }
    }
}

/// Ordered blocks of a fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContent {
    pub blocks: Vec<ContentBlock>,
}

impl PageContent {
    pub fn new(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    // Every anchor target on the page: block order, then document order
    pub fn anchors(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(|block| block.anchors.iter().map(String::as_str))
    }
}
