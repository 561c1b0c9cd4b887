// src/fetcher/http.rs
// =============================================================================
// Downloads pages over HTTP and cuts them into content blocks.
//
// How it works:
// 1. GET the URL with a shared reqwest Client (timeout from FetcherConfig)
// 2. Reject non-2xx responses
// 3. Parse the body with scraper and select the content blocks
//    (by default the paragraphs of a MediaWiki article body)
// 4. For each block keep its text and the raw href of every <a> inside it
//
// The hrefs are NOT resolved against the page URL here. Deciding which links
// count as internal is the link extractor's job, and it works on raw targets.
//
// Rust concepts:
// - async fn in a trait impl: #[async_trait] rewrites it into a boxed future
// - Closures: request_error below builds the same error for two call sites
// - Iterator chains: select -> map -> collect builds the blocks in one pass
// =============================================================================

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use super::Fetcher;
use crate::error::FetchError;
use crate::page::{ContentBlock, PageContent};

// MediaWiki puts the article body in <div id="mw-content-text">;
// each <p> inside it becomes one content block
pub const DEFAULT_CONTENT_SELECTOR: &str = "div#mw-content-text p";

// "a[href]" means "all <a> tags that have an href attribute"
const ANCHOR_SELECTOR: &str = "a[href]";

// Settings for HttpFetcher, filled in from the command line

#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// CSS selector matching one element per content block
    pub content_selector: String,
    /// Per-request timeout, covering connect and body download
    pub timeout: Duration,
    /// Sent as the User-Agent header
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            content_selector: DEFAULT_CONTENT_SELECTOR.to_string(),
            timeout: Duration::from_secs(10),
            // env! reads the version from Cargo.toml at compile time
            user_agent: format!("wiki-crawler/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

// Fetches pages with one reqwest Client
//
// The Client holds a connection pool, so reusing it across fetches
// keeps connections to the same host open
pub struct HttpFetcher {
    client: Client,
    blocks: Selector,   // compiled content selector
    anchors: Selector,  // compiled "a[href]"
}

impl HttpFetcher {
    // Builds the client and compiles both selectors up front, so a typo in
    // --selector fails before the first request
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let blocks = compile(&config.content_selector)?;
        let anchors = compile(ANCHOR_SELECTOR)?;

        // Builder pattern: set options one call at a time, then build()
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;  // a tuple variant works as a function

        Ok(Self {
            client,
            blocks,
            anchors,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent, FetchError> {
        // Wraps a reqwest error together with the URL that caused it
        // The closure only borrows `url`, so it is Copy and can be used twice
        let request_error = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        // Send the GET request and wait for the response headers
        let response = self.client.get(url).send().await.map_err(request_error)?;

        // 2xx = success; anything else (404, 500, ...) is a fetch failure
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Download the body as text; this can also fail (timeout, bad encoding)
        let html = response.text().await.map_err(request_error)?;
        let content = select_blocks(&html, &self.blocks, &self.anchors);
        debug!(url, blocks = content.blocks.len(), "fetched page");
        Ok(content)
    }
}

// Parses an HTML document into PageContent using the given block selector
//
// Example:
//   html = "<div id='mw-content-text'><p>See <a href='/wiki/A'>A</a></p></div>"
//   result = [ContentBlock { text: "See A", anchors: ["/wiki/A"] }]
pub fn parse_page(html: &str, content_selector: &str) -> Result<PageContent, FetchError> {
    let blocks = compile(content_selector)?;
    let anchors = compile(ANCHOR_SELECTOR)?;
    Ok(select_blocks(html, &blocks, &anchors))
}

// Runs both selectors over a parsed document
fn select_blocks(html: &str, blocks: &Selector, anchors: &Selector) -> PageContent {
    // Parse the HTML into a DOM tree (html5ever under the hood)
    let document = Html::parse_document(html);

    let blocks = document
        .select(blocks)
        .map(|block| ContentBlock {
            text: block_text(block),
            // block.select() only searches inside this block, in document order
            anchors: block
                .select(anchors)
                // attr() returns Option<&str>; filter_map drops the None values
                .filter_map(|a| a.value().attr("href"))
                .map(str::to_string)
                .collect(),
        })
        .collect();

    PageContent::new(blocks)
}

// Joins the text nodes of an element and collapses runs of whitespace
fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

// Compiles a CSS selector
//
// Selector::parse returns Result; we map its error into ours instead of
// calling unwrap(), since the content selector comes from the user
fn compile(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|_| FetchError::Selector(selector.to_string()))
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why keep raw hrefs instead of resolving them?
//    - The internal-link rule looks at the href as written ("/wiki/...")
//    - Resolving first would turn "/wiki/A" and "https://site/wiki/A" into
//      the same string, and only the first one counts as internal
//
// 2. What does .text() give us?
//    - An iterator over every text node under the element, nested tags included
//    - "See <a>Cargo</a> too" yields "See ", "Cargo", " too"
//
// 3. Why compile selectors in new() and not in fetch()?
//    - Parsing a selector is work we only need to do once
//    - A bad --selector is reported at startup instead of on every page
// -----------------------------------------------------------------------------
