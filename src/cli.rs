// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There is one subcommand today, `crawl`: start from a seed page, index a
// few pages reachable through internal links, then report where a term
// appears. Every knob of the crawl (link prefix, mode, normalization, HTTP
// fetcher settings) is a flag here; there is no config file.
// =============================================================================

use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};

use wiki_crawler::crawl::DEFAULT_INTERNAL_PREFIX;
use wiki_crawler::fetcher::DEFAULT_CONTENT_SELECTOR;
use wiki_crawler::{CrawlMode, FetcherConfig, Normalization};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to generate the parsing code
// `version` with no value reads the version from Cargo.toml
#[derive(Parser, Debug)]
#[command(
    name = "wiki-crawler",
    version,
    about = "Crawl a wiki breadth-first and count where a term appears",
    long_about = "wiki-crawler starts at a seed page, follows links that stay inside the site's \
                  article namespace (e.g. /wiki/), indexes every page it visits and finally \
                  reports how often a term occurs on each indexed page."
)]
pub struct Cli {
    // Holds whichever subcommand the user ran
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl from a seed page and print term counts
    ///
    /// Example: wiki-crawler crawl https://en.wikipedia.org/wiki/Rust_(programming_language) --pages 3
    Crawl(CrawlArgs),
}

// Arguments of the `crawl` subcommand
//
// clap::Args lets a plain struct be flattened into a subcommand, so the
// handler can take &CrawlArgs instead of a long list of parameters
#[derive(clap::Args, Debug)]
pub struct CrawlArgs {
    /// Seed page URL; its scheme and host become the site origin
    pub seed: String,

    /// Path prefix that marks a link as internal
    #[arg(long, default_value = DEFAULT_INTERNAL_PREFIX)]
    pub prefix: String,

    /// Whether to skip pages that are already indexed
    #[arg(long, value_enum, default_value_t = ModeArg::DedupAware)]
    pub mode: ModeArg,

    /// Number of pages to index after the seed
    #[arg(long, default_value_t = 1)]
    pub pages: usize,

    /// Give up looking for the next new page after this many steps
    #[arg(long, default_value_t = 100)]
    pub max_steps: usize,

    /// Term to look up once the crawl is done
    #[arg(long, default_value = "the")]
    pub term: String,

    /// CSS selector for the content blocks of a page
    #[arg(long, default_value = DEFAULT_CONTENT_SELECTOR)]
    pub selector: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Drop "#fragment" from discovered links
    #[arg(long)]
    pub strip_fragment: bool,

    /// Drop "?query" from discovered links
    #[arg(long)]
    pub strip_query: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,
}

// The --mode values
//
// ValueEnum turns variant names into kebab-case flag values:
// DedupAware -> "dedup-aware", Unconditional -> "unconditional"
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    /// Fetch every dequeued page, even if it is already indexed
    Unconditional,
    /// Skip pages the index already has
    DedupAware,
}

// The library's CrawlMode does not depend on clap, so the CLI keeps its own
// enum and converts with From
impl From<ModeArg> for CrawlMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Unconditional => CrawlMode::Unconditional,
            ModeArg::DedupAware => CrawlMode::DedupAware,
        }
    }
}

impl CrawlArgs {
    // Both switches off (the default) keeps discovered links exactly as written
    pub fn normalization(&self) -> Normalization {
        Normalization {
            strip_fragment: self.strip_fragment,
            strip_query: self.strip_query,
        }
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig {
            content_selector: self.selector.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            // Struct update syntax: every other field comes from the default
            ..FetcherConfig::default()
        }
    }
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Where do the default values come from?
//    - default_value = "..." is parsed like user input
//    - default_value_t = 1 uses a typed Rust value directly
//    - --prefix and --selector reuse the library's constants
//
// 2. Why doc comments (///) on the fields?
//    - clap uses them as the help text shown by --help
// -----------------------------------------------------------------------------
