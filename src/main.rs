// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, filtered by RUST_LOG, written to stderr)
// 2. Parse command-line arguments using clap
// 3. Crawl the seed page, then keep stepping until enough new pages are indexed
// 4. Print where the requested term occurs
// 5. Exit with proper code (0 = pages indexed, 1 = nothing beyond the seed, 2 = error)
//
// Rust concepts used:
// - async/await: the fetcher and the index are async, so the driver is too
// - Result<T, E> and ?: errors bubble up to main(), which turns them into exit code 2
// - Arc: the crawler and this file both hold the same MemoryIndex
// - Generics: next_new_page works with any Fetcher/Index, so tests can fake them
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;           // src/cli.rs - command-line parsing

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands, CrawlArgs};
use wiki_crawler::{CrawlError, CrawlMode, Crawler, Fetcher, HttpFetcher, Index, LinkPolicy, MemoryIndex};

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    // Logs go to stderr so that `--json` output on stdout stays machine-readable
    // RUST_LOG=debug shows every step; the default is info
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole anyhow context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// This is the main application logic
// Returns:
//   Ok(0) = at least one page indexed after the seed
//   Ok(1) = nothing new was found
//   Err = unexpected error (main turns it into exit code 2)
async fn run() -> Result<i32> {
    // Parse command-line arguments into our Cli struct
    // This will automatically handle --help, --version, etc.
    let cli = Cli::parse();

    // Match on which subcommand was used
    match cli.command {
        Commands::Crawl(args) => handle_crawl(&args).await,
    }
}

// One row of the term-count report
#[derive(Debug, Serialize)]
struct TermCount {
    url: String,
    count: usize,
}

// Handles the 'crawl' subcommand
async fn handle_crawl(args: &CrawlArgs) -> Result<i32> {
    // Validate the seed and work out which links count as internal
    // before any network traffic happens
    let policy = LinkPolicy::for_seed(&args.seed, &args.prefix)?
        .with_normalization(args.normalization());
    let fetcher = HttpFetcher::new(&args.fetcher_config()).context("Failed to set up fetcher")?;

    // Arc::new puts the index on the heap with a reference count
    // We keep one handle here for get_counts() and give a clone to the crawler
    let index = Arc::new(MemoryIndex::new());
    let mode = CrawlMode::from(args.mode);

    let mut crawler = Crawler::new(args.seed.as_str(), policy, fetcher, Arc::clone(&index))?;

    println!("🔍 Crawling from: {}", crawler.source());
    println!(
        "🔗 Following links under {}{}",
        crawler.policy().site_origin,
        crawler.policy().internal_prefix
    );

    // The seed page fills the frontier; without it there is nothing to crawl
    crawler
        .step(mode)
        .await
        .with_context(|| format!("Failed to crawl seed page {}", args.seed))?;
    println!("📄 Seed indexed, {} link(s) queued", crawler.queue_size());

    // Each round gets its own --max-steps budget
    let mut indexed = 0;
    for _ in 0..args.pages {
        match next_new_page(&mut crawler, mode, args.max_steps).await? {
            Some(url) => {
                indexed += 1;
                println!("   [{}/{}] {}", indexed, args.pages, url);
            }
            None => {
                println!("⚠️  No new page found ({} queued)", crawler.queue_size());
                break;
            }
        }
    }

    // Turn the URL -> count map into rows, most frequent first
    // Ties are broken by URL so the output is stable between runs
    let mut counts: Vec<TermCount> = index
        .get_counts(&args.term)
        .await?
        .into_iter()
        .map(|(url, count)| TermCount { url, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.url.cmp(&b.url)));

    print_counts(&args.term, &counts, args.json)?;

    if indexed > 0 {
        Ok(0)  // Exit code 0 = new pages indexed
    } else {
        Ok(1)  // Exit code 1 = nothing found beyond the seed
    }
}

// Steps until a new page is indexed
//
// Every call to step() costs one unit of the budget, whatever it returns:
// an indexed page, a skipped duplicate, or a fetch failure. So at most
// `max_steps` URLs leave the frontier per call.
//
// A page that fails to fetch is reported and skipped; the crawler has already
// dropped it from the frontier. Index failures are not skipped: the store is
// broken, so we stop.
//
// Returns: Some(url) for the new page, None if the budget or the frontier ran out
async fn next_new_page<F: Fetcher, I: Index>(
    crawler: &mut Crawler<F, I>,
    mode: CrawlMode,
    max_steps: usize,
) -> Result<Option<String>> {
    for _ in 0..max_steps {
        // An empty frontier would only keep returning None
        if crawler.queue_size() == 0 {
            break;
        }

        match crawler.step(mode).await {
            Ok(Some(url)) => return Ok(Some(url)),
            Ok(None) => continue,  // duplicate skipped, try the next URL
            Err(CrawlError::Fetch(e)) => {
                warn!(error = %e, "skipping page");
                eprintln!("  Warning: {}", e);
            }
            // e.into() wraps the CrawlError in an anyhow::Error
            Err(e) => return Err(e.into()),
        }
    }

    Ok(None)
}

// Prints the term counts either as a table or JSON
// Parameters:
//   term: the term that was looked up (for the summary line)
//   counts: rows sorted by count, highest first
//   json: whether to output JSON format
fn print_counts(term: &str, counts: &[TermCount], json: bool) -> Result<()> {
    if json {
        // Serialize the rows to a JSON array and print
        let json_output = serde_json::to_string_pretty(counts)?;
        println!("{}", json_output);
        return Ok(());
    }

    // Print table header
    println!();
    println!("{:<80} {:>8}", "URL", "COUNT");
    println!("{}", "=".repeat(89));

    for entry in counts {
        // Truncate URL if too long for display
        // chars() counts characters, not bytes, so we never cut a UTF-8 sequence
        let url_display = if entry.url.chars().count() > 77 {
            format!("{}...", entry.url.chars().take(77).collect::<String>())
        } else {
            entry.url.clone()
        };
        println!("{:<80} {:>8}", url_display, entry.count);
    }

    println!();
    println!("📊 '{}' appears on {} page(s)", term, counts.len());
    Ok(())
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why is there a loop around step()?
//    - In DedupAware mode a step can pop a URL that is already indexed
//    - That step returns None even though the frontier still has work
//    - So we keep stepping, up to --max-steps times, until a page is indexed
//
// 2. Why std::process::exit instead of returning from main?
//    - main() can't return an arbitrary exit code by itself
//    - exit() lets us use 0 / 1 / 2 like other command-line tools
// -----------------------------------------------------------------------------
