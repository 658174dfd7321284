//! Crawler coordinator - wires a full run together
//!
//! This module contains the top-level run that:
//! - Builds the HTTP fetcher and the listing-site page parser
//! - Seeds and runs the scheduler
//! - Turns Ctrl-C into a frontier shutdown
//! - Exports the collected records once the crawl has drained

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::PageParser;
use crate::crawler::scheduler::{CrawlOutcome, Scheduler};
use crate::output::{CrawlSummary, CsvExporter, Exporter};
use crate::site::ListingSiteParser;
use crate::CrawlError;
use std::path::Path;
use std::sync::Arc;

/// Runs a crawl with the given parser and returns its outcome without exporting
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `parser` - Page parser collaborator
pub async fn crawl_with_parser(
    config: &Config,
    parser: Arc<dyn PageParser>,
) -> Result<CrawlOutcome, CrawlError> {
    let fetcher = Fetcher::from_config(config)?;
    let scheduler = Scheduler::new(&config.crawler, fetcher, parser);
    scheduler.seed(&config.crawler.start_url)?;

    let handle = scheduler.spawn();
    let shutdown = handle.shutdown_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight pages");
            shutdown.shutdown();
        }
    });

    let outcome = handle.wait().await;
    interrupt.abort();
    outcome
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire run:
///
/// 1. Build the listing-site parser
/// 2. Crawl listing and detail frontiers until both drain
/// 3. Write every extracted record to the configured CSV file
///
/// Export failures are returned as errors; the output file is the purpose
/// of the run.
///
/// # Example
///
/// ```no_run
/// use casa_ripple::config::Config;
/// use casa_ripple::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(Config::default()).await?;
/// println!("{} properties", summary.records);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    let parser =
        ListingSiteParser::new().map_err(|e| CrawlError::ParserSetup(e.to_string()))?;

    tracing::info!("Starting crawl at {}", config.crawler.start_url);
    let outcome = crawl_with_parser(&config, Arc::new(parser)).await?;

    let path = Path::new(&config.output.csv_path);
    let written = CsvExporter::new(path).export(&outcome.records)?;
    tracing::info!("Saved {} properties to {}", written, path.display());

    Ok(outcome.summary)
}
