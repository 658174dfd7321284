//! Crawler module for listing-site traversal
//!
//! This module contains the concurrent crawl engine, including:
//! - Per-domain politeness limiting
//! - Detail-page deduplication
//! - HTTP fetching with a fixed timeout
//! - Listing and detail frontiers with drain detection
//! - The scheduler driving one worker pool per frontier
//! - The record sink collecting extracted properties

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod politeness;
mod scheduler;
mod sink;
mod visited;

pub use coordinator::{crawl_with_parser, run_crawl};
pub use fetcher::{build_http_client, Fetcher, TransportCause, TransportError};
pub use frontier::{Claim, Frontier, FrontierKind, WorkTracker};
pub use parser::{DiscoveredLink, PageParser, ParseError, ParsedPage};
pub use politeness::{Permit, PolitenessLimiter};
pub use scheduler::{CrawlHandle, CrawlOutcome, Scheduler, ShutdownHandle};
pub use sink::RecordSink;
pub use visited::VisitedSet;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client and the page parser
/// 2. Seed the listing frontier with the start URL
/// 3. Fetch listing and detail pages until both frontiers drain
/// 4. Export the records to CSV
pub async fn crawl(config: Config) -> Result<CrawlSummary, CrawlError> {
    run_crawl(config).await
}
