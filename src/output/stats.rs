//! Crawl statistics
//!
//! Workers bump the live counters in [`CrawlStats`]; once the crawl ends the
//! scheduler freezes them into a [`CrawlSummary`] for the final report.

use crate::crawler::FrontierKind;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by all workers
#[derive(Debug, Default)]
pub struct CrawlStats {
    listing_fetched: AtomicU64,
    detail_fetched: AtomicU64,
    transport_errors: AtomicU64,
    retries: AtomicU64,
    parse_failures: AtomicU64,
    duplicate_details: AtomicU64,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, kind: FrontierKind) {
        match kind {
            FrontierKind::Listing => self.listing_fetched.fetch_add(1, Ordering::Relaxed),
            FrontierKind::Detail => self.detail_fetched.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_transport_error(&self) {
        self.transport_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_duplicate_detail(&self) {
        self.duplicate_details.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetched(&self, kind: FrontierKind) -> u64 {
        match kind {
            FrontierKind::Listing => self.listing_fetched.load(Ordering::Relaxed),
            FrontierKind::Detail => self.detail_fetched.load(Ordering::Relaxed),
        }
    }

    pub fn transport_errors(&self) -> u64 {
        self.transport_errors.load(Ordering::Relaxed)
    }

    pub fn parse_failures(&self) -> u64 {
        self.parse_failures.load(Ordering::Relaxed)
    }

    /// Freezes the counters into a summary
    pub fn summarize(
        &self,
        records: usize,
        abandoned: usize,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> CrawlSummary {
        CrawlSummary {
            started_at,
            finished_at,
            listing_pages_fetched: self.fetched(FrontierKind::Listing),
            detail_pages_fetched: self.fetched(FrontierKind::Detail),
            transport_errors: self.transport_errors(),
            retries: self.retries.load(Ordering::Relaxed),
            parse_failures: self.parse_failures(),
            duplicate_details_skipped: self.duplicate_details.load(Ordering::Relaxed),
            records,
            abandoned,
        }
    }
}

/// Final numbers of one crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub listing_pages_fetched: u64,
    pub detail_pages_fetched: u64,
    pub transport_errors: u64,
    pub retries: u64,
    pub parse_failures: u64,
    pub duplicate_details_skipped: u64,
    /// Records in the sink when the crawl completed
    pub records: usize,
    /// Entries left queued because the crawl was shut down
    pub abandoned: usize,
}

impl CrawlSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    pub fn was_interrupted(&self) -> bool {
        self.abandoned > 0
    }
}

/// Prints the summary to stdout
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Casa-Ripple Crawl Summary ===\n");
    println!("Started:  {}", summary.started_at.to_rfc3339());
    println!("Finished: {}", summary.finished_at.to_rfc3339());
    println!("Duration: {}s\n", summary.duration_seconds());

    println!("Listing pages fetched: {}", summary.listing_pages_fetched);
    println!("Detail pages fetched:  {}", summary.detail_pages_fetched);
    println!("Duplicate detail links skipped: {}", summary.duplicate_details_skipped);
    println!("Properties extracted:  {}", summary.records);
    println!();

    if summary.transport_errors > 0 || summary.parse_failures > 0 {
        println!("Errors:");
        println!("  Transport errors: {}", summary.transport_errors);
        println!("  Retries:          {}", summary.retries);
        println!("  Parse failures:   {}", summary.parse_failures);
        println!();
    }

    if summary.was_interrupted() {
        println!(
            "Crawl was interrupted; {} queued pages were not visited",
            summary.abandoned
        );
    }
}
