//! Crawl scheduler: two frontiers, two worker pools
//!
//! This module handles:
//! - Seeding the listing frontier
//! - Spawning a fixed worker pool per frontier
//! - The per-entry pipeline: permit → fetch → parse → dispatch links → record
//! - Drain detection and the final hand-over of records
//!
//! Listing and detail workers run concurrently from the start. Waiting on a
//! [`CrawlHandle`] returns once both frontiers are drained.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{Claim, Frontier, FrontierKind, WorkTracker};
use crate::crawler::parser::{DiscoveredLink, PageParser};
use crate::crawler::politeness::{Permit, PolitenessLimiter};
use crate::crawler::sink::RecordSink;
use crate::crawler::visited::VisitedSet;
use crate::output::{CrawlStats, CrawlSummary};
use crate::property::PropertyRecord;
use crate::url::{domain_key, normalize_url};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// State shared by every worker of one crawl
struct Shared {
    tracker: Arc<WorkTracker>,
    listing: Frontier,
    detail: Frontier,
    /// Detail pages accepted for enqueue
    visited: VisitedSet,
    /// Listing pages accepted for enqueue, unused when revisits are allowed
    listing_seen: VisitedSet,
    revisit_listing_pages: bool,
    sink: RecordSink,
    limiter: PolitenessLimiter,
    fetcher: Fetcher,
    parser: Arc<dyn PageParser>,
    stats: CrawlStats,
    max_retries: u32,
    retry_delay: Duration,
    progress_interval: usize,
}

/// Records and numbers produced by a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Sink contents in completion order
    pub records: Vec<PropertyRecord>,
    pub summary: CrawlSummary,
}

/// Closes both frontiers of a running crawl
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tracker: Arc<WorkTracker>,
}

impl ShutdownHandle {
    /// Idle workers exit immediately; busy workers finish their current page
    pub fn shutdown(&self) {
        self.tracker.close();
    }

    pub fn is_shutdown(&self) -> bool {
        self.tracker.is_closed()
    }
}

/// Scheduler owns the crawl components until the worker pools are spawned
pub struct Scheduler {
    shared: Arc<Shared>,
    pool_size: usize,
}

impl Scheduler {
    /// Creates a scheduler
    ///
    /// # Arguments
    ///
    /// * `config` - Crawler configuration (parallelism, delay, retries)
    /// * `fetcher` - HTTP fetcher, already carrying the request timeout
    /// * `parser` - Page parser collaborator for the target site
    pub fn new(config: &CrawlerConfig, fetcher: Fetcher, parser: Arc<dyn PageParser>) -> Self {
        let tracker = Arc::new(WorkTracker::new());
        let limiter = PolitenessLimiter::new(config.parallelism, config.random_delay());
        let pool_size = limiter.per_domain();

        let shared = Shared {
            listing: Frontier::new(FrontierKind::Listing, tracker.clone()),
            detail: Frontier::new(FrontierKind::Detail, tracker.clone()),
            tracker,
            visited: VisitedSet::new(),
            listing_seen: VisitedSet::new(),
            revisit_listing_pages: config.revisit_listing_pages,
            sink: RecordSink::new(),
            limiter,
            fetcher,
            parser,
            stats: CrawlStats::new(),
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
            progress_interval: config.progress_interval.max(1),
        };

        Self {
            shared: Arc::new(shared),
            pool_size,
        }
    }

    /// Adds a start URL to the listing frontier
    pub fn seed(&self, url: &str) -> Result<(), CrawlError> {
        let url = normalize_url(url)?;
        tracing::info!("Seeding listing frontier with {}", url);
        self.shared.enqueue_listing(url);
        Ok(())
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tracker: self.shared.tracker.clone(),
        }
    }

    /// Spawns both worker pools and returns a handle to wait on
    pub fn spawn(self) -> CrawlHandle {
        let started_at = Utc::now();
        let mut listing_workers = JoinSet::new();
        let mut detail_workers = JoinSet::new();

        for id in 0..self.pool_size {
            listing_workers.spawn(worker(self.shared.clone(), FrontierKind::Listing, id));
            detail_workers.spawn(worker(self.shared.clone(), FrontierKind::Detail, id));
        }

        tracing::debug!(
            "Spawned {} listing and {} detail workers",
            self.pool_size,
            self.pool_size
        );

        CrawlHandle {
            shared: self.shared,
            listing_workers,
            detail_workers,
            started_at,
        }
    }

    /// Spawns the workers and waits until both frontiers drain
    pub async fn run(self) -> Result<CrawlOutcome, CrawlError> {
        self.spawn().wait().await
    }
}

/// A crawl whose worker pools are running
pub struct CrawlHandle {
    shared: Arc<Shared>,
    listing_workers: JoinSet<()>,
    detail_workers: JoinSet<()>,
    started_at: DateTime<Utc>,
}

impl CrawlHandle {
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tracker: self.shared.tracker.clone(),
        }
    }

    /// Blocks until both frontiers are drained (or closed) and no worker is
    /// mid-flight, then hands over a snapshot of the record sink
    pub async fn wait(mut self) -> Result<CrawlOutcome, CrawlError> {
        while let Some(joined) = self.listing_workers.join_next().await {
            joined?;
        }
        tracing::debug!("Listing frontier drained");

        while let Some(joined) = self.detail_workers.join_next().await {
            joined?;
        }
        tracing::debug!("Detail frontier drained");

        let shared = &self.shared;
        let records = shared.sink.snapshot();
        let abandoned = shared.listing.pending() + shared.detail.pending();
        let summary = shared
            .stats
            .summarize(records.len(), abandoned, self.started_at, Utc::now());

        tracing::info!(
            "Crawl finished: {} properties from {} listing and {} detail pages",
            records.len(),
            summary.listing_pages_fetched,
            summary.detail_pages_fetched
        );

        Ok(CrawlOutcome { records, summary })
    }
}

/// Worker loop: pull entries from one frontier until it drains
async fn worker(shared: Arc<Shared>, kind: FrontierKind, id: usize) {
    let frontier = shared.frontier(kind);
    while let Some(claim) = frontier.next().await {
        shared.process(&claim).await;
    }
    tracing::trace!("{} worker {} exiting", kind, id);
}

impl Shared {
    fn frontier(&self, kind: FrontierKind) -> &Frontier {
        match kind {
            FrontierKind::Listing => &self.listing,
            FrontierKind::Detail => &self.detail,
        }
    }

    /// Runs one entry through fetch, parse, link dispatch and record append
    ///
    /// Every failure is contained here: the entry is logged and dropped.
    async fn process(&self, claim: &Claim<'_>) {
        let url = claim.url();
        let kind = claim.kind();

        // Held until parsing is done
        let Some((content, _permit)) = self.fetch_politely(url, kind).await else {
            return;
        };

        let parsed = match self.parser.parse(url, kind, &content) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Skipping {} page: {}", kind, e);
                self.stats.record_parse_failure();
                return;
            }
        };

        self.dispatch_links(&parsed.links);

        if let Some(record) = parsed.record {
            let count = self.sink.append(record);
            tracing::info!("Property {}: {}", count, url);

            if count % self.progress_interval == 0 {
                tracing::info!(
                    "Progress: {} properties, {} listing / {} detail pages queued",
                    count,
                    self.listing.pending(),
                    self.detail.pending()
                );
            }
        }
    }

    /// Fetches under a politeness permit, retrying transient failures
    async fn fetch_politely(&self, url: &Url, kind: FrontierKind) -> Option<(String, Permit)> {
        let domain = domain_key(url);
        let mut attempt = 0;

        loop {
            let permit = self.limiter.acquire(&domain).await?;

            match kind {
                FrontierKind::Listing => tracing::info!("Visiting {}", url),
                FrontierKind::Detail => tracing::debug!("Visiting {}", url),
            }

            let error = match self.fetcher.fetch(url).await {
                Ok(content) => {
                    self.stats.record_fetch(kind);
                    return Some((content, permit));
                }
                Err(e) => e,
            };
            drop(permit);

            if attempt < self.max_retries && error.is_transient() && !self.tracker.is_closed() {
                attempt += 1;
                self.stats.record_retry();
                tracing::warn!(
                    "Request to {} failed ({}), retry {}/{}",
                    url,
                    error.cause,
                    attempt,
                    self.max_retries
                );
                tokio::time::sleep(self.retry_delay).await;
                continue;
            }

            tracing::warn!("Error requesting {}: {}", url, error.cause);
            self.stats.record_transport_error();
            return None;
        }
    }

    /// Routes discovered links to their frontier under their normalized identity
    fn dispatch_links(&self, links: &[DiscoveredLink]) {
        for link in links {
            let url = match normalize_url(link.url.as_str()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Ignoring {} link {}: {}", link.kind, link.url, e);
                    continue;
                }
            };

            match link.kind {
                FrontierKind::Listing => self.enqueue_listing(url),
                FrontierKind::Detail => {
                    if self.visited.try_mark(&url) {
                        self.detail.push(url);
                    } else {
                        self.stats.record_duplicate_detail();
                        tracing::trace!("Detail page already queued: {}", url);
                    }
                }
            }
        }
    }

    fn enqueue_listing(&self, url: Url) {
        if self.revisit_listing_pages || self.listing_seen.try_mark(&url) {
            self.listing.push(url);
        }
    }
}
