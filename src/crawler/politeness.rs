//! Per-domain politeness limiting
//!
//! Each domain gets a counting semaphore capping the requests in flight
//! against it. After a permit is granted the caller waits a random delay
//! drawn uniformly from `[0, max_delay]` before it may fetch.

use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A granted request slot for one domain
///
/// The slot is released when the permit is dropped, whatever the outcome of
/// the fetch and parse it guarded.
#[derive(Debug)]
pub struct Permit {
    domain: String,
    _permit: OwnedSemaphorePermit,
}

impl Permit {
    pub fn domain(&self) -> &str {
        &self.domain
    }
}

/// Caps concurrent in-flight requests per domain and injects jitter
#[derive(Debug)]
pub struct PolitenessLimiter {
    per_domain: usize,
    max_delay: Duration,
    domains: Mutex<HashMap<String, Arc<Semaphore>>>,
}

impl PolitenessLimiter {
    /// Creates a limiter allowing `per_domain` concurrent requests per domain
    pub fn new(per_domain: usize, max_delay: Duration) -> Self {
        Self {
            per_domain: per_domain.max(1),
            max_delay,
            domains: Mutex::new(HashMap::new()),
        }
    }

    pub fn per_domain(&self) -> usize {
        self.per_domain
    }

    /// Blocks until fewer than the cap are outstanding for `domain`, then
    /// sleeps the random politeness delay
    ///
    /// Returns None only if the domain's semaphore was closed.
    pub async fn acquire(&self, domain: &str) -> Option<Permit> {
        let permit = self.semaphore_for(domain).acquire_owned().await.ok()?;

        let delay = self.jitter();
        if !delay.is_zero() {
            tracing::trace!("Politeness delay of {:?} for {}", delay, domain);
            tokio::time::sleep(delay).await;
        }

        Some(Permit {
            domain: domain.to_string(),
            _permit: permit,
        })
    }

    /// Number of permits currently free for `domain`
    pub fn available(&self, domain: &str) -> usize {
        self.semaphore_for(domain).available_permits()
    }

    fn semaphore_for(&self, domain: &str) -> Arc<Semaphore> {
        let mut domains = self.domains.lock().unwrap_or_else(PoisonError::into_inner);
        domains
            .entry(domain.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.per_domain)))
            .clone()
    }

    fn jitter(&self) -> Duration {
        draw_delay(self.max_delay, &mut rand::thread_rng())
    }
}

/// Uniform delay in `[0, max_delay]` at millisecond resolution
fn draw_delay<R: Rng + ?Sized>(max_delay: Duration, rng: &mut R) -> Duration {
    let ceiling = max_delay.as_millis() as u64;
    if ceiling == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rng.gen_range(0..=ceiling))
}
