//! URL frontiers with drain detection
//!
//! The crawl keeps two frontiers, one per page kind. Both share a
//! [`WorkTracker`] counting entries that are queued or being processed in
//! either frontier. A worker holding a [`Claim`] may push more work into any
//! frontier, so a frontier is only drained once its own queue is empty and
//! the shared count has reached zero.
//!
//! Counting happens on push (before the entry becomes visible) and on claim
//! drop (after the worker's own pushes), so the count never touches zero
//! while work can still appear.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;
use url::Url;

/// Which frontier an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrontierKind {
    /// Search-results pages carrying pagination and detail links
    Listing,
    /// Single-property pages that yield a record
    Detail,
}

impl fmt::Display for FrontierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing => write!(f, "listing"),
            Self::Detail => write!(f, "detail"),
        }
    }
}

/// Outstanding-work counter shared by all frontiers of one crawl
#[derive(Debug, Default)]
pub struct WorkTracker {
    outstanding: AtomicUsize,
    closed: AtomicBool,
    notify: Notify,
}

impl WorkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries queued or in flight across every frontier
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Stops handing out entries; idle workers wake up and exit
    ///
    /// Entries already claimed run to completion. Queued entries are abandoned
    /// and later pushes are refused.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    fn begin(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    fn finish(&self) {
        if self.outstanding.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.notify.notify_waiters();
        }
    }
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<Url>,
    in_flight: usize,
    enqueued: usize,
}

/// FIFO queue of URLs of one kind
#[derive(Debug)]
pub struct Frontier {
    kind: FrontierKind,
    state: Mutex<FrontierState>,
    tracker: Arc<WorkTracker>,
}

impl Frontier {
    pub fn new(kind: FrontierKind, tracker: Arc<WorkTracker>) -> Self {
        Self {
            kind,
            state: Mutex::new(FrontierState::default()),
            tracker,
        }
    }

    pub fn kind(&self) -> FrontierKind {
        self.kind
    }

    /// Enqueues a URL, returning false if the crawl has been closed
    pub fn push(&self, url: Url) -> bool {
        if self.tracker.is_closed() {
            tracing::debug!("Frontier closed, dropping {} entry {}", self.kind, url);
            return false;
        }

        self.tracker.begin();
        {
            let mut state = self.lock();
            tracing::trace!("Enqueued {} entry {}", self.kind, url);
            state.queue.push_back(url);
            state.enqueued += 1;
        }
        self.tracker.notify.notify_waiters();
        true
    }

    /// Waits for the next entry
    ///
    /// Returns None once the frontier is drained or the crawl was closed.
    pub async fn next(&self) -> Option<Claim<'_>> {
        loop {
            // Register interest before inspecting state so no wakeup is lost
            let notified = self.tracker.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.tracker.is_closed() {
                return None;
            }

            {
                let mut state = self.lock();
                if let Some(url) = state.queue.pop_front() {
                    state.in_flight += 1;
                    return Some(Claim {
                        frontier: self,
                        url,
                    });
                }
            }

            if self.tracker.outstanding() == 0 {
                return None;
            }

            notified.await;
        }
    }

    /// Entries waiting in this frontier's queue
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Entries of this frontier currently being processed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Total entries ever accepted by this frontier
    pub fn enqueued(&self) -> usize {
        self.lock().enqueued
    }

    /// Queue empty, nothing in flight here, and nothing in flight anywhere
    /// that could feed it
    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        state.queue.is_empty() && state.in_flight == 0 && self.tracker.outstanding() == 0
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// An entry being processed by a worker
///
/// Dropping the claim marks the entry complete, whatever the outcome.
#[derive(Debug)]
pub struct Claim<'a> {
    frontier: &'a Frontier,
    url: Url,
}

impl Claim<'_> {
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> FrontierKind {
        self.frontier.kind()
    }
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.frontier.lock().in_flight -= 1;
        self.frontier.tracker.finish();
    }
}
