use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

/// Process-scoped dedup set for detail pages
///
/// Entries are keyed by the normalized URL string and are never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    seen: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `url` as visited, returning true iff this call inserted it
    ///
    /// Check and insert happen under one lock, so among concurrent callers
    /// with the same URL exactly one gets `true`.
    pub fn try_mark(&self, url: &Url) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_owned())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
