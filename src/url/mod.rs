//! URL handling module for Casa-Ripple
//!
//! URL identity throughout the crawl is the normalized string form: two links
//! are the same page iff their normalized strings are equal. The domain key
//! groups requests for the politeness limiter.

mod domain;
mod normalize;

pub use domain::{domain_key, extract_domain};
pub use normalize::{normalize_url, resolve_link};
