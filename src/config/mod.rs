//! Configuration module for Casa-Ripple
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All values are fixed once the crawl starts.
//!
//! # Example
//!
//! ```no_run
//! use casa_ripple::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("casa-ripple.toml")).unwrap();
//! println!("Crawler will keep {} requests in flight", config.crawler.parallelism);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_START_URL};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
