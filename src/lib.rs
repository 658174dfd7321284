//! Casa-Ripple: a polite real-estate listing crawler
//!
//! This crate walks the paginated search results of a property listing site,
//! follows every property detail link exactly once, extracts a structured
//! record from each detail page and exports the collected records as CSV.

pub mod config;
pub mod crawler;
pub mod output;
pub mod property;
pub mod site;
pub mod url;

use thiserror::Error;

/// Errors that end a crawl run
///
/// Per-page failures (transport, parse, field conversion) never surface
/// here; they are logged and the page is dropped.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    Url(#[from] UrlError),

    #[error("Could not build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Page parser setup failed: {0}")]
    ParserSetup(String),

    #[error("Export failed: {0}")]
    Output(#[from] output::OutputError),

    #[error("Crawl worker panicked or was cancelled: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Problems with the configuration file or its values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidUrl(String),
}

/// Reasons a string cannot become a page identity
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("cannot parse {0}")]
    Parse(String),

    #[error("scheme '{0}' is not http or https")]
    InvalidScheme(String),

    #[error("URL has no host")]
    MissingDomain,

    #[error("{0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, CrawlError>;

pub use config::Config;
pub use crawler::{FrontierKind, PageParser, ParsedPage, Scheduler};
pub use property::PropertyRecord;
pub use crate::url::{extract_domain, normalize_url};
