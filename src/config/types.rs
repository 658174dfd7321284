use serde::Deserialize;
use std::time::Duration;

/// First results page of the house-for-sale search in the Santiago region
pub const DEFAULT_START_URL: &str =
    "https://chilepropiedades.cl/propiedades/venta/casa/region-metropolitana-de-santiago-rm/0";

/// Main configuration structure for Casa-Ripple
///
/// Every key is optional; a missing file section falls back to its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Seed URL, the first Listing-frontier entry
    pub start_url: String,

    /// Maximum in-flight requests per domain, also the worker pool size per frontier
    pub parallelism: usize,

    /// Ceiling of the uniformly drawn delay injected before each request (milliseconds)
    pub random_delay_ms: u64,

    /// Per-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Extra attempts after a transport error
    pub max_retries: u32,

    /// Pause between retry attempts (milliseconds)
    pub retry_delay_ms: u64,

    /// Log a progress line every N extracted records
    pub progress_interval: usize,

    /// Re-enqueue pagination links even when already queued once
    pub revisit_listing_pages: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            parallelism: 6,
            random_delay_ms: 2000,
            request_timeout_secs: 30,
            max_retries: 0,
            retry_delay_ms: 1000,
            progress_interval: 10,
            revisit_listing_pages: false,
        }
    }
}

impl CrawlerConfig {
    pub fn random_delay(&self) -> Duration {
        Duration::from_millis(self.random_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub name: String,

    /// Version of the crawler
    pub version: String,

    /// URL with information about the crawler
    pub contact_url: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: "CasaRipple".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: None,
        }
    }
}

impl UserAgentConfig {
    /// Format: Name/Version (+ContactURL)
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!("{}/{} (+{})", self.name, self.version, contact),
            None => format!("{}/{}", self.name, self.version),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Path of the CSV file written after the crawl
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "propiedades.csv".to_string(),
        }
    }
}
