//! Casa-Ripple main entry point
//!
//! This is the command-line interface for the Casa-Ripple listing crawler.

use anyhow::Context;
use casa_ripple::config::{load_config_with_hash, validate, Config};
use casa_ripple::crawler::crawl;
use casa_ripple::output::{print_summary, CrawlSummary};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Casa-Ripple: a polite real-estate listing crawler
///
/// Casa-Ripple walks the paginated search results of a listing site, visits
/// every property page once and writes the extracted properties to CSV.
#[derive(Parser, Debug)]
#[command(name = "casa-ripple")]
#[command(version)]
#[command(about = "A polite real-estate listing crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the seed listing URL
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Override the CSV output path
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let csv_path = config.output.csv_path.clone();
    let summary = crawl(config)
        .await
        .with_context(|| format!("crawl did not produce {}", csv_path))?;

    if !cli.quiet {
        print_summary(&summary);
    }
    if let Some(message) = completion_message(&summary, &csv_path, cli.quiet) {
        println!("{}", message);
    }

    Ok(())
}

/// Final line on stdout, None when running quietly
fn completion_message(summary: &CrawlSummary, csv_path: &str, quiet: bool) -> Option<String> {
    if quiet {
        return None;
    }
    Some(if summary.was_interrupted() {
        format!("⚠ Crawl interrupted, partial data saved to {}", csv_path)
    } else {
        format!("✓ Data saved to {}", csv_path)
    })
}

/// Installs the tracing subscriber
///
/// `RUST_LOG` wins over the verbosity flags when set.
fn setup_logging(verbose: u8, quiet: bool) {
    let directives = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "casa_ripple=info,warn",
        (false, 1) => "casa_ripple=debug,info",
        (false, 2) => "casa_ripple=trace,debug",
        (false, _) => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: prints the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Casa-Ripple Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Parallelism per domain: {}", config.crawler.parallelism);
    println!("  Random delay ceiling: {}ms", config.crawler.random_delay_ms);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Max retries: {}", config.crawler.max_retries);
    println!(
        "  Revisit listing pages: {}",
        config.crawler.revisit_listing_pages
    );

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}
