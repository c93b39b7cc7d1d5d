//! Site-Crawler main entry point
//!
//! This is the command-line interface for the Site-Crawler breadth-first crawler.

use clap::Parser;
use site_crawler::config::{load_config_with_hash, validate, Config, CrawlConfig};
use site_crawler::crawler::crawl;
use site_crawler::output::{print_statistics, write_json, JsonCollector};
use site_crawler::CrawlError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site-Crawler: a single-host breadth-first web crawler
///
/// Site-Crawler walks every page reachable from a seed URL on the same host
/// and writes the content of each visited page to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version)]
#[command(about = "A single-host breadth-first web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", required_unless_present = "url")]
    config: Option<PathBuf>,

    /// Seed URL (overrides the configuration file)
    #[arg(long)]
    url: Option<String>,

    /// Maximum number of pages to visit
    #[arg(long, conflicts_with = "no_page_limit")]
    max_pages: Option<usize>,

    /// Crawl without a page budget
    #[arg(long)]
    no_page_limit: bool,

    /// CSS selector narrowing the content recorded for each page
    #[arg(long)]
    selector: Option<String>,

    /// Path of the JSON output file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Stop the crawl after this many seconds
    #[arg(long)]
    max_duration_secs: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    handle_crawl(config, cli.max_duration_secs).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match (&cli.config, &cli.url) {
        (Some(path), _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, Some(url)) => Config::new(CrawlConfig::new(url.clone())),
        (None, None) => return Err("either a configuration file or --url is required".into()),
    };

    if let Some(url) = &cli.url {
        config.crawler.url = url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages_to_crawl = Some(max_pages);
    }
    if cli.no_page_limit {
        config.crawler.max_pages_to_crawl = None;
    }
    if let Some(selector) = &cli.selector {
        config.crawler.page_selector = Some(selector.clone());
    }
    if let Some(output) = &cli.output {
        config.output.path = output.to_string_lossy().into_owned();
    }

    validate(&config)?;
    Ok(config)
}

/// Cancels `cancel` on Ctrl-C or once `max_duration` has elapsed
fn spawn_cancellation(cancel: &CancellationToken, max_duration: Option<Duration>) {
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                match result {
                    Ok(()) => tracing::warn!("Interrupt received, stopping crawl"),
                    Err(e) => {
                        tracing::error!("Failed to listen for Ctrl-C: {}", e);
                        return;
                    }
                }
            }
            _ = token.cancelled() => return,
        }
        token.cancel();
    });

    if let Some(max_duration) = max_duration {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(max_duration) => {
                    tracing::warn!("Maximum crawl duration of {:?} reached, stopping crawl", max_duration);
                    token.cancel();
                }
                _ = token.cancelled() => {}
            }
        });
    }
}

/// Handles the main crawl operation
async fn handle_crawl(
    config: Config,
    max_duration_secs: Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting crawl at {}", config.crawler.url);
    match config.crawler.max_pages_to_crawl {
        Some(max) => tracing::info!("Page budget: {}", max),
        None => tracing::info!("Page budget: unlimited"),
    }

    let cancel = CancellationToken::new();
    spawn_cancellation(&cancel, max_duration_secs.map(Duration::from_secs));

    let mut collector = JsonCollector::with_page_budget(config.crawler.max_pages_to_crawl);
    let result = crawl(&config, &mut collector, &cancel).await;

    // Stop the signal and deadline tasks
    cancel.cancel();

    let output_path = Path::new(&config.output.path);
    let records = collector.into_records();
    if let Err(e) = write_json(&records, output_path, config.output.pretty) {
        let e = CrawlError::Output(e);
        tracing::error!("Failed to write {}: {}", output_path.display(), e);
        return Err(e.into());
    }
    tracing::info!("Wrote {} pages to {}", records.len(), output_path.display());

    match result {
        Ok(stats) => {
            tracing::info!("Crawl completed successfully");
            print_statistics(&stats);
            Ok(())
        }
        Err(e) if e.is_cancelled() => {
            tracing::warn!("Crawl cancelled after {} pages", records.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
