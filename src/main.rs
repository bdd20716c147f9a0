//! Gourmet-Scout main entry point
//!
//! This is the command-line interface for the Gourmet-Scout restaurant
//! ranking scraper.

use anyhow::Context;
use clap::Parser;
use gourmet_scout::config::{load_config_with_hash, Config};
use gourmet_scout::crawler::Pipeline;
use gourmet_scout::output::{MarkdownReport, ReportSink, TextReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Gourmet-Scout: a polite restaurant ranking scraper
///
/// Fetches the top-ranked restaurants of a search-results page together
/// with each restaurant's newest review. Requests are strictly sequential
/// and each one is followed by a politeness pause.
#[derive(Parser, Debug)]
#[command(name = "gourmet-scout")]
#[command(version)]
#[command(about = "A polite restaurant ranking scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in target when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error logging
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Number of ranked restaurants to take (1-10)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
    limit: Option<u8>,

    /// Also write the report as markdown to this path
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Show what would be fetched without sending any request
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in target");
            Config::default()
        }
    };

    if let Some(limit) = cli.limit {
        config.target.result_limit = usize::from(limit);
    }
    if let Some(path) = &cli.markdown {
        config.output.markdown_path = Some(path.display().to_string());
    }

    let mut pipeline = Pipeline::new(&config).context("failed to set up the scraper")?;

    if cli.dry_run {
        handle_dry_run(&config, &pipeline);
        return Ok(());
    }

    let report = pipeline.run().await;

    let stdout = std::io::stdout();
    TextReport::new(stdout.lock())
        .write_report(&report)
        .context("failed to write report")?;

    if let Some(path) = &config.output.markdown_path {
        MarkdownReport::new(path)
            .write_report(&report)
            .with_context(|| format!("failed to write markdown report to {}", path))?;
        tracing::info!("Markdown report written to {}", path);
    }

    if report.is_fatal() {
        std::process::exit(1);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so the report on stdout stays clean.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gourmet_scout=info,warn"),
            1 => EnvFilter::new("gourmet_scout=debug,info"),
            2 => EnvFilter::new("gourmet_scout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the plan without fetching
fn handle_dry_run(config: &Config, pipeline: &Pipeline) {
    println!("=== Gourmet-Scout Dry Run ===\n");

    println!("Target:");
    println!("  Listing URL: {}", pipeline.listing_url());
    println!("  Result limit: {}", config.target.result_limit);
    println!("  Review list suffix: {}", config.target.review_list_suffix);

    println!("\nFetcher:");
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Politeness delay: {}ms",
        config.fetcher.politeness_delay_ms
    );
    println!("  User agent: {}", config.user_agent.header_value());

    println!("\nSelectors:");
    let selectors = &config.selectors;
    println!("  Restaurant name: {}", selectors.restaurant_name.css());
    println!("  Rating: {}", selectors.rating.css());
    println!("  Area/genre: {}", selectors.area_genre.css());
    println!(
        "  Review summary: {} [{}]",
        selectors.review_summary.css(),
        selectors.detail_url_attribute
    );
    println!(
        "  Review comment: {} {}",
        selectors.review_comment.css(),
        selectors.comment_text
    );

    let max_requests = 1 + 2 * config.target.result_limit as u64;
    println!(
        "\n✓ At most {} requests, at least {:.1}s of politeness pauses",
        max_requests,
        (max_requests * config.fetcher.politeness_delay_ms) as f64 / 1000.0
    );
}
