//! Contact-Harvest main entry point
//!
//! This is the command-line interface for the Contact-Harvest pipeline.

use anyhow::Context;
use clap::Parser;
use contact_harvest::config::{load_config_with_hash, Config};
use contact_harvest::output::{print_summary, summarize};
use contact_harvest::pipeline::run_pipeline;
use contact_harvest::postal::{load_postal_codes, PostalCodeDirectory};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Contact-Harvest: finds French business contact pages per postal code
///
/// For every postal code of the reference data, Contact-Harvest queries a
/// search service, fetches the result pages, extracts phone numbers and
/// email addresses, and appends them to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "contact-harvest")]
#[command(version = "1.0.0")]
#[command(about = "Postal-code driven contact finder", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Load config and postal codes, show what would be queried, and exit
    #[arg(long, conflicts_with = "summary")]
    dry_run: bool,

    /// Summarize the existing output file and exit
    #[arg(long, conflicts_with = "dry_run")]
    summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;

    if cli.summary {
        return handle_summary(&config);
    }

    let http = reqwest::Client::new();
    let postal_codes = load_postal_codes(&http, &config.postal_codes.source)
        .await
        .context("Failed to load postal code reference data")?;

    if cli.dry_run {
        handle_dry_run(&config, &postal_codes);
        return Ok(());
    }

    handle_run(&config, postal_codes).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("contact_harvest=info,warn"),
            1 => EnvFilter::new("contact_harvest=debug,info"),
            2 => EnvFilter::new("contact_harvest=trace,debug"),
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

/// Loads the configuration file, or the defaults when none is given
fn load_configuration(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::info!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be queried
fn handle_dry_run(config: &Config, postal_codes: &PostalCodeDirectory) {
    println!("=== Contact-Harvest Dry Run ===\n");

    println!("Search:");
    println!("  Endpoint: {}", config.search.endpoint);
    println!("  Phrase: {}", config.search.phrase);
    println!(
        "  API key: {}",
        if config.search.api_key.is_empty() {
            "(empty)"
        } else {
            "(set)"
        }
    );

    println!("\nPipeline:");
    println!(
        "  Postal code workers: {}",
        config.pipeline.postal_code_workers
    );
    println!("  Link workers: {}", config.pipeline.link_workers);
    println!(
        "  Excluded extensions: {}",
        config.pipeline.excluded_extensions.join(", ")
    );
    println!(
        "  Retries: fetch {}, link {}, search {} ({}ms apart)",
        config.retry.fetch_attempts,
        config.retry.link_attempts,
        config.retry.search_attempts,
        config.retry.delay_ms
    );

    println!("\nOutput: {}", config.output.csv_path);

    println!("\nPostal codes ({}):", postal_codes.len());
    for entry in postal_codes.entries().iter().take(10) {
        println!("  - {} {}", entry.postal_code, entry.commune_name);
    }
    if postal_codes.len() > 10 {
        println!("  ... and {} more", postal_codes.len() - 10);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would run {} search queries", postal_codes.len());
}

/// Handles the --summary mode: reports on the existing output file
fn handle_summary(config: &Config) -> anyhow::Result<()> {
    let path = Path::new(&config.output.csv_path);
    println!("Output file: {}\n", path.display());

    let summary = summarize(path)
        .with_context(|| format!("Failed to summarize {}", path.display()))?;
    print_summary(&summary);

    Ok(())
}

/// Handles the main pipeline run
async fn handle_run(config: &Config, postal_codes: PostalCodeDirectory) -> anyhow::Result<()> {
    tracing::info!("Starting run over {} postal codes", postal_codes.len());

    match run_pipeline(config, postal_codes).await {
        Ok(()) => {
            tracing::info!("Run completed");
            Ok(())
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            Err(e.into())
        }
    }
}
