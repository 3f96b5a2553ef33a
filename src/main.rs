//! Etalase main entry point
//!
//! Command-line interface for the Etalase storefront listing harvester.

use anyhow::{bail, Context};
use clap::Parser;
use etalase::browser::WebDriverConnector;
use etalase::config::{load_config_with_hash, Config};
use etalase::target::classify_target;
use etalase::traverse::{start_traversal, TraversalRequest};
use etalase::TraversalMode;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Etalase: a browser-driven storefront listing harvester
///
/// Etalase drives a JS-rendered storefront or search-result page through
/// infinite scroll and pagination, extracting every product listing into
/// a timestamped CSV dataset.
#[derive(Parser, Debug)]
#[command(name = "etalase")]
#[command(version = "1.0.0")]
#[command(about = "A browser-driven storefront listing harvester", long_about = None)]
struct Cli {
    /// Storefront or search-result URL to traverse
    #[arg(value_name = "URL")]
    url: String,

    /// Also expand the sold-out section while loading (storefronts only)
    #[arg(long)]
    include_sold_out: bool,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config, classify the URL, and show the plan without
    /// opening a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    let config = match &cli.config {
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

    // The classifier assumes a well-formed URL on the configured site;
    // reject anything else up front.
    let target_url = Url::parse(&cli.url).context("invalid target URL")?;
    let base_url = Url::parse(&config.site.base_url).context("invalid base-url in config")?;
    if target_url.host_str() != base_url.host_str() {
        bail!(
            "target URL host {:?} does not match configured site {}",
            target_url.host_str(),
            config.site.base_url
        );
    }

    if cli.dry_run {
        handle_dry_run(&config, &target_url, cli.include_sold_out);
        return Ok(());
    }

    handle_traversal(config, cli.url, cli.include_sold_out).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("etalase=info,warn"),
            1 => EnvFilter::new("etalase=debug,info"),
            2 => EnvFilter::new("etalase=trace,debug"),
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

/// Handles the --dry-run mode: shows what would be traversed
fn handle_dry_run(config: &Config, target_url: &Url, include_sold_out: bool) {
    let target = classify_target(target_url);
    let effective_sold_out = include_sold_out && target.mode.sold_out_eligible();

    println!("=== Etalase Dry Run ===\n");

    println!("Target:");
    println!("  URL: {}", target_url);
    println!("  Mode: {:?}", target.mode);
    println!("  Identifier: {}", target.identifier);
    if let Some(keyword) = &target.keyword {
        println!("  Keyword: {}", keyword);
    }
    println!("  Sold-out expansion: {}", effective_sold_out);
    if include_sold_out && !effective_sold_out {
        println!("  (requested, but forced off for keyword search)");
    }

    println!("\nBrowser:");
    println!("  WebDriver: {}", config.browser.webdriver_url);
    println!("  Headless: {}", config.browser.headless);
    println!(
        "  Viewport: {}x{}",
        config.browser.window_width, config.browser.window_height
    );

    println!("\nTraversal:");
    println!(
        "  Page load timeout: {}s",
        config.traversal.page_load_timeout
    );
    println!(
        "  Control wait timeout: {}s",
        config.traversal.control_wait_timeout
    );
    println!("  Max scroll passes: {}", config.traversal.max_scroll_passes);
    println!(
        "  Scroll pause: {}-{}ms",
        config.traversal.scroll_pause_min_ms, config.traversal.scroll_pause_max_ms
    );
    println!(
        "  Page delay: {}-{}ms",
        config.traversal.page_delay_min_ms, config.traversal.page_delay_max_ms
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
    match target.mode {
        TraversalMode::Storefront => {
            println!("✓ Would traverse the '{}' storefront", target.identifier)
        }
        TraversalMode::KeywordSearch => println!(
            "✓ Would traverse search results for '{}'",
            target.keyword.as_deref().unwrap_or_default()
        ),
    }
}

/// Handles the main traversal operation
async fn handle_traversal(
    config: Config,
    url: String,
    include_sold_out: bool,
) -> anyhow::Result<()> {
    let factory = Arc::new(WebDriverConnector::new(config.browser.clone()));
    let config = Arc::new(config);

    let handle = start_traversal(
        config,
        factory,
        TraversalRequest {
            target_url: url,
            include_sold_out,
        },
    );

    let outcome = handle.wait().await;

    if !outcome.completed {
        bail!(
            "traversal failed after {} page(s); see log output",
            outcome.pages_visited
        );
    }

    match &outcome.output {
        Some(path) => println!(
            "✓ {} records over {} page(s) written to {}",
            outcome.record_count,
            outcome.pages_visited,
            path.display()
        ),
        None => println!(
            "✓ Traversal finished with no records; no dataset written"
        ),
    }

    Ok(())
}
