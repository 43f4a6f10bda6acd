mod models;
mod scrapers;

use anyhow::{bail, Result};
use clap::Parser;
use scrapers::types::ScrapeConfig;
use scrapers::AirbnbScraper;
use std::path::PathBuf;
use tracing::{error, info, warn, Level};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Cities to scrape, as used in the site's search path (e.g. "Barcelona--Spain")
    cities: Vec<String>,

    /// Maximum listings to collect per city
    #[arg(short, long)]
    samples: Option<usize>,

    /// Directory to write the dataset to
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output file name
    #[arg(short, long)]
    name: Option<String>,

    /// JSON config file; command-line values take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chrome/Chromium binary to launch
    #[arg(long)]
    chrome: Option<PathBuf>,

    /// Seconds to wait for a page's render marker
    #[arg(long)]
    timeout: Option<u64>,
}

fn build_config(args: Args) -> Result<ScrapeConfig> {
    let base = match &args.config {
        Some(path) => ScrapeConfig::from_file(path)?,
        None => ScrapeConfig::default(),
    };

    let config = ScrapeConfig {
        cities: if args.cities.is_empty() {
            base.cities
        } else {
            args.cities
        },
        samples: args.samples.unwrap_or(base.samples),
        browser_path: args.chrome.or(base.browser_path),
        wait_timeout_secs: args.timeout.unwrap_or(base.wait_timeout_secs),
        output_dir: args.output.unwrap_or(base.output_dir),
        output_name: args.name.unwrap_or(base.output_name),
    };

    if config.cities.is_empty() {
        bail!("no cities given; pass them as arguments or through --config");
    }
    if config.samples == 0 {
        bail!("sample count must be positive");
    }

    Ok(config)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt().with_max_level(Level::INFO).init();

    let config = build_config(Args::parse())?;

    info!("🏠 Airbnb Scout - browser listing scraper");
    info!("==========================================");
    info!("Cities: {}", config.cities.join(", "));
    info!("");

    let mut scraper = AirbnbScraper::new(&config)?;
    scraper.collect_all(&config.cities, config.samples)?;

    if scraper.dataset().is_empty() {
        warn!("No listings were collected");
    }
    info!("✅ Collected {} listings", scraper.dataset().len());

    match scraper.dataset().export(&config.output_dir, &config.output_name) {
        Ok(path) => info!("💾 Saved dataset to {}", path.display()),
        Err(e) => error!("Export failed: {:#}", e),
    }

    Ok(())
}
