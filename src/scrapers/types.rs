use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime configuration for a scraping run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Localities to scrape, as they appear in the site's search path
    /// (e.g. "Barcelona--Spain")
    pub cities: Vec<String>,
    /// Listings to collect per city
    #[serde(default = "default_samples")]
    pub samples: usize,
    /// Chrome/Chromium binary to launch; autodetected when unset
    #[serde(default)]
    pub browser_path: Option<PathBuf>,
    /// Seconds to wait for a page's render marker
    #[serde(default = "default_wait_timeout")]
    pub wait_timeout_secs: u64,
    /// Directory the dataset is written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Output file name; a `.csv` extension is added when missing
    #[serde(default = "default_output_name")]
    pub output_name: String,
}

fn default_samples() -> usize {
    100
}

fn default_wait_timeout() -> u64 {
    60
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_name() -> String {
    "airbnb_listings.csv".to_string()
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            cities: Vec::new(),
            samples: default_samples(),
            browser_path: None,
            wait_timeout_secs: default_wait_timeout(),
            output_dir: default_output_dir(),
            output_name: default_output_name(),
        }
    }
}

impl ScrapeConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}
