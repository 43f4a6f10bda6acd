use crate::models::Dataset;
use anyhow::Result;

/// Common trait for all listing scrapers
/// This allows easy addition of new marketplaces behind the same contract
pub trait ListingScraper {
    /// Name of the marketplace this scraper targets
    fn source_name(&self) -> &'static str;

    /// Collect up to `samples` listings per city into the dataset
    fn collect(&mut self, cities: &[String], samples: usize) -> Result<()>;

    /// The rows accumulated so far
    fn dataset(&self) -> &Dataset;
}
