use crate::models::{Dataset, Listing};
use crate::scrapers::amenities::{self, AmenityFlags};
use crate::scrapers::browser::BrowserSession;
use crate::scrapers::extract;
use crate::scrapers::traits::ListingScraper;
use crate::scrapers::types::ScrapeConfig;
use anyhow::Result;
use scraper::{ElementRef, Html, Selector};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// The site never pages past this many results for one search, no matter
/// how many listings exist.
const DISPLAY_CAP: usize = 300;

const LISTING_CARD: &str = "div._fhph4u";
const NEXT_PAGE_LINK: &str = "a._za9j7e";

/// Render markers: results grid, detail-page map widget, amenities modal.
const RESULTS_MARKER: &str = "_1g5ss3l";
const DETAIL_MARKER: &str = "gmnoprint";
const AMENITIES_MARKER: &str = "_vzrbjl";

/// Browser-based scraper for Airbnb search results.
///
/// Walks the paginated results for a city, visits each listing's detail
/// page and amenities sub-page, and commits one dataset row per listing.
pub struct AirbnbScraper {
    session: BrowserSession,
    dataset: Dataset,
}

impl AirbnbScraper {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let session = BrowserSession::new(
            config.browser_path.clone(),
            Duration::from_secs(config.wait_timeout_secs),
        )?;
        Ok(Self {
            session,
            dataset: Dataset::new(),
        })
    }

    /// The accumulated rows.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Scrape every city in turn, fully sequentially.
    pub fn collect_all(&mut self, cities: &[String], samples: usize) -> Result<()> {
        let started = Instant::now();
        for city in cities {
            self.collect_city(city, samples)?;
        }
        info!(
            "All scraping is done! Time elapsed: {:?}",
            started.elapsed()
        );
        Ok(())
    }

    /// Scrape one city until the sample cap is reached or the pagination
    /// runs out. Both terminal paths release the browser session; the next
    /// city relaunches it lazily.
    pub fn collect_city(&mut self, city: &str, samples: usize) -> Result<()> {
        let started = Instant::now();
        let cap = effective_cap(samples);
        let card_sel = Selector::parse(LISTING_CARD).unwrap();
        let city_label = city.split("--").next().unwrap_or(city).to_string();
        let mut taken = 0usize;
        let mut url = Some(search_url(city));

        info!("Scraping {} (up to {} listings)...", city_label, cap);

        while let Some(page_url) = url {
            let source = self.session.page_source(&page_url, RESULTS_MARKER)?;
            let doc = Html::parse_document(&source);

            let cards: Vec<_> = doc.select(&card_sel).collect();
            debug!("Found {} listing cards on page", cards.len());

            for item in &cards {
                if taken >= cap {
                    self.session.release();
                    info!(
                        "{} scraping is done! {} listings in {:?}",
                        city_label,
                        taken,
                        started.elapsed()
                    );
                    return Ok(());
                }

                let record = self.collect_item(item, &city_label)?;
                self.dataset.append(&record);
                taken += 1;
            }

            url = find_next_page(&doc);
        }

        self.session.release();
        info!(
            "{} scraping is done! {} listings in {:?}",
            city_label,
            taken,
            started.elapsed()
        );
        Ok(())
    }

    /// Assemble one record: card fields first, then the detail page for
    /// coordinates and the amenities sub-page for the flags. A card without
    /// a link skips the follow-up fetches and leaves those fields unknown.
    fn collect_item(&mut self, item: &ElementRef<'_>, city: &str) -> Result<Listing> {
        let listing_url = extract::listing_url(item);
        let (bedrooms, studio) = extract::bedrooms(item);
        let (baths, shared_bath) = extract::baths(item);

        let mut latitude = None;
        let mut longitude = None;
        let mut flags = AmenityFlags::unknown();

        if let Some(detail_url) = listing_url.as_deref() {
            let detail_source = self.session.page_source(detail_url, DETAIL_MARKER)?;
            let detail = Html::parse_document(&detail_source);

            let (lat, lon) = extract::coordinates(&detail);
            latitude = lat;
            longitude = lon;

            if let Some(amenities_url) = extract::amenities_url(&detail) {
                let amenities_source =
                    self.session.page_source(&amenities_url, AMENITIES_MARKER)?;
                let amenities_doc = Html::parse_document(&amenities_source);
                flags = amenities::classify(&extract::amenities_text(&amenities_doc));
            }
        }

        Ok(Listing {
            title: extract::title(item),
            url: listing_url,
            city: Some(city.to_string()),
            location: extract::location(item),
            property_type: extract::property_type(item),
            latitude,
            longitude,
            price: extract::price(item),
            rating: extract::rating(item),
            reviews: extract::reviews(item),
            guests: extract::guests(item),
            studio,
            bedrooms,
            beds: extract::beds(item),
            baths,
            shared_bath,
            kitchen: flags.kitchen,
            wifi: flags.wifi,
            washer: flags.washer,
            tv: flags.tv,
            parking: flags.parking,
            refrigerator: flags.refrigerator,
        })
    }
}

impl ListingScraper for AirbnbScraper {
    fn source_name(&self) -> &'static str {
        "Airbnb"
    }

    fn collect(&mut self, cities: &[String], samples: usize) -> Result<()> {
        self.collect_all(cities, samples)
    }

    fn dataset(&self) -> &Dataset {
        &self.dataset
    }
}

fn search_url(city: &str) -> String {
    format!(
        "{}/s/{}/homes?tab_id=home_tab&refinement_paths%5B%5D=%2Fhomes\
         &flexible_trip_dates%5B%5D=july&flexible_trip_dates%5B%5D=june\
         &flexible_trip_dates%5B%5D=august&date_picker_type=flexible_dates\
         &flexible_trip_lengths%5B%5D=one_week",
        extract::BASE_URL,
        city
    )
}

/// Resolve the results page's own "next" link, or end the pagination.
fn find_next_page(doc: &Html) -> Option<String> {
    let next = Selector::parse(NEXT_PAGE_LINK).unwrap();
    doc.select(&next)
        .next()?
        .value()
        .attr("href")
        .map(extract::absolute_url)
}

fn effective_cap(samples: usize) -> usize {
    samples.min(DISPLAY_CAP)
}
