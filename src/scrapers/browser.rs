use anyhow::{Context, Result};
use headless_chrome::{Browser, LaunchOptions, Tab};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Zoom far out so lazily-rendered content lands inside the viewport.
const PAGE_ZOOM_JS: &str = "document.body.style.zoom='10%'";
const PAGE_SOURCE_JS: &str = "document.documentElement.outerHTML";

/// The single live headless-Chrome session.
///
/// Navigation and marker waits are best-effort: timeouts are logged and the
/// current document state is returned, so extraction downstream degrades to
/// missing values instead of failing the run. Only launching the browser
/// itself can error.
pub struct BrowserSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
    browser_path: Option<PathBuf>,
    wait_timeout: Duration,
}

impl BrowserSession {
    /// Launch a fresh browser session.
    ///
    /// `browser_path` overrides Chrome auto-detection; `wait_timeout` bounds
    /// how long each page load waits for its render marker.
    pub fn new(browser_path: Option<PathBuf>, wait_timeout: Duration) -> Result<Self> {
        let mut session = Self {
            browser: None,
            tab: None,
            browser_path,
            wait_timeout,
        };
        session.launch()?;
        Ok(session)
    }

    fn launch(&mut self) -> Result<()> {
        info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .sandbox(false)
            .path(self.browser_path.clone())
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open a browser tab")?;

        self.browser = Some(browser);
        self.tab = Some(tab);
        Ok(())
    }

    /// Whether the underlying browser process still answers.
    pub fn is_alive(&self) -> bool {
        match &self.browser {
            Some(browser) => browser.get_version().is_ok(),
            None => false,
        }
    }

    /// Drop the browser process. The next page load relaunches transparently.
    pub fn release(&mut self) {
        if self.browser.is_some() {
            debug!("Releasing browser session");
        }
        self.tab = None;
        self.browser = None;
    }

    fn ensure_alive(&mut self) -> Result<()> {
        if !self.is_alive() {
            self.launch()?;
        }
        Ok(())
    }

    /// Navigate to `url` and return the rendered page source.
    ///
    /// Waits up to the configured timeout for an element carrying
    /// `marker_class` before reading the document, then pauses a random
    /// 2-3 seconds between fetches.
    pub fn page_source(&mut self, url: &str, marker_class: &str) -> Result<String> {
        self.ensure_alive()?;
        let tab = self.tab.clone().context("browser session has no open tab")?;

        if let Err(e) = tab.navigate_to(url) {
            warn!("Navigation to {} failed: {}", url, e);
        } else if let Err(e) = tab.wait_until_navigated() {
            warn!("{} did not finish loading: {}", url, e);
        }

        let _ = tab.evaluate(PAGE_ZOOM_JS, false);

        let marker = format!(".{}", marker_class);
        if let Err(e) = tab.wait_for_element_with_custom_timeout(&marker, self.wait_timeout) {
            warn!("Timed out waiting for '{}' on {}: {}", marker, url, e);
        }

        let source = tab
            .evaluate(PAGE_SOURCE_JS, false)
            .ok()
            .and_then(|result| result.value)
            .and_then(|value| value.as_str().map(str::to_string))
            .unwrap_or_default();

        let pause = rand::thread_rng().gen_range(2..=3);
        thread::sleep(Duration::from_secs(pause));

        Ok(source)
    }
}
