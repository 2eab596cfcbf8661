use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::scraper::config::{
    CHANGE_SELECTOR, MEROLAGANI_URL, PRICE_SELECTOR, SEARCH_INPUT_SELECTOR,
};
use crate::scraper::{ChromiumOptions, ScraperConfig};

/// Prefix of every environment variable read into [`Settings`]
pub const ENV_PREFIX: &str = "WATCHLIST";

/// Application configuration
///
/// Read from `WATCHLIST_*` environment variables, e.g.
/// `WATCHLIST_DATABASE_URL=sqlite://watchlist.db` or
/// `WATCHLIST_SETTLE_DELAY_MS=3000`.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite url. Without it the watchlist is only kept in memory.
    pub database_url: Option<String>,

    pub target_url: String,
    pub search_input_selector: String,
    pub price_selector: String,
    pub change_selector: String,

    pub keystroke_delay_ms: u64,
    pub pre_submit_delay_ms: u64,
    pub settle_delay_ms: u64,

    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
}

impl Settings {
    /// Load settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    pub fn load(environment: Environment) -> Result<Self> {
        let defaults = ScraperConfig::default();

        let settings = Config::builder()
            .set_default("target_url", MEROLAGANI_URL)?
            .set_default("search_input_selector", SEARCH_INPUT_SELECTOR)?
            .set_default("price_selector", PRICE_SELECTOR)?
            .set_default("change_selector", CHANGE_SELECTOR)?
            .set_default("keystroke_delay_ms", defaults.keystroke_delay.as_millis() as u64)?
            .set_default("pre_submit_delay_ms", defaults.pre_submit_delay.as_millis() as u64)?
            .set_default("settle_delay_ms", defaults.settle_delay.as_millis() as u64)?
            .set_default("headless", true)?
            .add_source(environment.try_parsing(true))
            .build()
            .context("Failed to read configuration")?;

        settings
            .try_deserialize()
            .context("Invalid configuration")
    }

    pub fn scraper_config(&self) -> ScraperConfig {
        ScraperConfig {
            target_url: self.target_url.clone(),
            search_input_selector: self.search_input_selector.clone(),
            price_selector: self.price_selector.clone(),
            change_selector: self.change_selector.clone(),
            keystroke_delay: Duration::from_millis(self.keystroke_delay_ms),
            pre_submit_delay: Duration::from_millis(self.pre_submit_delay_ms),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }

    pub fn chromium_options(&self) -> ChromiumOptions {
        ChromiumOptions {
            headless: self.headless,
            executable: self.chrome_executable.clone(),
        }
    }
}
