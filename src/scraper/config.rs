use std::time::Duration;

pub const MEROLAGANI_URL: &str = "https://merolagani.com";
pub const SEARCH_INPUT_SELECTOR: &str = "#ctl00_AutoSuggest1_txtAutoSuggest";
pub const PRICE_SELECTOR: &str = "#ctl00_ContentPlaceHolder1_CompanyDetail1_lblMarketPrice";
pub const CHANGE_SELECTOR: &str = "#ctl00_ContentPlaceHolder1_CompanyDetail1_lblChange";

/// Where to search and how long to wait between steps of one lookup.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Page that hosts the symbol search box
    pub target_url: String,

    pub search_input_selector: String,
    pub price_selector: String,
    pub change_selector: String,

    /// Pause between typed characters so the autosuggest box keeps up
    pub keystroke_delay: Duration,

    /// Pause after typing, before pressing Enter
    pub pre_submit_delay: Duration,

    /// Fixed wait for the company page to load after submitting.
    /// The site exposes no readiness signal to poll instead.
    pub settle_delay: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            target_url: MEROLAGANI_URL.to_string(),
            search_input_selector: SEARCH_INPUT_SELECTOR.to_string(),
            price_selector: PRICE_SELECTOR.to_string(),
            change_selector: CHANGE_SELECTOR.to_string(),
            keystroke_delay: Duration::from_millis(100),
            pre_submit_delay: Duration::from_secs(1),
            settle_delay: Duration::from_secs(2),
        }
    }
}

impl ScraperConfig {
    /// Same selectors and url with every delay set to zero.
    pub fn without_delays(mut self) -> Self {
        self.keystroke_delay = Duration::ZERO;
        self.pre_submit_delay = Duration::ZERO;
        self.settle_delay = Duration::ZERO;
        self
    }
}
