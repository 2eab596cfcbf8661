pub mod chromium;
pub mod config;
pub mod quote_fetcher;

use async_trait::async_trait;
use std::time::Duration;

use crate::entity::WatchlistError;

pub use chromium::{ChromiumLauncher, ChromiumOptions, ChromiumSession};
pub use config::ScraperConfig;
pub use quote_fetcher::{NoopListener, QuoteFetcher, RefreshListener};

/// Starts browser sessions. A failed launch leaves nothing to clean up.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, WatchlistError>;
}

/// One live browser with a single open page.
///
/// Element lookups that find nothing are reported as `Ok(false)` /
/// `Ok(None)`; `Err` is reserved for the automation layer itself failing.
#[async_trait]
pub trait BrowserSession: Send {
    async fn goto(&mut self, url: &str) -> Result<(), WatchlistError>;

    /// Focus the input matching `selector`, clear it and type `text` one
    /// character at a time. Returns `false` if no such input exists.
    async fn clear_and_type(
        &mut self,
        selector: &str,
        text: &str,
        keystroke_delay: Duration,
    ) -> Result<bool, WatchlistError>;

    async fn press_enter(&mut self, selector: &str) -> Result<(), WatchlistError>;

    async fn read_text(&mut self, selector: &str) -> Result<Option<String>, WatchlistError>;

    /// Close the page and the browser. Called exactly once per session.
    async fn close(&mut self) -> Result<(), WatchlistError>;
}
