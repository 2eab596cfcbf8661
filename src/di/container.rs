use anyhow::{Context, Result};
use log::info;
use std::sync::Arc;
use teloxide::{types::ChatId, Bot};

use crate::interactor::watchlist_interactor::WatchlistInteractorImpl;
use crate::presenter::watchlist_presenter::WatchlistPresenterImpl;
use crate::scraper::{BrowserLauncher, ChromiumLauncher, QuoteFetcher, ScraperConfig};
use crate::settings::Settings;
use crate::storage::{InMemoryWatchlistStore, SqliteWatchlistStore, WatchlistStore};
use crate::view::watchlist_view::TelegramWatchlistView;

pub type TelegramWatchlistPresenter =
    WatchlistPresenterImpl<WatchlistInteractorImpl, TelegramWatchlistView>;

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Shared so that every chat goes through the same refresh lock
    watchlist_interactor: Arc<WatchlistInteractorImpl>,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(
        store: Arc<dyn WatchlistStore>,
        launcher: Arc<dyn BrowserLauncher>,
        scraper_config: ScraperConfig,
    ) -> Self {
        let quote_fetcher = Arc::new(QuoteFetcher::new(
            launcher,
            store.clone(),
            scraper_config,
        ));

        let watchlist_interactor = Arc::new(WatchlistInteractorImpl::new(store, quote_fetcher));

        Self {
            watchlist_interactor,
        }
    }

    /// Build the container from settings, picking the store backend
    pub async fn from_settings(settings: &Settings) -> Result<Self> {
        let store: Arc<dyn WatchlistStore> = match &settings.database_url {
            Some(database_url) => {
                info!("Using SQLite watchlist store");
                Arc::new(
                    SqliteWatchlistStore::connect(database_url)
                        .await
                        .context("Failed to open watchlist database")?,
                )
            }
            None => {
                info!("No database configured, keeping the watchlist in memory");
                Arc::new(InMemoryWatchlistStore::new())
            }
        };

        let launcher = Arc::new(ChromiumLauncher::new(settings.chromium_options()));

        Ok(Self::new(store, launcher, settings.scraper_config()))
    }

    // Accessor methods

    pub fn watchlist_interactor(&self) -> Arc<WatchlistInteractorImpl> {
        self.watchlist_interactor.clone()
    }

    /// Presenter rendering into the given chat
    pub fn watchlist_presenter(&self, bot: Bot, chat_id: ChatId) -> TelegramWatchlistPresenter {
        let view = Arc::new(TelegramWatchlistView::new(bot, chat_id));
        WatchlistPresenterImpl::new(self.watchlist_interactor(), view)
    }
}
