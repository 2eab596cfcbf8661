use crate::entity::{RefreshReport, WatchlistEntry};
use crate::scraper::{QuoteFetcher, RefreshListener};
use crate::storage::WatchlistStore;
use crate::utils::{normalize_symbol, parse_symbol};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    Added(String),
    AlreadyTracked(String),
    Invalid(String),
}

#[async_trait]
pub trait WatchlistInteractor: Send + Sync {
    async fn get_watchlist(&self) -> Result<Vec<WatchlistEntry>>;
    async fn get_entry(&self, symbol: &str) -> Result<Option<WatchlistEntry>>;
    async fn add_symbol(&self, symbol: &str) -> Result<AddOutcome>;
    async fn remove_symbol(&self, symbol: &str) -> Result<bool>;
    async fn refresh_prices(&self, listener: &dyn RefreshListener) -> Result<RefreshReport>;
}

pub struct WatchlistInteractorImpl {
    store: Arc<dyn WatchlistStore>,
    fetcher: Arc<QuoteFetcher>,
    // Held for the whole batch so refreshes never overlap
    refresh_lock: Mutex<()>,
}

impl WatchlistInteractorImpl {
    pub fn new(store: Arc<dyn WatchlistStore>, fetcher: Arc<QuoteFetcher>) -> Self {
        Self {
            store,
            fetcher,
            refresh_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl WatchlistInteractor for WatchlistInteractorImpl {
    async fn get_watchlist(&self) -> Result<Vec<WatchlistEntry>> {
        self.store
            .list()
            .await
            .map_err(|e| anyhow!("Failed to get watchlist: {}", e))
    }

    async fn get_entry(&self, symbol: &str) -> Result<Option<WatchlistEntry>> {
        self.store
            .get(symbol)
            .await
            .map_err(|e| anyhow!("Failed to get watchlist entry: {}", e))
    }

    async fn add_symbol(&self, symbol: &str) -> Result<AddOutcome> {
        let symbol = match parse_symbol(symbol) {
            Some(symbol) => symbol,
            None => return Ok(AddOutcome::Invalid(symbol.trim().to_string())),
        };

        let added = self
            .store
            .add(&symbol)
            .await
            .map_err(|e| anyhow!("Failed to add to watchlist: {}", e))?;

        if added {
            Ok(AddOutcome::Added(symbol))
        } else {
            info!("{} is already in the watchlist", symbol);
            Ok(AddOutcome::AlreadyTracked(symbol))
        }
    }

    async fn remove_symbol(&self, symbol: &str) -> Result<bool> {
        let symbol = normalize_symbol(symbol);

        let existed = self.get_entry(&symbol).await?.is_some();

        self.store
            .remove(&symbol)
            .await
            .map_err(|e| anyhow!("Failed to remove from watchlist: {}", e))?;

        Ok(existed)
    }

    async fn refresh_prices(&self, listener: &dyn RefreshListener) -> Result<RefreshReport> {
        let _guard = match self.refresh_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                info!("Waiting for the running refresh to finish");
                self.refresh_lock.lock().await
            }
        };

        let symbols: Vec<String> = self
            .get_watchlist()
            .await?
            .into_iter()
            .map(|entry| entry.symbol)
            .collect();

        if symbols.is_empty() {
            warn!("Refresh requested for an empty watchlist");
            return Ok(RefreshReport::default());
        }

        self.fetcher
            .fetch(&symbols, listener)
            .await
            .map_err(|e| anyhow!("Failed to refresh prices: {}", e))
    }
}
