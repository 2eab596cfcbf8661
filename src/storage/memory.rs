use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::info;
use tokio::sync::RwLock;

use super::WatchlistStore;
use crate::entity::{WatchlistEntry, WatchlistError};
use crate::utils::normalize_symbol;

/// Watchlist kept in process memory. Lost on restart.
#[derive(Default)]
pub struct InMemoryWatchlistStore {
    entries: RwLock<Vec<WatchlistEntry>>,
}

impl InMemoryWatchlistStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WatchlistStore for InMemoryWatchlistStore {
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        Ok(self.entries.read().await.clone())
    }

    async fn get(&self, symbol: &str) -> Result<Option<WatchlistEntry>, WatchlistError> {
        let symbol = normalize_symbol(symbol);
        let entries = self.entries.read().await;
        Ok(entries.iter().find(|e| e.symbol == symbol).cloned())
    }

    async fn add(&self, symbol: &str) -> Result<bool, WatchlistError> {
        let symbol = normalize_symbol(symbol);
        let mut entries = self.entries.write().await;

        if entries.iter().any(|e| e.symbol == symbol) {
            return Ok(false);
        }

        info!("Added {} to in-memory watchlist", symbol);
        entries.push(WatchlistEntry::new(symbol));
        Ok(true)
    }

    async fn remove(&self, symbol: &str) -> Result<(), WatchlistError> {
        let symbol = normalize_symbol(symbol);
        self.entries.write().await.retain(|e| e.symbol != symbol);
        Ok(())
    }

    async fn update(
        &self,
        symbol: &str,
        price: &str,
        change: &str,
        timestamp: NaiveDateTime,
    ) -> Result<(), WatchlistError> {
        let symbol = normalize_symbol(symbol);
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.iter_mut().find(|e| e.symbol == symbol) {
            entry.last_price = price.to_string();
            entry.price_change = change.to_string();
            entry.last_updated = Some(timestamp);
        }

        Ok(())
    }
}
