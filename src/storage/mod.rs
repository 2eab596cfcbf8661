use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::entity::{WatchlistEntry, WatchlistError};

pub mod memory;
pub mod sqlite;

pub use memory::InMemoryWatchlistStore;
pub use sqlite::SqliteWatchlistStore;

/// Persistence for the tracked symbols and their last price snapshot.
///
/// Every operation normalizes the symbol it receives, so callers may pass
/// user input as typed. Business outcomes (duplicate add, unknown symbol) are
/// never errors; `Err` always means the backing store itself failed.
#[async_trait]
pub trait WatchlistStore: Send + Sync {
    /// All entries in insertion order.
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError>;

    async fn get(&self, symbol: &str) -> Result<Option<WatchlistEntry>, WatchlistError>;

    /// Returns `false` without touching the store if the symbol is already tracked.
    async fn add(&self, symbol: &str) -> Result<bool, WatchlistError>;

    /// No-op when the symbol is not tracked.
    async fn remove(&self, symbol: &str) -> Result<(), WatchlistError>;

    /// Overwrites price, change and timestamp together. No-op when the symbol is not tracked.
    async fn update(
        &self,
        symbol: &str,
        price: &str,
        change: &str,
        timestamp: NaiveDateTime,
    ) -> Result<(), WatchlistError>;
}
