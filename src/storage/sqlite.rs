use async_trait::async_trait;
use chrono::NaiveDateTime;
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

use super::WatchlistStore;
use crate::entity::{
    format_timestamp, parse_timestamp, WatchlistEntry, WatchlistError, DEFAULT_CHANGE,
    DEFAULT_PRICE, NEVER_UPDATED,
};
use crate::utils::normalize_symbol;

const CREATE_STOCKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    last_price TEXT NOT NULL DEFAULT '0',
    price_change TEXT NOT NULL DEFAULT '0',
    last_updated TEXT NOT NULL DEFAULT 'Never'
)";

/// Watchlist persisted in a single SQLite table named `stocks`.
#[derive(Clone)]
pub struct SqliteWatchlistStore {
    pool: SqlitePool,
}

impl SqliteWatchlistStore {
    /// Open (creating if missing) the database at `database_url`, e.g.
    /// `sqlite://watchlist.db`, and make sure the table exists.
    pub async fn connect(database_url: &str) -> Result<Self, WatchlistError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;

        info!("Opened watchlist database at {}", database_url);
        Ok(store)
    }

    /// Private in-memory database. A single never-expiring connection keeps
    /// the data alive for the lifetime of the store.
    pub async fn connect_in_memory() -> Result<Self, WatchlistError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// Create the `stocks` table if it does not exist. Safe to call any number of times.
    pub async fn init_schema(&self) -> Result<(), WatchlistError> {
        sqlx::query(CREATE_STOCKS_TABLE).execute(&self.pool).await?;
        debug!("Ensured stocks table exists");
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Check if a database file exists for the given url
    pub fn exists(database_url: &str) -> bool {
        let file_path = database_url
            .strip_prefix("sqlite://")
            .or_else(|| database_url.strip_prefix("sqlite:"))
            .unwrap_or(database_url);
        Path::new(file_path).exists()
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn entry_from_row(row: &SqliteRow) -> Result<WatchlistEntry, sqlx::Error> {
    let last_updated: String = row.try_get("last_updated")?;

    Ok(WatchlistEntry {
        symbol: row.try_get("symbol")?,
        last_price: row.try_get("last_price")?,
        price_change: row.try_get("price_change")?,
        last_updated: parse_timestamp(&last_updated),
    })
}

#[async_trait]
impl WatchlistStore for SqliteWatchlistStore {
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        self.init_schema().await?;

        let rows = sqlx::query(
            "SELECT symbol, last_price, price_change, last_updated FROM stocks ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            entries.push(entry_from_row(&row)?);
        }

        Ok(entries)
    }

    async fn get(&self, symbol: &str) -> Result<Option<WatchlistEntry>, WatchlistError> {
        self.init_schema().await?;

        let row = sqlx::query(
            "SELECT symbol, last_price, price_change, last_updated FROM stocks WHERE symbol = ?",
        )
        .bind(normalize_symbol(symbol))
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(entry_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn add(&self, symbol: &str) -> Result<bool, WatchlistError> {
        self.init_schema().await?;
        let symbol = normalize_symbol(symbol);

        let result = sqlx::query(
            "INSERT OR IGNORE INTO stocks (symbol, last_price, price_change, last_updated)
             VALUES (?, ?, ?, ?)",
        )
        .bind(&symbol)
        .bind(DEFAULT_PRICE)
        .bind(DEFAULT_CHANGE)
        .bind(NEVER_UPDATED)
        .execute(&self.pool)
        .await?;

        let inserted = result.rows_affected() == 1;
        if inserted {
            info!("Added {} to watchlist", symbol);
        }

        Ok(inserted)
    }

    async fn remove(&self, symbol: &str) -> Result<(), WatchlistError> {
        self.init_schema().await?;
        let symbol = normalize_symbol(symbol);

        let result = sqlx::query("DELETE FROM stocks WHERE symbol = ?")
            .bind(&symbol)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!("Removed {} from watchlist", symbol);
        }

        Ok(())
    }

    async fn update(
        &self,
        symbol: &str,
        price: &str,
        change: &str,
        timestamp: NaiveDateTime,
    ) -> Result<(), WatchlistError> {
        self.init_schema().await?;
        let symbol = normalize_symbol(symbol);

        let result = sqlx::query(
            "UPDATE stocks
             SET last_price = ?, price_change = ?, last_updated = ?
             WHERE symbol = ?",
        )
        .bind(price)
        .bind(change)
        .bind(format_timestamp(Some(timestamp)))
        .bind(&symbol)
        .execute(&self.pool)
        .await?;

        debug!(
            "Updated price for {}: price={}, change={}, rows={}",
            symbol,
            price,
            change,
            result.rows_affected()
        );

        Ok(())
    }
}
