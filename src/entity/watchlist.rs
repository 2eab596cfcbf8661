use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Text stored in `last_updated` until the first successful fetch.
pub const NEVER_UPDATED: &str = "Never";

/// Format used for `last_updated` both on screen and in the database.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Price and change of a freshly added symbol.
pub const DEFAULT_PRICE: &str = "0";
pub const DEFAULT_CHANGE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    pub symbol: String,
    pub last_price: String,
    pub price_change: String,
    pub last_updated: Option<NaiveDateTime>,
}

impl WatchlistEntry {
    // Snapshot of a symbol that has never been fetched
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            last_price: DEFAULT_PRICE.to_string(),
            price_change: DEFAULT_CHANGE.to_string(),
            last_updated: None,
        }
    }

    pub fn is_never_updated(&self) -> bool {
        self.last_updated.is_none()
    }

    pub fn change_direction(&self) -> ChangeDirection {
        ChangeDirection::of(&self.price_change)
    }

    // Format last update time for display
    pub fn format_last_updated(&self) -> String {
        format_timestamp(self.last_updated)
    }
}

/// Sign of a price change string as printed by the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Up,
    Down,
    Flat,
}

impl ChangeDirection {
    pub fn of(change: &str) -> Self {
        let change = change.trim_start();
        if change.starts_with('+') {
            ChangeDirection::Up
        } else if change.starts_with('-') {
            ChangeDirection::Down
        } else {
            ChangeDirection::Flat
        }
    }

    pub fn marker(&self) -> &'static str {
        match self {
            ChangeDirection::Up => "🟢",
            ChangeDirection::Down => "🔴",
            ChangeDirection::Flat => "⚪",
        }
    }
}

pub fn format_timestamp(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format(TIMESTAMP_FORMAT).to_string(),
        None => NEVER_UPDATED.to_string(),
    }
}

/// Inverse of [`format_timestamp`]. Anything that is not a valid timestamp
/// (including the sentinel) reads back as never updated.
pub fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    if text == NEVER_UPDATED {
        return None;
    }
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT).ok()
}
