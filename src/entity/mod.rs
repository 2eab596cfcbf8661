mod quote;
mod refresh_report;
mod state;
mod watchlist;
mod watchlist_error;

pub use quote::Quote;
pub use refresh_report::{FailureReason, RefreshReport, SymbolFailure};
pub use state::State;
pub use watchlist::{
    format_timestamp, parse_timestamp, ChangeDirection, WatchlistEntry, DEFAULT_CHANGE,
    DEFAULT_PRICE, NEVER_UPDATED, TIMESTAMP_FORMAT,
};
pub use watchlist_error::WatchlistError;
