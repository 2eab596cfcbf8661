pub mod watchlist_presenter;
