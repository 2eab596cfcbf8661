pub mod watchlist_view;
