pub mod watchlist_interactor;
