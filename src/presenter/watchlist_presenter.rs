use crate::entity::SymbolFailure;
use crate::interactor::watchlist_interactor::{AddOutcome, WatchlistInteractor};
use crate::scraper::RefreshListener;
use crate::utils::normalize_symbol;
use crate::view::watchlist_view::WatchlistView;
use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use std::sync::Arc;

#[async_trait]
pub trait WatchlistPresenter: Send + Sync {
    async fn show_watchlist(&self) -> Result<()>;
    async fn show_entry_detail(&self, symbol: &str) -> Result<()>;
    async fn add_symbol(&self, symbol: &str) -> Result<()>;
    async fn remove_symbol(&self, symbol: &str) -> Result<()>;
    async fn prompt_for_symbol(&self) -> Result<()>;
    async fn refresh_watchlist(&self) -> Result<()>;
}

pub struct WatchlistPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> WatchlistPresenterImpl<I, V>
where
    I: WatchlistInteractor,
    V: WatchlistView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

// Forwards batch progress to the view
struct ViewRefreshListener<'a, V> {
    view: &'a V,
}

#[async_trait]
impl<'a, V> RefreshListener for ViewRefreshListener<'a, V>
where
    V: WatchlistView + Send + Sync,
{
    async fn symbol_started(&self, index: usize, total: usize, _symbol: &str) {
        if let Err(e) = self.view.display_refresh_progress(index + 1, total).await {
            warn!("Failed to display refresh progress: {}", e);
        }
    }

    async fn symbol_failed(&self, failure: &SymbolFailure) {
        if let Err(e) = self.view.display_warning(failure.warning()).await {
            warn!("Failed to display warning for {}: {}", failure.symbol, e);
        }
    }
}

#[async_trait]
impl<I, V> WatchlistPresenter for WatchlistPresenterImpl<I, V>
where
    I: WatchlistInteractor + Send + Sync,
    V: WatchlistView + Send + Sync,
{
    async fn show_watchlist(&self) -> Result<()> {
        match self.interactor.get_watchlist().await {
            Ok(watchlist) => {
                self.view.display_watchlist(watchlist).await?;
            }
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
            }
        }

        Ok(())
    }

    async fn show_entry_detail(&self, symbol: &str) -> Result<()> {
        match self.interactor.get_entry(symbol).await {
            Ok(Some(entry)) => {
                self.view.display_entry_detail(entry).await?;
            }
            Ok(None) => {
                self.view
                    .display_symbol_not_found(&normalize_symbol(symbol))
                    .await?;
            }
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
            }
        }

        Ok(())
    }

    async fn add_symbol(&self, symbol: &str) -> Result<()> {
        match self.interactor.add_symbol(symbol).await {
            Ok(AddOutcome::Added(symbol)) => {
                self.view.display_symbol_added(&symbol).await?;
            }
            Ok(AddOutcome::AlreadyTracked(symbol)) => {
                self.view.display_already_tracked(&symbol).await?;
            }
            Ok(AddOutcome::Invalid(input)) => {
                self.view.display_invalid_symbol(&input).await?;
                return Ok(());
            }
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
                return Ok(());
            }
        }

        self.show_watchlist().await
    }

    async fn remove_symbol(&self, symbol: &str) -> Result<()> {
        let symbol = normalize_symbol(symbol);

        match self.interactor.remove_symbol(&symbol).await {
            Ok(true) => {
                self.view.display_symbol_removed(&symbol).await?;
            }
            Ok(false) => {
                self.view.display_symbol_not_found(&symbol).await?;
            }
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
                return Ok(());
            }
        }

        self.show_watchlist().await
    }

    async fn prompt_for_symbol(&self) -> Result<()> {
        self.view.prompt_for_symbol().await
    }

    async fn refresh_watchlist(&self) -> Result<()> {
        let total = match self.interactor.get_watchlist().await {
            Ok(watchlist) => watchlist.len(),
            Err(e) => {
                self.view.display_error(e.to_string()).await?;
                return Ok(());
            }
        };

        if total == 0 {
            return self.view.display_empty_watchlist().await;
        }

        self.view.display_refresh_started(total).await?;

        let listener = ViewRefreshListener {
            view: self.view.as_ref(),
        };

        match self.interactor.refresh_prices(&listener).await {
            Ok(report) => {
                self.view
                    .display_refresh_finished(report.updated_count())
                    .await?;
            }
            Err(e) => {
                error!("Refresh failed: {}", e);
                self.view.display_error(e.to_string()).await?;
            }
        }

        // Always re-read so partial progress from a failed batch is shown too
        self.show_watchlist().await
    }
}
