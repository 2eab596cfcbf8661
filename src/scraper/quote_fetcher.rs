use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, SubsecRound};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::time::sleep;

use super::{BrowserLauncher, BrowserSession, ScraperConfig};
use crate::entity::{FailureReason, Quote, RefreshReport, SymbolFailure, WatchlistError};
use crate::storage::WatchlistStore;

/// Progress callbacks for a running batch.
#[async_trait]
pub trait RefreshListener: Send + Sync {
    async fn symbol_started(&self, _index: usize, _total: usize, _symbol: &str) {}

    async fn symbol_failed(&self, _failure: &SymbolFailure) {}
}

pub struct NoopListener;

impl RefreshListener for NoopListener {}

enum SymbolOutcome {
    Fetched(Quote),
    Failed(SymbolFailure),
}

/// Looks up each symbol on the quote site and writes the result straight
/// back into the store.
pub struct QuoteFetcher {
    launcher: Arc<dyn BrowserLauncher>,
    store: Arc<dyn WatchlistStore>,
    config: ScraperConfig,
}

impl QuoteFetcher {
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        store: Arc<dyn WatchlistStore>,
        config: ScraperConfig,
    ) -> Self {
        Self {
            launcher,
            store,
            config,
        }
    }

    /// Run one batch over `symbols` in order.
    ///
    /// A symbol whose lookup fails (missing search box, missing fields or a
    /// browser error while searching) is recorded in
    /// `RefreshReport::failures` and the batch moves on. Launch, navigation
    /// and storage failures abort the batch; updates written before the
    /// failure are kept. The browser is closed exactly once on every path
    /// after a successful launch.
    pub async fn fetch(
        &self,
        symbols: &[String],
        listener: &dyn RefreshListener,
    ) -> Result<RefreshReport, WatchlistError> {
        if symbols.is_empty() {
            return Ok(RefreshReport::default());
        }

        info!("Launching browser to fetch {} symbols", symbols.len());
        let mut session = self.launcher.launch().await?;

        let result = self.run_batch(session.as_mut(), symbols, listener).await;

        if let Err(e) = session.close().await {
            warn!("Failed to close browser session: {}", e);
        }

        match &result {
            Ok(report) => info!(
                "Refresh finished: {} updated, {} failed",
                report.updated_count(),
                report.failures.len()
            ),
            Err(e) => error!("Refresh aborted: {}", e),
        }

        result
    }

    async fn run_batch(
        &self,
        session: &mut dyn BrowserSession,
        symbols: &[String],
        listener: &dyn RefreshListener,
    ) -> Result<RefreshReport, WatchlistError> {
        session.goto(&self.config.target_url).await?;

        let timestamp = Local::now().naive_local().trunc_subsecs(0);
        let mut report = RefreshReport {
            timestamp: Some(timestamp),
            ..RefreshReport::default()
        };

        for (index, symbol) in symbols.iter().enumerate() {
            listener.symbol_started(index, symbols.len(), symbol).await;

            let outcome = match self.fetch_symbol(session, symbol).await {
                Ok(outcome) => outcome,
                // A browser error during one lookup only costs that symbol
                Err(WatchlistError::Session(message)) => SymbolOutcome::Failed(
                    SymbolFailure::new(symbol.as_str(), FailureReason::Automation(message)),
                ),
                Err(e) => return Err(e),
            };

            match outcome {
                SymbolOutcome::Fetched(quote) => {
                    self.write_back(&quote, timestamp).await?;
                    report.updated.push(quote);
                }
                SymbolOutcome::Failed(failure) => {
                    warn!("{} ({})", failure.warning(), failure.reason);
                    listener.symbol_failed(&failure).await;
                    report.failures.push(failure);
                }
            }
        }

        Ok(report)
    }

    async fn fetch_symbol(
        &self,
        session: &mut dyn BrowserSession,
        symbol: &str,
    ) -> Result<SymbolOutcome, WatchlistError> {
        debug!("Searching for {}", symbol);

        let typed = session
            .clear_and_type(
                &self.config.search_input_selector,
                symbol,
                self.config.keystroke_delay,
            )
            .await?;
        if !typed {
            return Ok(SymbolOutcome::Failed(SymbolFailure::new(
                symbol,
                FailureReason::SearchInputMissing,
            )));
        }

        sleep(self.config.pre_submit_delay).await;
        session
            .press_enter(&self.config.search_input_selector)
            .await?;

        // No load event to wait on, so give the page a fixed time to settle
        sleep(self.config.settle_delay).await;

        let price = session.read_text(&self.config.price_selector).await?;
        let change = session.read_text(&self.config.change_selector).await?;

        let outcome = match (price, change) {
            (Some(price), Some(change)) => SymbolOutcome::Fetched(Quote {
                symbol: symbol.to_string(),
                price: price.trim().to_string(),
                change: change.trim().to_string(),
            }),
            (None, _) => {
                SymbolOutcome::Failed(SymbolFailure::new(symbol, FailureReason::FieldMissing("price")))
            }
            (_, None) => SymbolOutcome::Failed(SymbolFailure::new(
                symbol,
                FailureReason::FieldMissing("change"),
            )),
        };

        Ok(outcome)
    }

    async fn write_back(&self, quote: &Quote, timestamp: NaiveDateTime) -> Result<(), WatchlistError> {
        self.store
            .update(&quote.symbol, &quote.price, &quote.change, timestamp)
            .await?;
        debug!(
            "Stored {}: price={}, change={}",
            quote.symbol, quote.price, quote.change
        );
        Ok(())
    }
}
