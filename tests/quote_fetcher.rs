mod common;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::sync::{Arc, Mutex};

use common::{fast_config, FakeLauncher, FakeSite};
use stock_watchlist_bot::entity::{
    FailureReason, SymbolFailure, WatchlistEntry, WatchlistError, NEVER_UPDATED,
};
use stock_watchlist_bot::scraper::{NoopListener, QuoteFetcher, RefreshListener};
use stock_watchlist_bot::storage::{InMemoryWatchlistStore, WatchlistStore};

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

async fn store_with(list: &[&str]) -> Arc<InMemoryWatchlistStore> {
    let store = Arc::new(InMemoryWatchlistStore::new());
    for symbol in list {
        store.add(symbol).await.unwrap();
    }
    store
}

#[derive(Default)]
struct RecordingListener {
    started: Mutex<Vec<(usize, usize, String)>>,
    failed: Mutex<Vec<String>>,
}

#[async_trait]
impl RefreshListener for RecordingListener {
    async fn symbol_started(&self, index: usize, total: usize, symbol: &str) {
        self.started
            .lock()
            .unwrap()
            .push((index, total, symbol.to_string()));
    }

    async fn symbol_failed(&self, failure: &SymbolFailure) {
        self.failed.lock().unwrap().push(failure.warning());
    }
}

#[tokio::test]
async fn missing_field_skips_only_that_symbol() {
    let store = store_with(&["A", "B", "C"]).await;
    let launcher = Arc::new(FakeLauncher::new(
        FakeSite::new()
            .quote("A", "100", "+1")
            .price_only("B", "200")
            .quote("C", "300", "-3"),
    ));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());
    let listener = RecordingListener::default();

    let report = fetcher
        .fetch(&symbols(&["A", "B", "C"]), &listener)
        .await
        .unwrap();

    assert_eq!(report.updated_count(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].symbol, "B");
    assert_eq!(report.failures[0].reason, FailureReason::FieldMissing("change"));

    let b = store.get("B").await.unwrap().unwrap();
    assert_eq!(b.last_price, "0");
    assert_eq!(b.price_change, "0");
    assert!(b.is_never_updated());

    let a = store.get("A").await.unwrap().unwrap();
    let c = store.get("C").await.unwrap().unwrap();
    assert_eq!((a.last_price.as_str(), a.price_change.as_str()), ("100", "+1"));
    assert_eq!((c.last_price.as_str(), c.price_change.as_str()), ("300", "-3"));

    // One timestamp for the whole batch
    assert_eq!(a.last_updated, report.timestamp);
    assert_eq!(c.last_updated, report.timestamp);

    assert_eq!(counters.launches(), 1);
    assert_eq!(counters.closes(), 1);
    assert_eq!(counters.searched(), symbols(&["A", "B", "C"]));

    let started = listener.started.lock().unwrap().clone();
    assert_eq!(
        started,
        vec![
            (0, 3, "A".to_string()),
            (1, 3, "B".to_string()),
            (2, 3, "C".to_string())
        ]
    );
    assert_eq!(
        listener.failed.lock().unwrap().clone(),
        vec!["Could not find data for B".to_string()]
    );
}

#[tokio::test]
async fn missing_search_box_is_a_per_symbol_failure() {
    let store = store_with(&["A", "B"]).await;
    let launcher = Arc::new(FakeLauncher::new(
        FakeSite::new()
            .quote("A", "100", "+1")
            .quote("B", "200", "+2")
            .without_search_box_for("A"),
    ));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());

    let report = fetcher
        .fetch(&symbols(&["A", "B"]), &NoopListener)
        .await
        .unwrap();

    assert_eq!(report.updated_count(), 1);
    assert_eq!(report.failures[0].reason, FailureReason::SearchInputMissing);
    assert_eq!(report.failures[0].warning(), "Could not find search bar for A");
    assert_eq!(store.get("A").await.unwrap().unwrap().last_price, "0");
    assert_eq!(store.get("B").await.unwrap().unwrap().last_price, "200");
    assert_eq!(counters.closes(), 1);
}

#[tokio::test]
async fn navigation_failure_closes_the_browser_once() {
    let store = store_with(&["A"]).await;
    let launcher = Arc::new(FakeLauncher::new(
        FakeSite::new().quote("A", "100", "+1").failing_navigation(),
    ));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());

    let result = fetcher.fetch(&symbols(&["A"]), &NoopListener).await;

    assert!(matches!(result, Err(WatchlistError::Session(_))));
    assert_eq!(counters.launches(), 1);
    assert_eq!(counters.closes(), 1);
    assert!(counters.searched().is_empty());
    assert_eq!(
        store.get("A").await.unwrap().unwrap().format_last_updated(),
        NEVER_UPDATED
    );
}

#[tokio::test]
async fn browser_error_on_one_symbol_does_not_stop_the_batch() {
    let store = store_with(&["A", "B", "C"]).await;
    let launcher = Arc::new(FakeLauncher::new(
        FakeSite::new()
            .quote("A", "100", "+1")
            .quote("C", "300", "-3")
            .crashing_on("B"),
    ));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());
    let listener = RecordingListener::default();

    let report = fetcher
        .fetch(&symbols(&["A", "B", "C"]), &listener)
        .await
        .unwrap();

    assert_eq!(report.updated_count(), 2);
    assert_eq!(
        report.failures[0].reason,
        FailureReason::Automation("target crashed".to_string())
    );
    assert_eq!(counters.closes(), 1);
    assert_eq!(counters.searched(), symbols(&["A", "B", "C"]));
    assert_eq!(store.get("A").await.unwrap().unwrap().last_price, "100");
    assert!(store.get("B").await.unwrap().unwrap().is_never_updated());
    assert_eq!(store.get("C").await.unwrap().unwrap().last_price, "300");
    assert_eq!(
        listener.failed.lock().unwrap().clone(),
        vec!["Error processing B: target crashed".to_string()]
    );
}

/// Delegates to an in-memory store but refuses to update one symbol.
struct FailingUpdateStore {
    inner: InMemoryWatchlistStore,
    broken: &'static str,
}

#[async_trait]
impl WatchlistStore for FailingUpdateStore {
    async fn list(&self) -> Result<Vec<WatchlistEntry>, WatchlistError> {
        self.inner.list().await
    }

    async fn get(&self, symbol: &str) -> Result<Option<WatchlistEntry>, WatchlistError> {
        self.inner.get(symbol).await
    }

    async fn add(&self, symbol: &str) -> Result<bool, WatchlistError> {
        self.inner.add(symbol).await
    }

    async fn remove(&self, symbol: &str) -> Result<(), WatchlistError> {
        self.inner.remove(symbol).await
    }

    async fn update(
        &self,
        symbol: &str,
        price: &str,
        change: &str,
        timestamp: NaiveDateTime,
    ) -> Result<(), WatchlistError> {
        if symbol == self.broken {
            return Err(WatchlistError::Storage(sqlx::Error::PoolClosed));
        }
        self.inner.update(symbol, price, change, timestamp).await
    }
}

#[tokio::test]
async fn storage_error_aborts_the_batch_and_closes_once() {
    let store = Arc::new(FailingUpdateStore {
        inner: InMemoryWatchlistStore::new(),
        broken: "B",
    });
    for symbol in ["A", "B", "C"] {
        store.add(symbol).await.unwrap();
    }
    let launcher = Arc::new(FakeLauncher::new(
        FakeSite::new()
            .quote("A", "100", "+1")
            .quote("B", "200", "+2")
            .quote("C", "300", "-3"),
    ));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());

    let result = fetcher
        .fetch(&symbols(&["A", "B", "C"]), &NoopListener)
        .await;

    assert!(matches!(result, Err(WatchlistError::Storage(_))));
    assert_eq!(counters.closes(), 1);
    assert_eq!(counters.searched(), symbols(&["A", "B"]));
    assert_eq!(store.get("A").await.unwrap().unwrap().last_price, "100");
    assert_eq!(store.get("C").await.unwrap().unwrap().last_price, "0");
}

#[tokio::test]
async fn launch_failure_never_closes() {
    let store = store_with(&["A"]).await;
    let launcher = Arc::new(FakeLauncher::new(FakeSite::new().failing_launch()));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store, fast_config());

    let result = fetcher.fetch(&symbols(&["A"]), &NoopListener).await;

    assert!(matches!(result, Err(WatchlistError::Session(_))));
    assert_eq!(counters.launches(), 0);
    assert_eq!(counters.closes(), 0);
}

#[tokio::test]
async fn empty_batch_does_not_launch() {
    let store = store_with(&[]).await;
    let launcher = Arc::new(FakeLauncher::new(FakeSite::new()));
    let counters = launcher.counters.clone();
    let fetcher = QuoteFetcher::new(launcher, store, fast_config());

    let report = fetcher.fetch(&[], &NoopListener).await.unwrap();

    assert!(report.is_empty());
    assert_eq!(report.updated_count(), 0);
    assert_eq!(counters.launches(), 0);
    assert_eq!(counters.closes(), 0);
}

#[tokio::test]
async fn symbol_removed_during_batch_is_not_recreated() {
    let store = store_with(&["A"]).await;
    let launcher = Arc::new(FakeLauncher::new(FakeSite::new().quote("B", "200", "+2")));
    let fetcher = QuoteFetcher::new(launcher, store.clone(), fast_config());

    // B was listed when the batch started but is no longer tracked
    let report = fetcher
        .fetch(&symbols(&["B"]), &NoopListener)
        .await
        .unwrap();

    assert_eq!(report.updated_count(), 1);
    assert!(store.get("B").await.unwrap().is_none());
    assert_eq!(store.list().await.unwrap().len(), 1);
}
