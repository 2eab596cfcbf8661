#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use stock_watchlist_bot::entity::WatchlistError;
use stock_watchlist_bot::scraper::config::{CHANGE_SELECTOR, PRICE_SELECTOR};
use stock_watchlist_bot::scraper::{BrowserLauncher, BrowserSession, ScraperConfig};

/// What the fake site shows for each symbol. Symbols without a page have
/// neither price nor change.
#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, (Option<String>, Option<String>)>,
    no_search_box: HashSet<String>,
    fail_navigation: bool,
    fail_launch: bool,
    fail_typing: HashSet<String>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quote(mut self, symbol: &str, price: &str, change: &str) -> Self {
        self.pages.insert(
            symbol.to_string(),
            (Some(price.to_string()), Some(change.to_string())),
        );
        self
    }

    pub fn price_only(mut self, symbol: &str, price: &str) -> Self {
        self.pages
            .insert(symbol.to_string(), (Some(price.to_string()), None));
        self
    }

    pub fn without_search_box_for(mut self, symbol: &str) -> Self {
        self.no_search_box.insert(symbol.to_string());
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn crashing_on(mut self, symbol: &str) -> Self {
        self.fail_typing.insert(symbol.to_string());
        self
    }
}

#[derive(Default)]
pub struct Counters {
    pub launches: AtomicUsize,
    pub closes: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub searched: Mutex<Vec<String>>,
}

impl Counters {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn searched(&self) -> Vec<String> {
        self.searched.lock().unwrap().clone()
    }
}

pub struct FakeLauncher {
    site: Arc<FakeSite>,
    pub counters: Arc<Counters>,
    // Optional pause inside each search, to let concurrent callers overlap
    search_pause: Duration,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            counters: Arc::new(Counters::default()),
            search_pause: Duration::ZERO,
        }
    }

    pub fn with_search_pause(mut self, pause: Duration) -> Self {
        self.search_pause = pause;
        self
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, WatchlistError> {
        if self.site.fail_launch {
            return Err(WatchlistError::Session("browser binary not found".to_string()));
        }

        self.counters.launches.fetch_add(1, Ordering::SeqCst);
        let active = self.counters.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(FakeSession {
            site: self.site.clone(),
            counters: self.counters.clone(),
            search_pause: self.search_pause,
            current: None,
            closed: false,
        }))
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    counters: Arc<Counters>,
    search_pause: Duration,
    current: Option<String>,
    closed: bool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, _url: &str) -> Result<(), WatchlistError> {
        if self.site.fail_navigation {
            return Err(WatchlistError::Session("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        Ok(())
    }

    async fn clear_and_type(
        &mut self,
        _selector: &str,
        text: &str,
        _keystroke_delay: Duration,
    ) -> Result<bool, WatchlistError> {
        self.counters.searched.lock().unwrap().push(text.to_string());

        if self.site.fail_typing.contains(text) {
            return Err(WatchlistError::Session("target crashed".to_string()));
        }
        if self.site.no_search_box.contains(text) {
            return Ok(false);
        }

        tokio::time::sleep(self.search_pause).await;
        self.current = Some(text.to_string());
        Ok(true)
    }

    async fn press_enter(&mut self, _selector: &str) -> Result<(), WatchlistError> {
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<Option<String>, WatchlistError> {
        let page = self
            .current
            .as_ref()
            .and_then(|symbol| self.site.pages.get(symbol));

        let text = match page {
            Some((price, _)) if selector == PRICE_SELECTOR => price.clone(),
            Some((_, change)) if selector == CHANGE_SELECTOR => change.clone(),
            _ => None,
        };
        Ok(text)
    }

    async fn close(&mut self) -> Result<(), WatchlistError> {
        assert!(!self.closed, "session closed twice");
        self.closed = true;
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
        self.counters.active.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn fast_config() -> ScraperConfig {
    ScraperConfig::default().without_delays()
}
