use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::{BrowserLauncher, BrowserSession};
use crate::entity::WatchlistError;

/// Launch options for the headless browser.
#[derive(Debug, Clone)]
pub struct ChromiumOptions {
    pub headless: bool,
    pub executable: Option<PathBuf>,
}

impl Default for ChromiumOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
        }
    }
}

pub struct ChromiumLauncher {
    options: ChromiumOptions,
}

impl ChromiumLauncher {
    pub fn new(options: ChromiumOptions) -> Self {
        Self { options }
    }

    fn browser_config(&self) -> Result<BrowserConfig, WatchlistError> {
        // Sandbox and shared memory are unavailable in most containers
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disk-cache-size=0")
            .arg("--media-cache-size=0");

        if !self.options.headless {
            builder = builder.with_head();
        }

        if let Some(executable) = &self.options.executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(WatchlistError::Session)
    }
}

#[async_trait]
impl BrowserLauncher for ChromiumLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, WatchlistError> {
        let config = self.browser_config()?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| WatchlistError::Session(format!("Failed to launch browser: {}", e)))?;

        // The CDP connection only makes progress while its handler is polled
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler event error: {}", e);
                }
            }
            debug!("Browser handler finished");
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                if let Err(close_err) = browser.close().await {
                    warn!("Failed to close browser after page error: {}", close_err);
                }
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(WatchlistError::Session(format!("Failed to open page: {}", e)));
            }
        };

        info!("Browser launched");

        Ok(Box::new(ChromiumSession {
            browser: Some(browser),
            page: Some(page),
            handler_task: Some(handler_task),
        }))
    }
}

pub struct ChromiumSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler_task: Option<JoinHandle<()>>,
}

impl ChromiumSession {
    fn page(&self) -> Result<&Page, WatchlistError> {
        self.page
            .as_ref()
            .ok_or_else(|| WatchlistError::Session("browser session already closed".to_string()))
    }

    async fn first_element(&self, selector: &str) -> Result<Option<Element>, WatchlistError> {
        let elements = self
            .page()?
            .find_elements(selector)
            .await
            .map_err(WatchlistError::session)?;
        Ok(elements.into_iter().next())
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<(), WatchlistError> {
        info!("Navigating to {}", url);
        self.page()?
            .goto(url)
            .await
            .map_err(|e| WatchlistError::Session(format!("Failed to open {}: {}", url, e)))?;
        Ok(())
    }

    async fn clear_and_type(
        &mut self,
        selector: &str,
        text: &str,
        keystroke_delay: Duration,
    ) -> Result<bool, WatchlistError> {
        let input = match self.first_element(selector).await? {
            Some(input) => input,
            None => return Ok(false),
        };

        input.focus().await.map_err(WatchlistError::session)?;
        input
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(WatchlistError::session)?;

        for ch in text.chars() {
            input
                .type_str(ch.to_string())
                .await
                .map_err(WatchlistError::session)?;
            sleep(keystroke_delay).await;
        }

        Ok(true)
    }

    async fn press_enter(&mut self, selector: &str) -> Result<(), WatchlistError> {
        let input = self
            .first_element(selector)
            .await?
            .ok_or_else(|| WatchlistError::Session(format!("{} disappeared", selector)))?;

        input
            .press_key("Enter")
            .await
            .map_err(WatchlistError::session)?;
        Ok(())
    }

    async fn read_text(&mut self, selector: &str) -> Result<Option<String>, WatchlistError> {
        match self.first_element(selector).await? {
            Some(element) => element.inner_text().await.map_err(WatchlistError::session),
            None => Ok(None),
        }
    }

    async fn close(&mut self) -> Result<(), WatchlistError> {
        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }

        let result = match self.browser.take() {
            Some(mut browser) => {
                let closed = browser.close().await.map(|_| ());
                let _ = browser.wait().await;
                closed.map_err(WatchlistError::session)
            }
            None => Ok(()),
        };

        if let Some(task) = self.handler_task.take() {
            task.abort();
        }

        info!("Browser closed");
        result
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        // chromiumoxide kills a browser that was never closed when it is dropped
        if self.browser.is_some() {
            warn!("Browser session dropped without being closed");
        }
        if let Some(task) = self.handler_task.take() {
            task.abort();
        }
    }
}
