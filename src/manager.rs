//! Shared browser process for all scans in this process
//!
//! # Architecture
//!
//! `Arc<Mutex<Option<BrowserWrapper>>>`:
//! - lazy launch on the first page request
//! - health check on every acquisition, relaunch after a crash
//! - pages are handed out one per scan; scans never share a page
//! - explicit `shutdown()` closes Chrome and removes its profile
//!
//! The mutex is `tokio::sync::Mutex` because it is held across CDP awaits.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::BrowserConfig;
use crate::browser::{BrowserError, BrowserResult, BrowserWrapper, launch_browser};
use crate::page_extractor::{ChromePage, PageDriver, PageSource};
use crate::utils::ScanResult;

pub struct BrowserManager {
    browser: Arc<Mutex<Option<BrowserWrapper>>>,
    config: BrowserConfig,
}

impl BrowserManager {
    /// Browser is launched lazily on the first `open_page()`
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            browser: Arc::new(Mutex::new(None)),
            config,
        }
    }

    /// Get or launch the shared browser with health checking and auto-recovery
    ///
    /// 1. If a browser exists, probe it with the `Browser.getVersion` CDP command
    /// 2. If the probe fails, close the crashed instance and drop it
    /// 3. Launch a new one when none is cached
    pub async fn get_or_launch(&self) -> BrowserResult<Arc<Mutex<Option<BrowserWrapper>>>> {
        let mut guard = self.browser.lock().await;

        if let Some(wrapper) = guard.as_ref() {
            match wrapper.browser().version().await {
                Ok(_) => {
                    debug!("Browser health check passed, reusing existing browser");
                    drop(guard);
                    return Ok(self.browser.clone());
                }
                Err(e) => {
                    warn!("Browser health check failed: {}. Triggering recovery...", e);

                    if let Some(mut crashed_wrapper) = guard.take() {
                        // process may already be gone
                        let _ = crashed_wrapper.browser_mut().close().await;
                        let _ = crashed_wrapper.browser_mut().wait().await;
                        crashed_wrapper.cleanup_temp_dir();
                    }

                    info!("Crashed browser cleaned up, launching new instance");
                }
            }
        }

        info!("Launching browser (first time or after recovery)");
        let (browser, handler, user_data_dir) = launch_browser(&self.config).await?;
        *guard = Some(BrowserWrapper::new(browser, handler, user_data_dir));
        drop(guard);

        Ok(self.browser.clone())
    }

    /// Close Chrome, wait for it to exit, then remove its profile
    ///
    /// Dropping `BrowserWrapper` only aborts the handler task; without the
    /// explicit close and wait the Chrome process outlives the scan.
    /// Safe to call more than once.
    pub async fn shutdown(&self) -> anyhow::Result<()> {
        let mut guard = self.browser.lock().await;

        if let Some(mut wrapper) = guard.take() {
            info!("Shutting down browser");

            if let Err(e) = wrapper.browser_mut().close().await {
                warn!("Failed to close browser cleanly: {}", e);
            }

            if let Err(e) = wrapper.browser_mut().wait().await {
                warn!("Failed to wait for browser exit: {}", e);
            }

            wrapper.cleanup_temp_dir();
        }

        Ok(())
    }

    pub async fn is_browser_running(&self) -> bool {
        self.browser.lock().await.is_some()
    }
}

#[async_trait]
impl PageSource for BrowserManager {
    async fn open_page(&self) -> ScanResult<Box<dyn PageDriver>> {
        let browser_arc = self.get_or_launch().await?;
        let guard = browser_arc.lock().await;
        let wrapper = guard
            .as_ref()
            .ok_or_else(|| BrowserError::PageCreationFailed("Browser not available".into()))?;

        let page = wrapper
            .browser()
            .new_page("about:blank")
            .await
            .map_err(|e| BrowserError::PageCreationFailed(e.to_string()))?;

        debug!("Opened blank page for scan");
        Ok(Box::new(ChromePage::new(page)))
    }
}

impl Drop for BrowserManager {
    fn drop(&mut self) {
        // Not a clean shutdown; call shutdown().await first
        info!("BrowserManager dropping - browser will be cleaned up");
    }
}
