//! Browser process wrapper
//!
//! Pairs a chromiumoxide [`Browser`] with its event handler task and the
//! temporary profile directory it was launched with.

use chromiumoxide::browser::Browser;
use std::path::PathBuf;
use tokio::task::JoinHandle;
use tracing::info;

use super::BrowserResult;
use crate::BrowserConfig;

/// Owns the browser, its handler task and its profile directory
///
/// The handler is aborted on drop. The profile directory is only removed
/// through [`BrowserWrapper::cleanup_temp_dir`], after Chrome has exited and
/// released its file handles.
pub struct BrowserWrapper {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserWrapper {
    pub(crate) fn new(browser: Browser, handler: JoinHandle<()>, user_data_dir: PathBuf) -> Self {
        Self {
            browser,
            handler,
            user_data_dir: Some(user_data_dir),
        }
    }

    pub(crate) fn browser(&self) -> &Browser {
        &self.browser
    }

    pub(crate) fn browser_mut(&mut self) -> &mut Browser {
        &mut self.browser
    }

    /// Remove the profile directory (blocking)
    ///
    /// Call only after `browser.wait()` has returned.
    pub fn cleanup_temp_dir(&mut self) {
        if let Some(path) = self.user_data_dir.take() {
            info!("Cleaning up temp directory: {}", path.display());
            if let Err(e) = std::fs::remove_dir_all(&path) {
                tracing::warn!(
                    "Failed to clean up temp directory {}: {}. Manual cleanup may be required.",
                    path.display(),
                    e
                );
            }
        }
    }
}

impl Drop for BrowserWrapper {
    fn drop(&mut self) {
        info!("Dropping BrowserWrapper - aborting handler task");
        self.handler.abort();

        if let Some(path) = self.user_data_dir.as_ref() {
            tracing::warn!(
                "BrowserWrapper dropped without explicit cleanup. \
                Temp directory will be orphaned: {}. \
                Call BrowserManager::shutdown() before dropping to ensure proper cleanup.",
                path.display()
            );
        }
    }
}

/// Launch the shared scan browser
///
/// Each process gets its own profile directory so that concurrent
/// `trust-scan` invocations never contend for a Chrome profile lock.
pub async fn launch_browser(config: &BrowserConfig) -> BrowserResult<(Browser, JoinHandle<()>, PathBuf)> {
    info!("Launching scan browser (headless: {})", config.headless);

    let user_data_dir = std::env::temp_dir().join(format!(
        "trust_scan_profile_{}_{}",
        std::process::id(),
        uuid::Uuid::new_v4().simple()
    ));

    let (browser, handler) =
        crate::browser_setup::launch_browser(config, Some(user_data_dir.clone())).await?;

    Ok((browser, handler, user_data_dir))
}
