//! Page driver abstraction
//!
//! The scanner only talks to a page through [`PageDriver`]. [`ChromePage`]
//! is the chromiumoxide implementation; tests substitute an in-memory page.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::page::{Page, ScreenshotParams};
use chromiumoxide_cdp::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide_cdp::cdp::browser_protocol::page::{
    CaptureScreenshotFormat, GetLayoutMetricsParams, Viewport as ClipRect,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::constants::MAX_SCREENSHOT_EDGE_PX;
use crate::utils::{ScanError, ScanResult};

/// Emulated device metrics for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_scale")]
    pub device_scale_factor: f64,
    #[serde(default)]
    pub mobile: bool,
}

fn default_scale() -> f64 {
    1.0
}

impl Viewport {
    pub fn desktop() -> Self {
        use crate::utils::constants::{DESKTOP_VIEWPORT_HEIGHT, DESKTOP_VIEWPORT_WIDTH};
        Self {
            width: DESKTOP_VIEWPORT_WIDTH,
            height: DESKTOP_VIEWPORT_HEIGHT,
            device_scale_factor: 1.0,
            mobile: false,
        }
    }

    pub fn mobile() -> Self {
        use crate::utils::constants::{
            MOBILE_DEVICE_SCALE_FACTOR, MOBILE_VIEWPORT_HEIGHT, MOBILE_VIEWPORT_WIDTH,
        };
        Self {
            width: MOBILE_VIEWPORT_WIDTH,
            height: MOBILE_VIEWPORT_HEIGHT,
            device_scale_factor: MOBILE_DEVICE_SCALE_FACTOR,
            mobile: true,
        }
    }
}

/// One exclusively owned browser page
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn set_viewport(&self, viewport: Viewport) -> ScanResult<()>;

    /// Load `url` and wait for the load event; returns the post-redirect URL
    async fn navigate(&self, url: &str, timeout: Duration) -> ScanResult<String>;

    /// Evaluate a self-invoking script and return its JSON result
    async fn evaluate(&self, script: &str) -> ScanResult<serde_json::Value>;

    /// PNG of the page from the top, as tall as the content allows within
    /// [`MAX_SCREENSHOT_EDGE_PX`] device pixels
    async fn screenshot(&self) -> ScanResult<Vec<u8>>;

    async fn close(self: Box<Self>) -> ScanResult<()>;
}

/// Hands out fresh pages, one per scan
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn open_page(&self) -> ScanResult<Box<dyn PageDriver>>;
}

/// RAII guard around a chromiumoxide [`Page`]
///
/// `close()` is the normal path. If the guard is dropped without it (an
/// early return or a panic in the scan task) the page is closed from a task
/// spawned on the runtime captured at construction.
pub struct ChromePage {
    page: Option<Page>,
    url: String,
    /// `f64` bits of the device scale factor last applied by `set_viewport`
    device_scale_factor: AtomicU64,
    runtime_handle: tokio::runtime::Handle,
}

impl ChromePage {
    pub fn new(page: Page) -> Self {
        Self {
            page: Some(page),
            url: "about:blank".to_string(),
            device_scale_factor: AtomicU64::new(1.0_f64.to_bits()),
            runtime_handle: tokio::runtime::Handle::current(),
        }
    }

    fn page(&self) -> ScanResult<&Page> {
        live_page(self.page.as_ref())
    }

    fn device_scale_factor(&self) -> f64 {
        f64::from_bits(self.device_scale_factor.load(Ordering::Relaxed))
    }
}

fn live_page(page: Option<&Page>) -> ScanResult<&Page> {
    page.ok_or_else(|| ScanError::Page("page already closed".to_string()))
}

/// Clip from the page origin, cut so neither edge exceeds
/// [`MAX_SCREENSHOT_EDGE_PX`] once multiplied by the device scale factor
pub fn bounded_clip(content_width: f64, content_height: f64, device_scale_factor: f64) -> ClipRect {
    let scale = if device_scale_factor.is_finite() && device_scale_factor > 0.0 {
        device_scale_factor
    } else {
        1.0
    };
    let max_css = MAX_SCREENSHOT_EDGE_PX / scale;
    ClipRect {
        x: 0.0,
        y: 0.0,
        width: content_width.min(max_css).max(1.0),
        height: content_height.min(max_css).max(1.0),
        scale: 1.0,
    }
}

#[async_trait]
impl PageDriver for ChromePage {
    async fn set_viewport(&self, viewport: Viewport) -> ScanResult<()> {
        let params = SetDeviceMetricsOverrideParams::new(
            i64::from(viewport.width),
            i64::from(viewport.height),
            viewport.device_scale_factor,
            viewport.mobile,
        );
        self.page()?
            .execute(params)
            .await
            .map_err(|e| ScanError::Page(format!("viewport override failed: {e}")))?;
        self.device_scale_factor
            .store(viewport.device_scale_factor.to_bits(), Ordering::Relaxed);
        debug!(width = viewport.width, height = viewport.height, mobile = viewport.mobile, "Viewport set");
        Ok(())
    }

    async fn navigate(&self, url: &str, timeout: Duration) -> ScanResult<String> {
        let page = self.page()?;

        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| ScanError::navigation(url, format!("timeout after {}ms", timeout.as_millis())))?
            .map_err(|e| ScanError::navigation(url, e))?;

        page.wait_for_navigation()
            .await
            .map_err(|e| ScanError::navigation(url, format!("load did not complete: {e}")))?;

        // Final URL may differ from requested due to redirects
        let final_url = page
            .url()
            .await
            .map_err(|e| ScanError::navigation(url, e))?
            .unwrap_or_else(|| url.to_string());

        Ok(final_url)
    }

    async fn evaluate(&self, script: &str) -> ScanResult<serde_json::Value> {
        let result = self
            .page()?
            .evaluate(script)
            .await
            .map_err(|e| ScanError::HeuristicEvaluation(e.to_string()))?;
        Ok(result.into_value::<serde_json::Value>()?)
    }

    async fn screenshot(&self) -> ScanResult<Vec<u8>> {
        let page = self.page()?;
        // Explicit clip instead of full_page, which resets the device metrics override
        let metrics = page
            .execute(GetLayoutMetricsParams::default())
            .await
            .map_err(|e| ScanError::ScreenshotCapture(format!("layout metrics unavailable: {e}")))?;
        let content = &metrics.result.css_content_size;
        let clip = bounded_clip(content.width, content.height, self.device_scale_factor());
        debug!(width = clip.width, height = clip.height, "Screenshot clip");

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .clip(clip)
            .capture_beyond_viewport(true)
            .build();
        page.screenshot(params)
            .await
            .map_err(|e| ScanError::ScreenshotCapture(e.to_string()))
    }

    async fn close(self: Box<Self>) -> ScanResult<()> {
        let mut this = self;
        if let Some(page) = this.page.take() {
            if let Ok(Some(url)) = page.url().await {
                this.url = url;
            }
            page.close().await.map_err(|e| {
                ScanError::Page(format!("failed to close page for {}: {e}", this.url))
            })?;
            debug!("Page explicitly closed for {}", this.url);
        }
        Ok(())
    }
}

impl Drop for ChromePage {
    fn drop(&mut self) {
        if let Some(page) = self.page.take() {
            let url = std::mem::take(&mut self.url);
            self.runtime_handle.spawn(async move {
                if let Err(e) = page.close().await {
                    log::warn!("ChromePage drop cleanup failed for {}: {}", url, e);
                } else {
                    log::trace!("ChromePage drop cleanup succeeded for {}", url);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_viewports() {
        let desktop = Viewport::desktop();
        assert_eq!((desktop.width, desktop.height), (1920, 1080));
        assert!(!desktop.mobile);

        let mobile = Viewport::mobile();
        assert_eq!((mobile.width, mobile.height), (390, 844));
        assert!(mobile.mobile);
        assert_eq!(mobile.device_scale_factor, 3.0);
    }

    #[test]
    fn test_tall_mobile_page_is_clipped_to_the_edge_limit() {
        // 5200 css px at 3x would be 15600 device px
        let clip = bounded_clip(390.0, 5200.0, 3.0);
        assert!(clip.height * 3.0 <= MAX_SCREENSHOT_EDGE_PX);
        assert!(clip.width * 3.0 <= MAX_SCREENSHOT_EDGE_PX);
        assert_eq!(clip.width, 390.0);
        assert_eq!((clip.x, clip.y, clip.scale), (0.0, 0.0, 1.0));
    }

    #[test]
    fn test_short_page_is_captured_whole() {
        let clip = bounded_clip(1920.0, 3400.0, 1.0);
        assert_eq!((clip.width, clip.height), (1920.0, 3400.0));

        let clip = bounded_clip(1920.0, 12_000.0, 1.0);
        assert_eq!(clip.height, MAX_SCREENSHOT_EDGE_PX);
    }

    #[test]
    fn test_bogus_scale_factor_falls_back_to_one() {
        let clip = bounded_clip(0.0, 9000.0, 0.0);
        assert_eq!((clip.width, clip.height), (1.0, MAX_SCREENSHOT_EDGE_PX));
    }

    #[test]
    fn test_closed_page_is_a_page_error() {
        assert!(matches!(live_page(None), Err(ScanError::Page(_))));
    }

    #[test]
    fn test_viewport_yaml_defaults_scale() {
        let viewport: Viewport = serde_yaml::from_str("width: 1280\nheight: 800\n").unwrap();
        assert_eq!(viewport.device_scale_factor, 1.0);
        assert!(!viewport.mobile);
    }
}
