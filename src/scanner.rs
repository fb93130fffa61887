//! Scan orchestration
//!
//! One scan owns one page from [`PageSource`] for its whole duration:
//! desktop render and snapshot, desktop and mobile screenshots, then the
//! optional product-detail pass on the same page. The page is closed on
//! every exit path.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::ScanConfig;
use crate::page_extractor::js_scripts::{PAGE_SNAPSHOT_SCRIPT, PRODUCT_SNAPSHOT_SCRIPT};
use crate::page_extractor::{DomSnapshot, PageDriver, PageSource, ProductSnapshot, Viewport};
use crate::signals::links::find_product_link;
use crate::signals::product::derive_product_signals;
use crate::signals::{PageSignals, ProductSignals, Screenshots, derive_page_signals};
use crate::utils::{ScanError, ScanResult, validate_navigation_timeout, validate_settle_delay};

/// Signal extractor bound to a page source and validated scan settings
pub struct Scanner {
    source: Arc<dyn PageSource>,
    navigation_timeout: Duration,
    settle: Duration,
    desktop: Viewport,
    mobile: Viewport,
    product_page: bool,
}

impl Scanner {
    pub fn new(source: Arc<dyn PageSource>, config: &ScanConfig) -> ScanResult<Self> {
        Ok(Self {
            source,
            navigation_timeout: validate_navigation_timeout(
                Some(config.navigation_timeout_ms),
                crate::utils::constants::DEFAULT_NAVIGATION_TIMEOUT_MS,
            )?,
            settle: validate_settle_delay(config.settle_ms)?,
            desktop: config.desktop_viewport,
            mobile: config.mobile_viewport,
            product_page: config.product_page,
        })
    }

    /// Extract the trust signals of `target_url`
    ///
    /// Only a failed page load (or failing to get a page at all) is an error.
    /// Everything after the load degrades: heuristics to defaults,
    /// screenshots to `None`, the product pass to `found: false`.
    pub async fn extract(&self, target_url: &str) -> ScanResult<PageSignals> {
        let page = self.source.open_page().await?;
        let outcome = self.scan(page.as_ref(), target_url).await;

        if let Err(e) = page.close().await {
            warn!("Failed to close page for {}: {}", target_url, e);
        }

        outcome
    }

    async fn scan(&self, page: &dyn PageDriver, target_url: &str) -> ScanResult<PageSignals> {
        if let Err(e) = page.set_viewport(self.desktop).await {
            warn!("Desktop viewport override failed for {}: {}", target_url, e);
        }

        let final_url = page.navigate(target_url, self.navigation_timeout).await?;
        let is_secure = is_https(&final_url);
        info!(url = %final_url, is_secure, "Storefront loaded");
        self.settle().await;

        let (mut signals, product_link) = match evaluate::<DomSnapshot>(page, PAGE_SNAPSHOT_SCRIPT).await {
            Ok(snapshot) => {
                let link = find_product_link(&snapshot.links, &final_url);
                (derive_page_signals(&snapshot, &final_url, is_secure), link)
            }
            Err(e) => {
                warn!("Heuristic evaluation failed for {}, using defaults: {}", final_url, e);
                (PageSignals::unevaluated(&final_url, is_secure), None)
            }
        };

        signals.screenshots = self.capture_both(page, &final_url).await;

        if self.product_page {
            signals.product_page = Some(match product_link {
                None => {
                    debug!("No product link found on {}", final_url);
                    ProductSignals::not_found()
                }
                Some(link) => match self.product_pass(page, &link).await {
                    Ok(product) => product,
                    Err(e) => {
                        warn!("Product page pass failed for {}: {}", link, e);
                        ProductSignals::not_found()
                    }
                },
            });
        }

        Ok(signals)
    }

    async fn product_pass(&self, page: &dyn PageDriver, link: &str) -> ScanResult<ProductSignals> {
        page.set_viewport(self.desktop)
            .await
            .map_err(|e| ScanError::ProductPage(e.to_string()))?;
        let final_url = page
            .navigate(link, self.navigation_timeout)
            .await
            .map_err(|e| ScanError::ProductPage(e.to_string()))?;
        self.settle().await;

        let snapshot = evaluate::<ProductSnapshot>(page, PRODUCT_SNAPSHOT_SCRIPT)
            .await
            .map_err(|e| ScanError::ProductPage(e.to_string()))?;

        let mut product = derive_product_signals(&snapshot, &final_url);
        product.screenshots = self.capture_both(page, &final_url).await;
        info!(url = %final_url, "Product page evaluated");
        Ok(product)
    }

    /// Desktop screenshot, then switch to the mobile profile for the second
    async fn capture_both(&self, page: &dyn PageDriver, url: &str) -> Screenshots {
        let desktop = capture(page, url, "desktop").await;

        let mobile = match page.set_viewport(self.mobile).await {
            Ok(()) => {
                self.settle().await;
                capture(page, url, "mobile").await
            }
            Err(e) => {
                warn!("Mobile viewport override failed for {}: {}", url, e);
                None
            }
        };

        Screenshots { desktop, mobile }
    }

    async fn settle(&self) {
        if !self.settle.is_zero() {
            tokio::time::sleep(self.settle).await;
        }
    }
}

async fn capture(page: &dyn PageDriver, url: &str, label: &str) -> Option<Vec<u8>> {
    match page.screenshot().await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("{} screenshot failed for {}: {}", label, url, e);
            None
        }
    }
}

async fn evaluate<T: DeserializeOwned>(page: &dyn PageDriver, script: &str) -> ScanResult<T> {
    let value = page.evaluate(script).await?;
    Ok(serde_json::from_value(value)?)
}

fn is_https(url: &str) -> bool {
    url::Url::parse(url).is_ok_and(|u| u.scheme() == "https")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_https() {
        assert!(is_https("https://shop.example/"));
        assert!(!is_https("http://shop.example/"));
        assert!(!is_https("not a url"));
    }

    #[test]
    fn test_scanner_rejects_zero_timeout() {
        struct NoPages;

        #[async_trait::async_trait]
        impl PageSource for NoPages {
            async fn open_page(&self) -> ScanResult<Box<dyn PageDriver>> {
                Err(ScanError::BrowserLaunch("none".to_string()))
            }
        }

        let config = ScanConfig {
            navigation_timeout_ms: 0,
            ..ScanConfig::default()
        };
        assert!(matches!(
            Scanner::new(Arc::new(NoPages), &config),
            Err(ScanError::Config(_))
        ));
    }
}
