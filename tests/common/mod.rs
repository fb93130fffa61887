//! Shared fakes for integration tests.
//!
//! Fakes the *browser*: a scripted in-memory page that answers navigation,
//! snapshot evaluation and screenshots from fixture data, and records every
//! call so tests can assert on the sequence (and that the page was closed).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use storefront_trust_scan::page_extractor::js_scripts::{
    PAGE_SNAPSHOT_SCRIPT, PRODUCT_SNAPSHOT_SCRIPT,
};
use storefront_trust_scan::page_extractor::Viewport;
use storefront_trust_scan::{PageDriver, PageSource, ScanConfig, ScanError, ScanResult};

pub const PNG_STUB: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// What the fake page answers
#[derive(Clone, Default)]
pub struct PageScript {
    /// requested URL -> final URL, or an error message
    pub navigations: HashMap<String, Result<String, String>>,
    /// `None` makes the snapshot evaluation fail
    pub page_snapshot: Option<Value>,
    pub product_snapshot: Option<Value>,
    pub screenshots_fail: bool,
}

impl PageScript {
    pub fn serving(url: &str, final_url: &str, snapshot: Value) -> Self {
        let mut navigations = HashMap::new();
        navigations.insert(url.to_string(), Ok(final_url.to_string()));
        Self {
            navigations,
            page_snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn with_product(mut self, url: &str, snapshot: Value) -> Self {
        self.navigations.insert(url.to_string(), Ok(url.to_string()));
        self.product_snapshot = Some(snapshot);
        self
    }
}

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct FakePage {
    script: PageScript,
    log: CallLog,
}

#[async_trait]
impl PageDriver for FakePage {
    async fn set_viewport(&self, viewport: Viewport) -> ScanResult<()> {
        let kind = if viewport.mobile { "mobile" } else { "desktop" };
        self.log.lock().unwrap().push(format!("viewport:{kind}"));
        Ok(())
    }

    async fn navigate(&self, url: &str, _timeout: Duration) -> ScanResult<String> {
        self.log.lock().unwrap().push(format!("navigate:{url}"));
        match self.script.navigations.get(url) {
            Some(Ok(final_url)) => Ok(final_url.clone()),
            Some(Err(reason)) => Err(ScanError::navigation(url, reason)),
            None => Err(ScanError::navigation(url, "net::ERR_NAME_NOT_RESOLVED")),
        }
    }

    async fn evaluate(&self, script: &str) -> ScanResult<Value> {
        let (label, answer) = if script == PAGE_SNAPSHOT_SCRIPT {
            ("page", &self.script.page_snapshot)
        } else if script == PRODUCT_SNAPSHOT_SCRIPT {
            ("product", &self.script.product_snapshot)
        } else {
            ("unknown", &None)
        };
        self.log.lock().unwrap().push(format!("evaluate:{label}"));
        answer
            .clone()
            .ok_or_else(|| ScanError::HeuristicEvaluation("Uncaught TypeError".to_string()))
    }

    async fn screenshot(&self) -> ScanResult<Vec<u8>> {
        self.log.lock().unwrap().push("screenshot".to_string());
        if self.script.screenshots_fail {
            Err(ScanError::ScreenshotCapture("Page too large".to_string()))
        } else {
            Ok(PNG_STUB.to_vec())
        }
    }

    async fn close(self: Box<Self>) -> ScanResult<()> {
        self.log.lock().unwrap().push("close".to_string());
        Ok(())
    }
}

/// Hands out scripted pages and remembers every call made on them
#[derive(Clone, Default)]
pub struct FakeSource {
    pub script: PageScript,
    pub log: CallLog,
}

impl FakeSource {
    pub fn new(script: PageScript) -> Self {
        Self {
            script,
            log: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| c.as_str() == call).count()
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn open_page(&self) -> ScanResult<Box<dyn PageDriver>> {
        self.log.lock().unwrap().push("open".to_string());
        Ok(Box::new(FakePage {
            script: self.script.clone(),
            log: self.log.clone(),
        }))
    }
}

/// Scan settings without the real-world settle delay
pub fn fast_scan_config() -> ScanConfig {
    ScanConfig {
        settle_ms: 0,
        ..ScanConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Snapshot fixtures (shaped like the JSON the in-page scripts return)
// ---------------------------------------------------------------------------

/// A well-kept storefront: policy links, payment icons in the header,
/// reviews, free shipping and a product link
pub fn trusted_store_snapshot() -> Value {
    json!({
        "finalUrl": "https://www.trusted.example/",
        "viewportHeight": 1080,
        "links": [
            { "href": "https://www.trusted.example/pages/contact", "text": "Contact us" },
            { "href": "https://www.trusted.example/pages/about-us", "text": "Our story" },
            { "href": "https://www.trusted.example/policies/refund-policy", "text": "Refunds" },
            { "href": "https://www.trusted.example/policies/privacy-policy", "text": "Privacy" },
            { "href": "https://www.trusted.example/products/linen-shirt", "text": "Linen Shirt" },
            { "href": "https://instagram.com/trusted", "text": "Instagram" }
        ],
        "bodyText": "Free shipping on orders over $50\nRated 4.8 from 2,300 reviews\n\
                     Join 10,000+ happy customers\nQuestions? support@trusted.example",
        "htmlFallback": null,
        "footerText": "© Trusted Goods. hello@trusted.example",
        "contactTexts": [],
        "mailtoHrefs": ["mailto:support@trusted.example"],
        "classIdTokens": ["header", "judgeme-widget", "footer"],
        "iframeSrcs": [],
        "scriptSrcs": [],
        "footer": { "top": 2600, "left": 0, "width": 1920, "height": 400 },
        "badgeCandidates": [
            {
                "tag": "img",
                "src": "https://cdn.trusted.example/icons/visa.svg",
                "alt": "Visa",
                "rect": { "top": 60, "left": 1500, "width": 38, "height": 24 },
                "inFooter": false,
                "ancestorMarkers": "header-payments",
                "siblingIconCount": 3
            },
            {
                "tag": "img",
                "src": "https://cdn.trusted.example/icons/instagram.svg",
                "alt": "Instagram",
                "rect": { "top": 2650, "left": 40, "width": 24, "height": 24 },
                "inFooter": true,
                "siblingIconCount": 4
            }
        ]
    })
}

pub fn product_snapshot() -> Value {
    json!({
        "finalUrl": "https://www.trusted.example/products/linen-shirt",
        "viewportHeight": 1080,
        "bodyText": "Linen Shirt\n48 reviews\nSize guide\n30-day returns\nAdd to cart",
        "classIdTokens": ["product-form"],
        "cta": { "top": 700, "left": 1100, "width": 320, "height": 48 },
        "badgeCandidates": [
            {
                "tag": "img",
                "src": "/icons/paypal.svg",
                "alt": "PayPal",
                "rect": { "top": 770, "left": 1100, "width": 38, "height": 24 },
                "inCtaContainer": true
            }
        ],
        "images": [
            { "src": "https://cdn.trusted.example/p/front.jpg?width=1200", "width": 1200, "height": 1200 },
            { "src": "https://cdn.trusted.example/p/back.jpg", "width": 1200, "height": 1200 }
        ]
    })
}
