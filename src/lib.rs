//! Storefront trust audit
//!
//! Renders a storefront in headless Chrome, extracts trust signals (policy
//! pages, trust badges, contact emails, reviews and marketing copy), optionally
//! asks a vision model for a design verdict, and turns it all into a
//! deterministic 0-100 score with remediation advice.

pub mod ai;
mod browser;
pub mod browser_setup;
mod manager;
pub mod page_extractor;
pub mod report;
pub mod scanner;
pub mod scoring;
pub mod signals;
pub mod utils;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::page_extractor::Viewport;
use crate::utils::constants;

/// Config file looked up in the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "trust-scan.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub browser: BrowserConfig,

    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub ai: AiConfig,
}

/// Browser security and launch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Disable web security features (Same-Origin Policy, certificate checks)
    /// WARNING: Only enable for trusted content
    #[serde(default = "default_disable_security")]
    pub disable_security: bool,

    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

/// Per-scan timing and render settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Wait after the load event so late widgets can mount
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    #[serde(default = "Viewport::desktop")]
    pub desktop_viewport: Viewport,

    #[serde(default = "Viewport::mobile")]
    pub mobile_viewport: Viewport,

    /// Follow one product link and evaluate the product page
    #[serde(default = "default_product_page")]
    pub product_page: bool,
}

/// Vision-model design assessment; the API key comes from `ANTHROPIC_API_KEY`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    #[serde(default = "default_ai_enabled")]
    pub enabled: bool,

    #[serde(default = "default_ai_model")]
    pub model: String,

    /// Override for proxies and tests; defaults to the public API
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_ai_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_headless() -> bool {
    true
}

fn default_disable_security() -> bool {
    false // SECURE BY DEFAULT
}

fn default_window_width() -> u32 {
    constants::DESKTOP_VIEWPORT_WIDTH
}

fn default_window_height() -> u32 {
    constants::DESKTOP_VIEWPORT_HEIGHT
}

fn default_navigation_timeout_ms() -> u64 {
    constants::DEFAULT_NAVIGATION_TIMEOUT_MS
}

fn default_settle_ms() -> u64 {
    constants::DEFAULT_SETTLE_MS
}

fn default_product_page() -> bool {
    true
}

fn default_ai_enabled() -> bool {
    true
}

fn default_ai_model() -> String {
    constants::DEFAULT_AI_MODEL.to_string()
}

fn default_ai_timeout_secs() -> u64 {
    constants::DEFAULT_AI_TIMEOUT_SECS
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            disable_security: default_disable_security(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_ms: default_navigation_timeout_ms(),
            settle_ms: default_settle_ms(),
            desktop_viewport: Viewport::desktop(),
            mobile_viewport: Viewport::mobile(),
            product_page: default_product_page(),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: default_ai_enabled(),
            model: default_ai_model(),
            base_url: None,
            timeout_secs: default_ai_timeout_secs(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Load the YAML config
///
/// An explicit `path` must exist. Without one, `./trust-scan.yaml` is used
/// when present, otherwise built-in defaults.
pub fn load_yaml_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let local = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !local.exists() {
                return Ok(Config::default());
            }
            local
        }
    };

    let contents = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
    Ok(config)
}

pub use ai::{AiAssessment, ClaudeAssessor, DesignAssessor};
pub use browser::{
    BrowserError, BrowserResult, BrowserWrapper, download_managed_browser, find_browser_executable,
    launch_browser,
};
pub use manager::BrowserManager;
pub use page_extractor::{PageDriver, PageSource};
pub use report::{ScanReport, TrustAuditor};
pub use scanner::Scanner;
pub use scoring::{Grade, ScoreResult, score};
pub use signals::{PageSignals, ProductSignals};
pub use utils::{ScanError, ScanResult};
