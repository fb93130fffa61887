//! Shared configuration constants for scans
//!
//! Default values used across the crate so that the config layer, the
//! scanner and the browser launcher agree on the same numbers.

/// Chrome user agent string presented to storefronts
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Some storefront platforms serve a stripped page to unknown agents, which
/// hides footers and payment icons. Keep this within a few releases of stable.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";

/// Desktop viewport used for the main heuristic pass and first screenshot
pub const DESKTOP_VIEWPORT_WIDTH: u32 = 1920;
pub const DESKTOP_VIEWPORT_HEIGHT: u32 = 1080;

/// Mobile profile (iPhone 12-14 class device)
pub const MOBILE_VIEWPORT_WIDTH: u32 = 390;
pub const MOBILE_VIEWPORT_HEIGHT: u32 = 844;
pub const MOBILE_DEVICE_SCALE_FACTOR: f64 = 3.0;

/// Default navigation timeout for the homepage and the product page
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;

/// Extra wait after the load event so late widgets (chat, reviews) can mount
pub const DEFAULT_SETTLE_MS: u64 = 1_500;

/// Default budget for the AI design assessment round trip
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 60;

pub const DEFAULT_AI_MODEL: &str = "claude-sonnet-4-20250514";

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";

/// Longest screenshot edge in device pixels; the vision API refuses 8000 and up
pub const MAX_SCREENSHOT_EDGE_PX: f64 = 7_900.0;

/// Per-image limits of the Messages API
pub const MAX_PROVIDER_IMAGE_EDGE_PX: u32 = 8_000;
pub const MAX_PROVIDER_IMAGE_BYTES: usize = 5 * 1024 * 1024;
