//! Timeout validation for browser operations

use std::time::Duration;

use super::errors::ScanError;

/// Maximum timeout for a single page navigation (5 minutes)
/// Covers slow storefront themes, heavy SPAs and network delays
pub const MAX_NAVIGATION_TIMEOUT_MS: u64 = 300_000; // 5 minutes

/// Maximum settle delay after the load event (30 seconds)
pub const MAX_SETTLE_MS: u64 = 30_000; // 30 seconds

/// Validate a navigation timeout
///
/// # Arguments
/// * `timeout_ms` - Optional timeout in milliseconds
/// * `default_ms` - Default timeout if None provided
///
/// # Returns
/// * `Ok(Duration)` - Validated Duration object
/// * `Err(ScanError::Config)` - If timeout is zero or exceeds MAX_NAVIGATION_TIMEOUT_MS
pub fn validate_navigation_timeout(
    timeout_ms: Option<u64>,
    default_ms: u64,
) -> Result<Duration, ScanError> {
    let ms = timeout_ms.unwrap_or(default_ms);

    if ms == 0 {
        return Err(ScanError::Config(
            "Navigation timeout must be greater than 0ms".to_string(),
        ));
    }

    if ms > MAX_NAVIGATION_TIMEOUT_MS {
        return Err(ScanError::Config(format!(
            "Navigation timeout cannot exceed {}ms ({} minutes). Received: {}ms ({:.1} minutes)",
            MAX_NAVIGATION_TIMEOUT_MS,
            MAX_NAVIGATION_TIMEOUT_MS / 60_000,
            ms,
            ms as f64 / 60_000.0
        )));
    }

    Ok(Duration::from_millis(ms))
}

/// Validate the post-load settle delay
pub fn validate_settle_delay(settle_ms: u64) -> Result<Duration, ScanError> {
    if settle_ms > MAX_SETTLE_MS {
        return Err(ScanError::Config(format!(
            "Settle delay cannot exceed {}ms ({} seconds). Received: {}ms",
            MAX_SETTLE_MS,
            MAX_SETTLE_MS / 1000,
            settle_ms
        )));
    }

    Ok(Duration::from_millis(settle_ms))
}
