pub mod constants;
mod errors;
mod timeout;

pub use errors::{ScanError, ScanResult};
pub use timeout::{validate_navigation_timeout, validate_settle_delay};

/// Host of `url` without a leading `www.`, lower-cased
///
/// Returns `None` for URLs that do not parse or carry no host.
pub fn page_domain(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    Some(host.strip_prefix("www.").unwrap_or(&host).to_string())
}

/// Prefix `https://` when the input has no scheme, reject non-http(s) schemes
pub fn normalize_target_url(input: &str) -> Result<String, ScanError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScanError::Config("Empty URL".to_string()));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let parsed = url::Url::parse(&candidate)
        .map_err(|e| ScanError::Config(format!("Invalid URL '{trimmed}': {e}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => Err(ScanError::Config(format!(
            "URL must use http or https, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_domain_strips_www() {
        assert_eq!(page_domain("https://www.Example.com/shop").as_deref(), Some("example.com"));
        assert_eq!(page_domain("http://store.example.co.uk").as_deref(), Some("store.example.co.uk"));
        assert_eq!(page_domain("not a url"), None);
    }

    #[test]
    fn test_normalize_adds_https() {
        assert_eq!(normalize_target_url("example.com").unwrap(), "https://example.com/");
        assert_eq!(normalize_target_url("http://example.com/a").unwrap(), "http://example.com/a");
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        assert!(normalize_target_url("ftp://example.com").is_err());
        assert!(normalize_target_url("   ").is_err());
    }
}
