//! Policy-page link classification and product link discovery

use url::Url;

use super::types::PolicyPages;
use super::vocab::{
    ABOUT_LINK_KEYWORDS, CONTACT_LINK_KEYWORDS, PRIVACY_LINK_KEYWORDS, PRODUCT_PATH_PATTERNS,
    RETURN_LINK_KEYWORDS, contains_any,
};
use crate::page_extractor::LinkRef;

/// A capability is present iff any link's href or text contains one of its keywords
pub fn classify_links(links: &[LinkRef]) -> PolicyPages {
    let targets: Vec<String> = links
        .iter()
        .map(|link| format!("{} {}", link.href, link.text).to_lowercase())
        .collect();

    let any = |table: &[&str]| targets.iter().any(|t| contains_any(t, table));

    PolicyPages {
        has_contact: any(CONTACT_LINK_KEYWORDS),
        has_about: any(ABOUT_LINK_KEYWORDS),
        has_return_policy: any(RETURN_LINK_KEYWORDS),
        has_privacy_policy: any(PRIVACY_LINK_KEYWORDS),
    }
}

/// First same-host link whose path looks like a product-detail page
///
/// Collection roots such as `/products/` with nothing after the prefix are
/// skipped, as are fragments pointing back at the page itself.
pub fn find_product_link(links: &[LinkRef], page_url: &str) -> Option<String> {
    let base = Url::parse(page_url).ok()?;
    let base_host = base.host_str()?.trim_start_matches("www.").to_ascii_lowercase();

    links.iter().find_map(|link| {
        let resolved = base.join(link.href.trim()).ok()?;
        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }

        let host = resolved.host_str()?.trim_start_matches("www.").to_ascii_lowercase();
        if host != base_host {
            return None;
        }

        let path = resolved.path().to_ascii_lowercase();
        let is_product = PRODUCT_PATH_PATTERNS.iter().any(|pattern| {
            path.find(pattern)
                .map(|idx| path.len() > idx + pattern.len())
                .unwrap_or(false)
        });

        if is_product {
            let mut clean = resolved;
            clean.set_fragment(None);
            Some(clean.to_string())
        } else {
            None
        }
    })
}
