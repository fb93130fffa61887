//! Review detection and the five secondary copy families
//!
//! Each predicate is independent: it reads the lower-cased body text and/or
//! the DOM markers and returns a bool. Nothing here depends on another check.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{
    GuaranteeSignals, SecuritySignals, ShippingSignals, SocialProofSignals, SupportSignals,
};
use super::vocab::{
    CHAT_WIDGET_MARKERS, DELIVERY_ESTIMATE_PHRASES, FREE_SHIPPING_PHRASES, MONEY_BACK_PHRASES,
    PRESS_PHRASES, REVIEW_WIDGET_MARKERS, SECURE_CHECKOUT_PHRASES, SECURITY_SEAL_MARKERS,
    SUPPORT_HOURS_PHRASES, WARRANTY_PHRASES, contains_any,
};

static STAR_GLYPHS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[★☆⭐]{2,}").expect("valid regex"));

/// "3-5 business days", "2 to 4 days", "within 48 hours"
static DELIVERY_WINDOW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}\s*(?:-|–|to)\s*\d{1,2}\s*(?:business\s+|working\s+)?days?\b|\bwithin\s+\d{1,3}\s*(?:hours|days)\b")
        .expect("valid regex")
});

/// "30-day money back", "60 day guarantee"
static DAY_GUARANTEE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,3}[\s-]*days?\s+(?:money[\s-]back|guarantee|refund)").expect("valid regex")
});

/// "10,000+ happy customers", "50k customers", "1.2M satisfied buyers"
static CUSTOMER_COUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d[\d,.]*\s*(?:k|m)?\+?\s+(?:happy\s+|satisfied\s+|loyal\s+)?(?:customers|clients|shoppers|buyers)\b")
        .expect("valid regex")
});

/// "9am-5pm", "9:00 am to 6:00 pm", "08:00 – 17:00"
static TIME_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b\d{1,2}(?::\d{2})?\s*(?:am|pm)\s*(?:-|–|to)\s*\d{1,2}(?::\d{2})?\s*(?:am|pm)\b|\b\d{1,2}:\d{2}\s*(?:-|–|to)\s*\d{1,2}:\d{2}\b",
    )
    .expect("valid regex")
});

/// Lower-cased marker strings a snapshot exposes: class/id tokens plus iframe/script sources
pub struct DomMarkers<'a> {
    pub class_id_tokens: &'a [String],
    pub iframe_srcs: &'a [String],
    pub script_srcs: &'a [String],
}

impl DomMarkers<'_> {
    fn any_token(&self, table: &[&str]) -> bool {
        self.class_id_tokens
            .iter()
            .any(|t| contains_any(&t.to_lowercase(), table))
    }

    fn any_source(&self, table: &[&str]) -> bool {
        self.iframe_srcs
            .iter()
            .chain(self.script_srcs.iter())
            .any(|s| contains_any(&s.to_lowercase(), table))
    }
}

/// "reviews" in text, a star glyph run, or a review widget marker
pub fn detect_reviews(body_lower: &str, markers: &DomMarkers<'_>) -> bool {
    body_lower.contains("reviews")
        || STAR_GLYPHS.is_match(body_lower)
        || markers.any_token(REVIEW_WIDGET_MARKERS)
}

pub fn detect_shipping(body_lower: &str) -> ShippingSignals {
    ShippingSignals {
        free_shipping_mentioned: contains_any(body_lower, FREE_SHIPPING_PHRASES),
        delivery_estimate_mentioned: contains_any(body_lower, DELIVERY_ESTIMATE_PHRASES)
            || DELIVERY_WINDOW.is_match(body_lower),
    }
}

pub fn detect_guarantees(body_lower: &str) -> GuaranteeSignals {
    GuaranteeSignals {
        money_back_mentioned: contains_any(body_lower, MONEY_BACK_PHRASES)
            || DAY_GUARANTEE.is_match(body_lower),
        warranty_mentioned: contains_any(body_lower, WARRANTY_PHRASES),
    }
}

/// `badge_is_security` is the badge pass's verdict; seal scripts/iframes count too
pub fn detect_security(
    body_lower: &str,
    markers: &DomMarkers<'_>,
    badge_is_security: bool,
) -> SecuritySignals {
    SecuritySignals {
        secure_checkout_mentioned: contains_any(body_lower, SECURE_CHECKOUT_PHRASES),
        security_badge_detected: badge_is_security
            || markers.any_source(SECURITY_SEAL_MARKERS)
            || markers.any_token(SECURITY_SEAL_MARKERS),
    }
}

pub fn detect_social_proof(body_lower: &str) -> SocialProofSignals {
    SocialProofSignals {
        customer_count_mentioned: CUSTOMER_COUNT.is_match(body_lower),
        press_mention_detected: contains_any(body_lower, PRESS_PHRASES),
    }
}

pub fn detect_support(body_lower: &str, markers: &DomMarkers<'_>) -> SupportSignals {
    SupportSignals {
        live_chat_widget_detected: markers.any_source(CHAT_WIDGET_MARKERS)
            || markers.any_token(CHAT_WIDGET_MARKERS),
        support_hours_mentioned: contains_any(body_lower, SUPPORT_HOURS_PHRASES)
            || TIME_RANGE.is_match(body_lower),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        for pattern in [&STAR_GLYPHS, &DELIVERY_WINDOW, &DAY_GUARANTEE, &CUSTOMER_COUNT, &TIME_RANGE] {
            LazyLock::force(pattern);
        }
    }

    const NO_MARKERS: DomMarkers<'static> = DomMarkers {
        class_id_tokens: &[],
        iframe_srcs: &[],
        script_srcs: &[],
    };

    #[test]
    fn test_reviews_from_text_glyphs_or_widget() {
        assert!(detect_reviews("read 120 reviews", &NO_MARKERS));
        assert!(detect_reviews("rated ★★★★☆ by buyers", &NO_MARKERS));
        assert!(!detect_reviews("review our terms", &NO_MARKERS));

        let tokens = vec!["jdgm-widget".to_string()];
        let markers = DomMarkers {
            class_id_tokens: &tokens,
            iframe_srcs: &[],
            script_srcs: &[],
        };
        assert!(detect_reviews("", &markers));
    }

    #[test]
    fn test_shipping_phrases_and_windows() {
        let s = detect_shipping("free shipping on orders over $50");
        assert!(s.free_shipping_mentioned);
        assert!(!s.delivery_estimate_mentioned);

        let s = detect_shipping("orders arrive in 3-5 business days");
        assert!(!s.free_shipping_mentioned);
        assert!(s.delivery_estimate_mentioned);

        assert!(detect_shipping("we ship within 48 hours").delivery_estimate_mentioned);
    }

    #[test]
    fn test_guarantees() {
        let g = detect_guarantees("try it with our 30-day money back promise");
        assert!(g.money_back_mentioned);
        assert!(!g.warranty_mentioned);

        let g = detect_guarantees("every frame has a 2 year warranty");
        assert!(g.warranty_mentioned);
        assert!(!g.money_back_mentioned);

        assert!(detect_guarantees("60 day guarantee").money_back_mentioned);
    }

    #[test]
    fn test_security_from_text_badge_or_seal_script() {
        let s = detect_security("secure checkout powered by stripe", &NO_MARKERS, false);
        assert!(s.secure_checkout_mentioned);
        assert!(!s.security_badge_detected);

        assert!(detect_security("", &NO_MARKERS, true).security_badge_detected);

        let scripts = vec!["https://cdn.ywxi.net/js/1.js?trustedsite=1".to_string()];
        let markers = DomMarkers {
            class_id_tokens: &[],
            iframe_srcs: &[],
            script_srcs: &scripts,
        };
        assert!(detect_security("", &markers, false).security_badge_detected);
    }

    #[test]
    fn test_social_proof() {
        assert!(detect_social_proof("join 10,000+ happy customers").customer_count_mentioned);
        assert!(detect_social_proof("loved by 50k customers").customer_count_mentioned);
        assert!(!detect_social_proof("our customers love us").customer_count_mentioned);
        assert!(detect_social_proof("as featured in vogue").press_mention_detected);
    }

    #[test]
    fn test_support_chat_and_hours() {
        let iframes = vec!["https://widget.intercom.io/frame".to_string()];
        let markers = DomMarkers {
            class_id_tokens: &[],
            iframe_srcs: &iframes,
            script_srcs: &[],
        };
        let s = detect_support("mon-fri 9am-5pm est", &markers);
        assert!(s.live_chat_widget_detected);
        assert!(s.support_hours_mentioned);

        let s = detect_support("we answer emails", &NO_MARKERS);
        assert!(!s.live_chat_widget_detected);
        assert!(!s.support_hours_mentioned);

        assert!(detect_support("open 08:00 – 17:00", &NO_MARKERS).support_hours_mentioned);
        assert!(detect_support("24/7 support", &NO_MARKERS).support_hours_mentioned);
    }
}
