//! Trust signal heuristics
//!
//! Pure functions from the raw snapshots in [`crate::page_extractor`] to the
//! [`PageSignals`] / [`ProductSignals`] records. Nothing in here touches the
//! browser, which keeps every rule testable against a static fixture.

pub mod badges;
pub mod copy;
pub mod emails;
pub mod links;
pub mod product;
mod types;
pub mod vocab;

pub use types::{
    Badge, BadgeKind, GuaranteeSignals, PageSignals, PolicyPages, ProductSignals, Screenshots,
    SecuritySignals, ShippingSignals, SocialProofSignals, SupportSignals, TrustBadges,
};

use tracing::debug;

use crate::page_extractor::DomSnapshot;
use crate::utils::page_domain;
use badges::FoldContext;
use copy::DomMarkers;

/// Body text, falling back to the rendered HTML converted to text
///
/// Some single-page storefronts report an empty `innerText` until hydration
/// finishes; the snapshot then carries the HTML instead.
fn effective_body_text(snapshot: &DomSnapshot) -> String {
    if snapshot.body_text.trim().is_empty() {
        if let Some(html) = snapshot.html_fallback.as_deref() {
            return html2md::parse_html(html);
        }
    }
    snapshot.body_text.clone()
}

/// Derive the homepage signals from one desktop snapshot
///
/// `url` and `is_secure` describe the navigation result; screenshots, the
/// product pass and the AI assessment are filled in later by the caller.
pub fn derive_page_signals(snapshot: &DomSnapshot, url: &str, is_secure: bool) -> PageSignals {
    let body_text = effective_body_text(snapshot);
    let body_lower = body_text.to_lowercase();
    let domain = page_domain(url).unwrap_or_default();

    let text_snapshot;
    let email_source = if body_text == snapshot.body_text {
        snapshot
    } else {
        text_snapshot = DomSnapshot {
            body_text: body_text.clone(),
            ..snapshot.clone()
        };
        &text_snapshot
    };

    let markers = DomMarkers {
        class_id_tokens: &snapshot.class_id_tokens,
        iframe_srcs: &snapshot.iframe_srcs,
        script_srcs: &snapshot.script_srcs,
    };

    let fold = FoldContext {
        viewport_height: snapshot.viewport_height,
        footer: snapshot.footer,
    };
    let badge_items = badges::detect_badges(&snapshot.badge_candidates, &fold);
    let badge_is_security = badge_items.iter().any(|b| b.kind == BadgeKind::Security);

    let signals = PageSignals {
        url: url.to_string(),
        is_secure,
        pages: links::classify_links(&snapshot.links),
        emails: emails::discover_emails(email_source, &domain),
        has_reviews: copy::detect_reviews(&body_lower, &markers),
        trust_badges: TrustBadges::from_items(badge_items),
        shipping: copy::detect_shipping(&body_lower),
        guarantees: copy::detect_guarantees(&body_lower),
        security: copy::detect_security(&body_lower, &markers, badge_is_security),
        social_proof: copy::detect_social_proof(&body_lower),
        support: copy::detect_support(&body_lower, &markers),
        screenshots: Screenshots::default(),
        product_page: None,
        ai_assessment: None,
    };

    debug!(
        url = %url,
        badges = signals.trust_badges.total_count,
        above_fold = signals.trust_badges.above_fold_items.len(),
        emails = signals.emails.len(),
        "Derived page signals"
    );

    signals
}
