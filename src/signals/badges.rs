//! Trust badge detection
//!
//! Three detector passes run over the same candidate list, each independent
//! and each tagging its hits with a provenance string:
//!
//! 1. [`keyword_pass`]: alt/title/aria/class/id/src names a payment brand,
//!    a security seal or a generic badge word.
//! 2. [`container_pass`]: an ancestor's class/id says "payment", "trust", ...
//! 3. [`footer_row_pass`]: small icons sitting in a row inside the footer.
//!
//! [`merge_passes`] concatenates the hits in pass order and drops anything
//! already seen (same source, same alt text, or within 5px on both axes).
//! Social-media icons are rejected before any pass looks at them.

use super::types::{Badge, BadgeKind};
use super::vocab::{
    BADGE_CONTAINER_HINTS, GENERIC_BADGE_KEYWORDS, PAYMENT_BRAND_KEYWORDS, SOCIAL_KEYWORDS,
    TRUST_SECURITY_KEYWORDS, first_match,
};
use crate::page_extractor::{BadgeCandidate, Rect};

/// Below this in either dimension an element is a spacer or tracking pixel
pub const MIN_BADGE_DIMENSION_PX: f64 = 10.0;

/// Elements parked further above the viewport than this are off-screen decoration
pub const MIN_TOP_OFFSET_PX: f64 = -100.0;

/// Two hits closer than this on both axes are the same element seen twice
pub const DEDUP_PROXIMITY_PX: f64 = 5.0;

/// Footer icons larger than this are banners or product shots, not badges
pub const FOOTER_ICON_MAX_WIDTH_PX: f64 = 160.0;
pub const FOOTER_ICON_MAX_HEIGHT_PX: f64 = 100.0;

/// A "row of icons" needs at least this many image siblings
pub const FOOTER_ROW_MIN_SIBLINGS: u32 = 3;

/// Page geometry needed for the fold decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldContext {
    pub viewport_height: f64,
    pub footer: Option<Rect>,
}

impl FoldContext {
    /// Visible without scrolling, or inside a footer whose top is itself on screen
    pub fn is_above_fold(&self, top_offset: f64, in_footer: bool) -> bool {
        if top_offset < self.viewport_height {
            return true;
        }
        in_footer
            && self
                .footer
                .map(|footer| footer.top < self.viewport_height)
                .unwrap_or(false)
    }
}

fn is_eligible(candidate: &BadgeCandidate) -> bool {
    candidate.rect.width >= MIN_BADGE_DIMENSION_PX
        && candidate.rect.height >= MIN_BADGE_DIMENSION_PX
        && candidate.rect.top >= MIN_TOP_OFFSET_PX
}

fn is_social(candidate: &BadgeCandidate) -> bool {
    first_match(&candidate.haystack(), SOCIAL_KEYWORDS).is_some()
}

/// Payment brands win over trust words, trust words over generic badge words
fn keyword_kind(haystack: &str) -> Option<(BadgeKind, &'static str)> {
    if let Some(word) = first_match(haystack, PAYMENT_BRAND_KEYWORDS) {
        return Some((BadgeKind::Payment, word));
    }
    if let Some(word) = first_match(haystack, TRUST_SECURITY_KEYWORDS) {
        return Some((BadgeKind::Security, word));
    }
    first_match(haystack, GENERIC_BADGE_KEYWORDS).map(|word| (BadgeKind::Generic, word))
}

fn container_kind(hint: &str) -> BadgeKind {
    match hint {
        "payment" | "accepted-cards" | "cards-accepted" | "card-icons" => BadgeKind::Payment,
        "secure" | "security" | "guarantee" | "seal" => BadgeKind::Security,
        _ => BadgeKind::Generic,
    }
}

fn build_badge(
    candidate: &BadgeCandidate,
    kind: BadgeKind,
    reason: String,
    fold: &FoldContext,
) -> Badge {
    Badge {
        kind,
        source_ref: candidate.src.clone(),
        alt_text: candidate.alt.clone(),
        top_offset_px: candidate.rect.top,
        left_offset_px: candidate.rect.left,
        is_above_fold: fold.is_above_fold(candidate.rect.top, candidate.in_footer),
        match_reason: reason,
    }
}

fn eligible<'a>(
    candidates: &'a [BadgeCandidate],
) -> impl Iterator<Item = &'a BadgeCandidate> + 'a {
    candidates
        .iter()
        .filter(|c| is_eligible(c) && !is_social(c))
}

pub fn keyword_pass(candidates: &[BadgeCandidate], fold: &FoldContext) -> Vec<Badge> {
    eligible(candidates)
        .filter_map(|c| {
            let (kind, word) = keyword_kind(&c.haystack())?;
            Some(build_badge(c, kind, format!("keyword:{word}"), fold))
        })
        .collect()
}

pub fn container_pass(candidates: &[BadgeCandidate], fold: &FoldContext) -> Vec<Badge> {
    eligible(candidates)
        .filter_map(|c| {
            let markers = c.ancestor_markers.to_lowercase();
            let hint = first_match(&markers, BADGE_CONTAINER_HINTS)?;
            Some(build_badge(c, container_kind(hint), format!("container:{hint}"), fold))
        })
        .collect()
}

pub fn footer_row_pass(candidates: &[BadgeCandidate], fold: &FoldContext) -> Vec<Badge> {
    eligible(candidates)
        .filter(|c| c.in_footer)
        .filter(|c| {
            c.rect.width <= FOOTER_ICON_MAX_WIDTH_PX && c.rect.height <= FOOTER_ICON_MAX_HEIGHT_PX
        })
        .filter_map(|c| {
            if c.sibling_icon_count >= FOOTER_ROW_MIN_SIBLINGS {
                let kind = keyword_kind(&c.haystack())
                    .map(|(kind, _)| kind)
                    .unwrap_or(BadgeKind::Generic);
                Some(build_badge(c, kind, "footer-row".to_string(), fold))
            } else {
                let (kind, word) = keyword_kind(&c.haystack())?;
                Some(build_badge(c, kind, format!("footer-keyword:{word}"), fold))
            }
        })
        .collect()
}

fn is_duplicate(a: &Badge, b: &Badge) -> bool {
    if !a.source_ref.is_empty() && a.source_ref == b.source_ref {
        return true;
    }
    if !a.alt_text.is_empty() && a.alt_text == b.alt_text {
        return true;
    }
    (a.top_offset_px - b.top_offset_px).abs() <= DEDUP_PROXIMITY_PX
        && (a.left_offset_px - b.left_offset_px).abs() <= DEDUP_PROXIMITY_PX
}

/// Concatenate passes in order, keeping the first hit for each element
pub fn merge_passes(passes: Vec<Vec<Badge>>) -> Vec<Badge> {
    let mut merged: Vec<Badge> = Vec::new();
    for badge in passes.into_iter().flatten() {
        if !merged.iter().any(|kept| is_duplicate(kept, &badge)) {
            merged.push(badge);
        }
    }
    merged
}

/// Run all passes in precedence order and merge
pub fn detect_badges(candidates: &[BadgeCandidate], fold: &FoldContext) -> Vec<Badge> {
    merge_passes(vec![
        keyword_pass(candidates, fold),
        container_pass(candidates, fold),
        footer_row_pass(candidates, fold),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOLD: FoldContext = FoldContext {
        viewport_height: 1080.0,
        footer: None,
    };

    fn candidate(src: &str, top: f64, left: f64) -> BadgeCandidate {
        BadgeCandidate {
            tag: "img".to_string(),
            src: src.to_string(),
            rect: Rect {
                top,
                left,
                width: 40.0,
                height: 25.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_fold_by_offset() {
        assert!(FOLD.is_above_fold(50.0, false));
        assert!(!FOLD.is_above_fold(2000.0, false));
        // footer flag alone is not enough without a visible footer
        assert!(!FOLD.is_above_fold(2000.0, true));
    }

    #[test]
    fn test_fold_by_visible_footer() {
        let fold = FoldContext {
            viewport_height: 1080.0,
            footer: Some(Rect {
                top: 900.0,
                left: 0.0,
                width: 1920.0,
                height: 1400.0,
            }),
        };
        assert!(fold.is_above_fold(2100.0, true));
        assert!(!fold.is_above_fold(2100.0, false));

        let long_page = FoldContext {
            viewport_height: 1080.0,
            footer: Some(Rect {
                top: 4200.0,
                ..Default::default()
            }),
        };
        assert!(!long_page.is_above_fold(4300.0, true));
    }

    #[test]
    fn test_keyword_pass_kinds_and_reasons() {
        let candidates = vec![
            candidate("/icons/visa.svg", 100.0, 10.0),
            candidate("/img/norton-seal.png", 100.0, 80.0),
            candidate("/img/badge-60.png", 100.0, 160.0),
            candidate("/img/hero.jpg", 100.0, 240.0),
        ];
        let badges = keyword_pass(&candidates, &FOLD);
        assert_eq!(badges.len(), 3);
        assert_eq!(badges[0].kind, BadgeKind::Payment);
        assert_eq!(badges[0].match_reason, "keyword:visa");
        assert_eq!(badges[1].kind, BadgeKind::Security);
        assert_eq!(badges[1].match_reason, "keyword:norton");
        assert_eq!(badges[2].kind, BadgeKind::Generic);
        assert!(badges.iter().all(|b| b.is_above_fold));
    }

    #[test]
    fn test_social_icons_never_badges() {
        let mut social = candidate("/icons/facebook-secure.svg", 100.0, 10.0);
        social.ancestor_markers = "footer-payment-icons".to_string();
        social.in_footer = true;
        social.sibling_icon_count = 5;
        let candidates = vec![social];
        assert!(detect_badges(&candidates, &FOLD).is_empty());
    }

    #[test]
    fn test_size_and_offset_filters() {
        let mut tiny = candidate("/icons/visa.svg", 100.0, 10.0);
        tiny.rect.width = 8.0;
        let far_above = candidate("/icons/mastercard.svg", -150.0, 10.0);
        let edge = candidate("/icons/amex.svg", -100.0, 10.0);
        let badges = detect_badges(&[tiny, far_above, edge], &FOLD);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].source_ref, "/icons/amex.svg");
    }

    #[test]
    fn test_container_pass_uses_ancestor_markers() {
        let mut unnamed = candidate("/cdn/shop/files/icon-1.svg", 3000.0, 10.0);
        unnamed.ancestor_markers = "list-payment payment-icons footer__payment".to_string();
        let badges = container_pass(&[unnamed], &FOLD);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].kind, BadgeKind::Payment);
        assert_eq!(badges[0].match_reason, "container:payment");
        assert!(!badges[0].is_above_fold);
    }

    #[test]
    fn test_footer_row_pass() {
        let mut in_row = candidate("/cdn/a.svg", 2500.0, 10.0);
        in_row.in_footer = true;
        in_row.sibling_icon_count = 4;

        let mut lone = candidate("/cdn/b.svg", 2500.0, 300.0);
        lone.in_footer = true;
        lone.sibling_icon_count = 1;

        let mut lone_named = candidate("/cdn/klarna.svg", 2500.0, 600.0);
        lone_named.in_footer = true;
        lone_named.sibling_icon_count = 1;

        let mut banner = candidate("/cdn/c.jpg", 2500.0, 900.0);
        banner.in_footer = true;
        banner.sibling_icon_count = 4;
        banner.rect.width = 600.0;

        let badges = footer_row_pass(&[in_row, lone, lone_named, banner], &FOLD);
        let reasons: Vec<&str> = badges.iter().map(|b| b.match_reason.as_str()).collect();
        assert_eq!(reasons, vec!["footer-row", "footer-keyword:klarna"]);
    }

    #[test]
    fn test_merge_dedups_across_passes() {
        let mut named_in_container = candidate("/icons/paypal.svg", 2500.0, 10.0);
        named_in_container.ancestor_markers = "payment-icons".to_string();
        named_in_container.in_footer = true;
        named_in_container.sibling_icon_count = 4;

        let badges = detect_badges(&[named_in_container], &FOLD);
        assert_eq!(badges.len(), 1);
        assert_eq!(badges[0].match_reason, "keyword:paypal");
    }

    #[test]
    fn test_merge_dedups_by_alt_and_position() {
        let a = Badge {
            kind: BadgeKind::Payment,
            source_ref: String::new(),
            alt_text: "Visa".to_string(),
            top_offset_px: 10.0,
            left_offset_px: 10.0,
            is_above_fold: true,
            match_reason: "keyword:visa".to_string(),
        };
        let same_alt = Badge {
            top_offset_px: 500.0,
            match_reason: "container:payment".to_string(),
            ..a.clone()
        };
        let near = Badge {
            alt_text: String::new(),
            top_offset_px: 13.0,
            left_offset_px: 14.0,
            ..a.clone()
        };
        let distinct = Badge {
            alt_text: "Mastercard".to_string(),
            left_offset_px: 60.0,
            ..a.clone()
        };
        let merged = merge_passes(vec![vec![a], vec![same_alt, near, distinct]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[1].alt_text, "Mastercard");
    }

    #[test]
    fn test_inline_svg_without_source_dedups_by_position_only() {
        let mut left = candidate("", 100.0, 10.0);
        left.tag = "svg".to_string();
        left.aria_label = "Apple Pay".to_string();
        let mut right = candidate("", 100.0, 60.0);
        right.tag = "svg".to_string();
        right.aria_label = "Google Pay".to_string();
        let badges = detect_badges(&[left, right], &FOLD);
        assert_eq!(badges.len(), 2);
    }
}
