//! Reduced heuristic pass for a product-detail page

use std::collections::HashSet;

use super::badges::{FoldContext, detect_badges};
use super::copy::{DomMarkers, detect_reviews};
use super::types::{ProductSignals, Screenshots};
use super::vocab::{PRODUCT_RETURN_PHRASES, SIZE_SPEC_PHRASES, SOLD_OUT_PHRASES, contains_any};
use crate::page_extractor::{ImageRef, ProductSnapshot};

/// Vertical distance within which a badge counts as "near" the buy button
pub const NEAR_ACTION_DISTANCE_PX: f64 = 400.0;

/// Images smaller than this on either side are thumbnails or icons
pub const MIN_PRODUCT_IMAGE_PX: f64 = 200.0;

/// Distinct large images needed for the gallery signal
pub const MIN_DISTINCT_PRODUCT_IMAGES: usize = 2;

/// Strip query string and fragment so CDN size variants count once
fn image_key(src: &str) -> String {
    src.split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

pub fn count_distinct_large_images(images: &[ImageRef]) -> usize {
    images
        .iter()
        .filter(|img| img.width >= MIN_PRODUCT_IMAGE_PX && img.height >= MIN_PRODUCT_IMAGE_PX)
        .map(|img| image_key(&img.src))
        .filter(|key| !key.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Badges in the call-to-action's form/section, or vertically close to the control
pub fn badges_near_action(snapshot: &ProductSnapshot) -> bool {
    let Some(cta) = snapshot.cta else {
        return false;
    };

    let fold = FoldContext {
        viewport_height: snapshot.viewport_height,
        footer: None,
    };

    let near_by_container: Vec<_> = snapshot
        .badge_candidates
        .iter()
        .filter(|c| c.in_cta_container)
        .cloned()
        .collect();
    if !detect_badges(&near_by_container, &fold).is_empty() {
        return true;
    }

    detect_badges(&snapshot.badge_candidates, &fold)
        .iter()
        .any(|badge| (badge.top_offset_px - cta.top).abs() <= NEAR_ACTION_DISTANCE_PX)
}

/// Derive the product signal set; screenshots are attached by the scanner
pub fn derive_product_signals(snapshot: &ProductSnapshot, url: &str) -> ProductSignals {
    let body = snapshot.body_text.to_lowercase();
    let markers = DomMarkers {
        class_id_tokens: &snapshot.class_id_tokens,
        iframe_srcs: &[],
        script_srcs: &[],
    };

    ProductSignals {
        found: true,
        url: Some(url.to_string()),
        reviews_visible: detect_reviews(&body, &markers),
        trust_badges_near_action: badges_near_action(snapshot),
        return_policy_mentioned: contains_any(&body, PRODUCT_RETURN_PHRASES),
        size_or_spec_info_present: contains_any(&body, SIZE_SPEC_PHRASES),
        in_stock_signal: !contains_any(&body, SOLD_OUT_PHRASES),
        multiple_distinct_images: count_distinct_large_images(&snapshot.images)
            >= MIN_DISTINCT_PRODUCT_IMAGES,
        screenshots: Screenshots::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_extractor::{BadgeCandidate, Rect};

    fn image(src: &str, size: f64) -> ImageRef {
        ImageRef {
            src: src.to_string(),
            width: size,
            height: size,
        }
    }

    fn icon(src: &str, top: f64) -> BadgeCandidate {
        BadgeCandidate {
            tag: "img".to_string(),
            src: src.to_string(),
            rect: Rect {
                top,
                left: 900.0,
                width: 38.0,
                height: 24.0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_distinct_images_ignore_size_variants_and_thumbnails() {
        let images = vec![
            image("https://cdn.shop/p/front.jpg?width=800", 800.0),
            image("https://cdn.shop/p/front.jpg?width=1600", 800.0),
            image("https://cdn.shop/p/back.jpg", 800.0),
            image("https://cdn.shop/p/thumb.jpg", 80.0),
        ];
        assert_eq!(count_distinct_large_images(&images), 2);
        assert_eq!(count_distinct_large_images(&images[..2]), 1);
    }

    #[test]
    fn test_badges_near_action_by_distance() {
        let snapshot = ProductSnapshot {
            viewport_height: 1080.0,
            cta: Some(Rect {
                top: 640.0,
                left: 900.0,
                width: 300.0,
                height: 48.0,
            }),
            badge_candidates: vec![icon("/icons/visa.svg", 720.0)],
            ..Default::default()
        };
        assert!(badges_near_action(&snapshot));

        let far = ProductSnapshot {
            badge_candidates: vec![icon("/icons/visa.svg", 3200.0)],
            ..snapshot.clone()
        };
        assert!(!badges_near_action(&far));
    }

    #[test]
    fn test_badges_near_action_by_container() {
        let mut in_form = icon("/icons/secure-checkout.svg", 3200.0);
        in_form.in_cta_container = true;
        let snapshot = ProductSnapshot {
            viewport_height: 1080.0,
            cta: Some(Rect {
                top: 640.0,
                ..Default::default()
            }),
            badge_candidates: vec![in_form],
            ..Default::default()
        };
        assert!(badges_near_action(&snapshot));
    }

    #[test]
    fn test_no_cta_means_no_badges_near_action() {
        let snapshot = ProductSnapshot {
            badge_candidates: vec![icon("/icons/visa.svg", 100.0)],
            ..Default::default()
        };
        assert!(!badges_near_action(&snapshot));
    }

    #[test]
    fn test_derive_product_signals() {
        let snapshot = ProductSnapshot {
            body_text: "Linen Shirt\n★★★★★ 48 Reviews\nSize guide\nFree returns within 30 days"
                .to_string(),
            images: vec![image("/a.jpg", 1000.0), image("/b.jpg", 1000.0)],
            ..Default::default()
        };
        let signals = derive_product_signals(&snapshot, "https://shop.example/products/linen");
        assert!(signals.found);
        assert_eq!(signals.url.as_deref(), Some("https://shop.example/products/linen"));
        assert!(signals.reviews_visible);
        assert!(signals.return_policy_mentioned);
        assert!(signals.size_or_spec_info_present);
        assert!(signals.in_stock_signal);
        assert!(signals.multiple_distinct_images);
        assert!(!signals.trust_badges_near_action);
    }

    #[test]
    fn test_sold_out_flips_stock_signal() {
        let snapshot = ProductSnapshot {
            body_text: "Linen Shirt — SOLD OUT".to_string(),
            ..Default::default()
        };
        assert!(!derive_product_signals(&snapshot, "https://x.example/p/1").in_stock_signal);
    }
}
