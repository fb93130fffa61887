//! Signal records produced by one scan

use serde::{Deserialize, Serialize};

use crate::ai::AiAssessment;

/// Everything the extractor learned about one storefront
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSignals {
    pub url: String,
    pub is_secure: bool,
    pub pages: PolicyPages,
    pub emails: Vec<String>,
    pub has_reviews: bool,
    pub trust_badges: TrustBadges,
    pub shipping: ShippingSignals,
    pub guarantees: GuaranteeSignals,
    pub security: SecuritySignals,
    pub social_proof: SocialProofSignals,
    pub support: SupportSignals,
    pub screenshots: Screenshots,
    pub product_page: Option<ProductSignals>,
    pub ai_assessment: Option<AiAssessment>,
}

impl PageSignals {
    /// All-default record for a page whose heuristics could not be evaluated
    ///
    /// Transport facts come from navigation, not from the DOM, so they survive.
    pub fn unevaluated(url: impl Into<String>, is_secure: bool) -> Self {
        Self {
            url: url.into(),
            is_secure,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPages {
    pub has_contact: bool,
    pub has_about: bool,
    pub has_return_policy: bool,
    pub has_privacy_policy: bool,
}

/// Badge inventory; `above_fold_items` and `total_count` are derived from `items`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrustBadges {
    pub total_count: usize,
    pub items: Vec<Badge>,
    pub above_fold_items: Vec<Badge>,
}

impl TrustBadges {
    pub fn from_items(items: Vec<Badge>) -> Self {
        let above_fold_items = items.iter().filter(|b| b.is_above_fold).cloned().collect();
        Self {
            total_count: items.len(),
            items,
            above_fold_items,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Payment,
    Security,
    Generic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub kind: BadgeKind,
    pub source_ref: String,
    pub alt_text: String,
    pub top_offset_px: f64,
    pub left_offset_px: f64,
    pub is_above_fold: bool,
    pub match_reason: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSignals {
    pub free_shipping_mentioned: bool,
    pub delivery_estimate_mentioned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuaranteeSignals {
    pub money_back_mentioned: bool,
    pub warranty_mentioned: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySignals {
    pub secure_checkout_mentioned: bool,
    pub security_badge_detected: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProofSignals {
    pub customer_count_mentioned: bool,
    pub press_mention_detected: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportSignals {
    pub live_chat_widget_detected: bool,
    pub support_hours_mentioned: bool,
}

/// PNG captures; serialised as base64 strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Screenshots {
    #[serde(with = "base64_image")]
    pub desktop: Option<Vec<u8>>,
    #[serde(with = "base64_image")]
    pub mobile: Option<Vec<u8>>,
}

/// Reduced signal set for one product-detail page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSignals {
    pub found: bool,
    pub url: Option<String>,
    pub reviews_visible: bool,
    pub trust_badges_near_action: bool,
    pub return_policy_mentioned: bool,
    pub size_or_spec_info_present: bool,
    pub in_stock_signal: bool,
    pub multiple_distinct_images: bool,
    pub screenshots: Screenshots,
}

impl ProductSignals {
    pub fn not_found() -> Self {
        Self::default()
    }
}

mod base64_image {
    use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(bytes) => serializer.serialize_some(&BASE64.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|s| BASE64.decode(s.as_bytes()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
