//! Raw facts collected inside the page
//!
//! These structs mirror the JSON returned by the scripts in
//! [`super::js_scripts`]. They carry no decisions: every field is a direct
//! observation (text, attributes, geometry) so that the heuristics in
//! [`crate::signals`] can run against static fixtures.

use serde::{Deserialize, Serialize};

/// Axis-aligned box in document coordinates (scroll offset already added)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkRef {
    /// Absolute href as resolved by the browser
    pub href: String,
    pub text: String,
}

/// One image, inline SVG or icon element that might be a trust badge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BadgeCandidate {
    pub tag: String,
    pub src: String,
    pub alt: String,
    pub title: String,
    pub aria_label: String,
    pub class_name: String,
    pub id: String,
    pub rect: Rect,
    pub in_footer: bool,
    /// Class and id values of up to five ancestors, space separated
    pub ancestor_markers: String,
    /// Images/SVGs sharing the candidate's parent, the candidate included
    pub sibling_icon_count: u32,
    /// Candidate sits in the same form or section as the primary call to action
    pub in_cta_container: bool,
}

impl BadgeCandidate {
    /// Lower-cased alt/title/aria-label/class/id/src, the text badge keywords match against
    pub fn haystack(&self) -> String {
        [
            self.alt.as_str(),
            self.title.as_str(),
            self.aria_label.as_str(),
            self.class_name.as_str(),
            self.id.as_str(),
            self.src.as_str(),
        ]
        .join(" ")
        .to_lowercase()
    }
}

/// Homepage snapshot taken in the desktop viewport
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DomSnapshot {
    pub final_url: String,
    pub viewport_height: f64,
    pub links: Vec<LinkRef>,
    pub body_text: String,
    /// Rendered HTML, only sent when `body_text` came back empty
    pub html_fallback: Option<String>,
    pub footer_text: String,
    pub contact_texts: Vec<String>,
    pub mailto_hrefs: Vec<String>,
    pub class_id_tokens: Vec<String>,
    pub iframe_srcs: Vec<String>,
    pub script_srcs: Vec<String>,
    pub footer: Option<Rect>,
    pub badge_candidates: Vec<BadgeCandidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    pub src: String,
    pub width: f64,
    pub height: f64,
}

/// Product-detail snapshot for the reduced heuristic pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductSnapshot {
    pub final_url: String,
    pub viewport_height: f64,
    pub body_text: String,
    pub class_id_tokens: Vec<String>,
    /// Primary add-to-cart / buy-now control, if one was found
    pub cta: Option<Rect>,
    pub badge_candidates: Vec<BadgeCandidate>,
    pub images: Vec<ImageRef>,
}
