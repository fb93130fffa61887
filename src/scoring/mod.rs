//! Deterministic trust score
//!
//! Pure function of [`PageSignals`]: six fixed categories worth 85 points,
//! plus up to 15 points from the AI design assessment when one is present.

pub mod recommendations;

use serde::{Deserialize, Serialize};

use crate::ai::MAX_DESIGN_SCORE;
use crate::signals::PageSignals;
pub use recommendations::{Level, Priority, Recommendation};

pub const TRUST_BADGE_POINTS: u32 = 25;
pub const SSL_POINTS: u32 = 20;
pub const PAGE_POINTS: u32 = 10;
pub const AI_DESIGN_POINTS: u32 = 15;
pub const MAX_SCORE: u32 = 100;

/// Scores at or below this get the generic design recommendation
pub const DESIGN_PASS_THRESHOLD: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    TrustBadges,
    Ssl,
    ContactPage,
    AboutPage,
    ReturnPolicy,
    PrivacyPolicy,
    AiDesign,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::TrustBadges => "Trust badges above fold",
            Category::Ssl => "SSL certificate",
            Category::ContactPage => "Contact page",
            Category::AboutPage => "About page",
            Category::ReturnPolicy => "Return policy",
            Category::PrivacyPolicy => "Privacy policy",
            Category::AiDesign => "AI design analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

impl Grade {
    pub fn from_score(score: u32) -> Self {
        match score {
            90.. => Grade::A,
            80..=89 => Grade::B,
            60..=79 => Grade::C,
            _ => Grade::D,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownEntry {
    pub category: Category,
    pub points_awarded: u32,
    pub max_points: u32,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub score: u32,
    pub grade: Grade,
    pub breakdown: Vec<BreakdownEntry>,
    pub recommendations: Vec<Recommendation>,
}

/// Points for a design score, clamped to 0..=10 first
pub fn design_points(design_score: u8) -> u32 {
    // round(score / 10 * 15) in integers, halves round up
    (u32::from(design_score.min(MAX_DESIGN_SCORE)) * AI_DESIGN_POINTS + 5) / 10
}

/// Score one page's signals
pub fn score(signals: &PageSignals) -> ScoreResult {
    let fixed = [
        (Category::TrustBadges, TRUST_BADGE_POINTS, !signals.trust_badges.above_fold_items.is_empty()),
        (Category::Ssl, SSL_POINTS, signals.is_secure),
        (Category::ContactPage, PAGE_POINTS, signals.pages.has_contact),
        (Category::AboutPage, PAGE_POINTS, signals.pages.has_about),
        (Category::ReturnPolicy, PAGE_POINTS, signals.pages.has_return_policy),
        (Category::PrivacyPolicy, PAGE_POINTS, signals.pages.has_privacy_policy),
    ];

    let mut breakdown = Vec::with_capacity(fixed.len() + 1);
    let mut recommendations = Vec::new();

    for (category, max_points, passed) in fixed {
        breakdown.push(BreakdownEntry {
            category,
            points_awarded: if passed { max_points } else { 0 },
            max_points,
            passed,
        });
        if !passed {
            recommendations.push(recommendations::for_category(category));
        }
    }

    if let Some(ai) = &signals.ai_assessment {
        let passed = ai.design_score.min(MAX_DESIGN_SCORE) > DESIGN_PASS_THRESHOLD;
        breakdown.push(BreakdownEntry {
            category: Category::AiDesign,
            points_awarded: design_points(ai.design_score),
            max_points: AI_DESIGN_POINTS,
            passed,
        });
        recommendations.extend(ai.priority_fixes.iter().map(|fix| recommendations::design_fix(fix)));
        if !passed {
            recommendations.push(recommendations::for_category(Category::AiDesign));
        }
    }

    // Stable: equal priorities keep category order
    recommendations.sort_by_key(|r| r.priority);

    let total = breakdown.iter().map(|e| e.points_awarded).sum::<u32>().min(MAX_SCORE);

    ScoreResult {
        score: total,
        grade: Grade::from_score(total),
        breakdown,
        recommendations,
    }
}
