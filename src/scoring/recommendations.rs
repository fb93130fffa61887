//! Static remediation catalogue
//!
//! One fixed entry per scoring category. The text is deliberately plain so
//! it can be shown to a store owner without editing.

use serde::{Deserialize, Serialize};

use super::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub issue_title: String,
    pub impact_level: Level,
    pub effort_level: Level,
    pub estimated_cost: String,
    pub fix_instructions: String,
}

struct CatalogueEntry {
    priority: Priority,
    issue_title: &'static str,
    impact_level: Level,
    effort_level: Level,
    estimated_cost: &'static str,
    fix_instructions: &'static str,
}

impl CatalogueEntry {
    fn to_recommendation(&self) -> Recommendation {
        Recommendation {
            priority: self.priority,
            issue_title: self.issue_title.to_string(),
            impact_level: self.impact_level,
            effort_level: self.effort_level,
            estimated_cost: self.estimated_cost.to_string(),
            fix_instructions: self.fix_instructions.to_string(),
        }
    }
}

const TRUST_BADGES: CatalogueEntry = CatalogueEntry {
    priority: Priority::High,
    issue_title: "No trust badges visible above the fold",
    impact_level: Level::High,
    effort_level: Level::Low,
    estimated_cost: "Free",
    fix_instructions: "Show accepted payment icons (Visa, Mastercard, PayPal, Apple Pay) and a \
        secure-checkout badge in the header, hero section or next to the main call to action \
        so shoppers see them without scrolling.",
};

const SSL: CatalogueEntry = CatalogueEntry {
    priority: Priority::Critical,
    issue_title: "Site is not served over HTTPS",
    impact_level: Level::High,
    effort_level: Level::Low,
    estimated_cost: "Free - $50/year",
    fix_instructions: "Install an SSL certificate (Let's Encrypt is free, most store platforms \
        include one) and redirect every http:// request to https:// so browsers stop showing \
        \"Not secure\".",
};

const CONTACT_PAGE: CatalogueEntry = CatalogueEntry {
    priority: Priority::High,
    issue_title: "No contact page linked",
    impact_level: Level::High,
    effort_level: Level::Low,
    estimated_cost: "Free",
    fix_instructions: "Add a Contact page with a support email, a contact form and, if possible, \
        a phone number and business address. Link it from the header or footer.",
};

const ABOUT_PAGE: CatalogueEntry = CatalogueEntry {
    priority: Priority::Medium,
    issue_title: "No about page linked",
    impact_level: Level::Medium,
    effort_level: Level::Low,
    estimated_cost: "Free",
    fix_instructions: "Publish an About Us page that tells who runs the store, where it is based \
        and why it exists. Real photos of the team or workspace help. Link it from the footer.",
};

const RETURN_POLICY: CatalogueEntry = CatalogueEntry {
    priority: Priority::High,
    issue_title: "No return or refund policy linked",
    impact_level: Level::High,
    effort_level: Level::Low,
    estimated_cost: "Free",
    fix_instructions: "Write a clear return and refund policy (time window, condition, who pays \
        return shipping, how refunds are issued) and link it from the footer and product pages.",
};

const PRIVACY_POLICY: CatalogueEntry = CatalogueEntry {
    priority: Priority::Medium,
    issue_title: "No privacy policy linked",
    impact_level: Level::Medium,
    effort_level: Level::Low,
    estimated_cost: "Free",
    fix_instructions: "Add a privacy policy describing what customer data is collected, how it \
        is used and how to request deletion. Link it from the footer and checkout.",
};

const DESIGN_IMPROVEMENT: CatalogueEntry = CatalogueEntry {
    priority: Priority::Medium,
    issue_title: "Store design needs improvement",
    impact_level: Level::High,
    effort_level: Level::Medium,
    estimated_cost: "$200 - $2,000",
    fix_instructions: "Use a consistent, professional theme with high-quality product imagery, \
        readable typography and a clear visual hierarchy. Remove clutter, broken elements and \
        placeholder content.",
};

/// The fixed recommendation for a failing category
pub fn for_category(category: Category) -> Recommendation {
    match category {
        Category::TrustBadges => TRUST_BADGES.to_recommendation(),
        Category::Ssl => SSL.to_recommendation(),
        Category::ContactPage => CONTACT_PAGE.to_recommendation(),
        Category::AboutPage => ABOUT_PAGE.to_recommendation(),
        Category::ReturnPolicy => RETURN_POLICY.to_recommendation(),
        Category::PrivacyPolicy => PRIVACY_POLICY.to_recommendation(),
        Category::AiDesign => DESIGN_IMPROVEMENT.to_recommendation(),
    }
}

/// One AI-suggested fix, carried verbatim
pub fn design_fix(instruction: &str) -> Recommendation {
    Recommendation {
        priority: Priority::Medium,
        issue_title: "AI design recommendation".to_string(),
        impact_level: Level::Medium,
        effort_level: Level::Medium,
        estimated_cost: "Varies".to_string(),
        fix_instructions: instruction.to_string(),
    }
}
