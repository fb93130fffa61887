//! Keyword vocabularies
//!
//! Every literal the heuristics match against lives here. All entries are
//! lower-case; callers lower-case the haystack before matching.

/// Link keywords per policy page family
pub const CONTACT_LINK_KEYWORDS: &[&str] = &["contact", "support"];
pub const ABOUT_LINK_KEYWORDS: &[&str] = &["about"];
pub const RETURN_LINK_KEYWORDS: &[&str] = &["return", "refund", "policy"];
pub const PRIVACY_LINK_KEYWORDS: &[&str] = &["privacy"];

/// Payment networks and wallets commonly shown as checkout icons
pub const PAYMENT_BRAND_KEYWORDS: &[&str] = &[
    "visa",
    "mastercard",
    "master-card",
    "amex",
    "american-express",
    "american express",
    "paypal",
    "apple-pay",
    "applepay",
    "apple pay",
    "google-pay",
    "googlepay",
    "google pay",
    "gpay",
    "shop-pay",
    "shoppay",
    "shop pay",
    "discover",
    "maestro",
    "diners",
    "jcb",
    "unionpay",
    "klarna",
    "afterpay",
    "affirm",
    "sezzle",
    "stripe",
    "venmo",
    "amazon-pay",
    "amazonpay",
];

/// Security seals and third-party endorsements
pub const TRUST_SECURITY_KEYWORDS: &[&str] = &[
    "ssl",
    "secure",
    "security",
    "norton",
    "mcafee",
    "truste",
    "verisign",
    "digicert",
    "sectigo",
    "comodo",
    "geotrust",
    "trustedsite",
    "trustpilot",
    "bbb",
    "better business",
    "verified",
    "certified",
    "encrypt",
    "protected",
    "guarantee",
    "money-back",
    "moneyback",
];

/// Words a designer uses when naming a badge asset
pub const GENERIC_BADGE_KEYWORDS: &[&str] = &[
    "badge",
    "seal",
    "trust",
    "payment",
    "checkout",
    "credit-card",
    "creditcard",
    "card-icon",
];

/// Social networks; an element matching any of these is never a badge
pub const SOCIAL_KEYWORDS: &[&str] = &[
    "facebook",
    "instagram",
    "twitter",
    "tiktok",
    "pinterest",
    "youtube",
    "linkedin",
    "snapchat",
    "whatsapp",
    "threads",
    "social",
];

/// Parent class/id fragments marking a payment or trust container
pub const BADGE_CONTAINER_HINTS: &[&str] = &[
    "payment",
    "trust",
    "badge",
    "secure",
    "security",
    "guarantee",
    "accepted-cards",
    "cards-accepted",
    "card-icons",
    "seal",
];

/// Class/id fragments of review widgets and rating apps
pub const REVIEW_WIDGET_MARKERS: &[&str] = &[
    "review",
    "rating",
    "stars",
    "yotpo",
    "judgeme",
    "jdgm",
    "trustpilot",
    "stamped",
    "okendo",
    "loox",
    "reviews-io",
    "feefo",
    "bazaarvoice",
    "powerreviews",
];

/// Chat vendors, matched against iframe/script sources and class/id tokens
pub const CHAT_WIDGET_MARKERS: &[&str] = &[
    "intercom",
    "drift",
    "zendesk",
    "zopim",
    "tawk",
    "livechat",
    "live-chat",
    "crisp",
    "tidio",
    "gorgias",
    "hubspot-messages",
    "olark",
    "freshchat",
    "chat-widget",
    "chatwidget",
    "shopify-chat",
    "inbox-chat",
];

/// Security seals that sometimes render as scripts or iframes instead of images
pub const SECURITY_SEAL_MARKERS: &[&str] = &[
    "norton",
    "mcafee",
    "trustedsite",
    "truste",
    "digicert",
    "sectigo",
    "comodo",
    "geotrust",
    "verisign",
];

pub const FREE_SHIPPING_PHRASES: &[&str] = &[
    "free shipping",
    "free delivery",
    "free standard shipping",
    "free express shipping",
    "ships free",
];

pub const DELIVERY_ESTIMATE_PHRASES: &[&str] = &[
    "delivery in",
    "delivered in",
    "ships within",
    "ships in",
    "dispatched within",
    "arrives in",
    "estimated delivery",
    "next day delivery",
    "same day delivery",
];

pub const MONEY_BACK_PHRASES: &[&str] = &[
    "money back",
    "money-back",
    "full refund",
    "100% refund",
    "satisfaction guaranteed",
];

pub const WARRANTY_PHRASES: &[&str] = &["warranty", "guarantee", "guaranteed"];

pub const SECURE_CHECKOUT_PHRASES: &[&str] = &[
    "secure checkout",
    "secure payment",
    "secure payments",
    "ssl",
    "encrypted",
    "256-bit",
    "safe checkout",
];

pub const PRESS_PHRASES: &[&str] = &[
    "as seen on",
    "as seen in",
    "as featured in",
    "featured in",
    "in the press",
    "press coverage",
];

pub const SUPPORT_HOURS_PHRASES: &[&str] = &["24/7", "24 hours a day", "business hours", "opening hours"];

/// Local parts of auto-generated mailboxes
pub const NO_REPLY_PREFIXES: &[&str] = &["noreply", "no-reply", "donotreply", "do-not-reply"];

/// Local parts that only appear in form placeholders and templates
pub const PLACEHOLDER_EMAIL_PREFIXES: &[&str] = &["email@", "name@", "your@", "youremail@", "user@"];

/// Asset suffixes the loose email pattern picks up from `icon@2x.png` style names
pub const ASSET_FILE_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".svg", ".webp", ".avif", ".ico", ".bmp", ".js", ".mjs",
    ".css", ".woff", ".woff2", ".ttf", ".otf", ".eot",
];

/// Mailboxes most storefronts publish
pub const COMMON_MAILBOXES: &[&str] = &["support", "info", "hello", "contact", "help", "sales"];

/// Path fragments of product-detail URLs across the common platforms
pub const PRODUCT_PATH_PATTERNS: &[&str] = &["/products/", "/product/", "/item/", "/items/", "/p/", "/dp/"];

pub const PRODUCT_RETURN_PHRASES: &[&str] = &[
    "return policy",
    "returns policy",
    "free returns",
    "easy returns",
    "day returns",
    "day return",
    "money back",
    "refund",
];

pub const SIZE_SPEC_PHRASES: &[&str] = &[
    "size guide",
    "size chart",
    "sizing",
    "fit guide",
    "specifications",
    "specs",
    "dimensions",
    "measurements",
    "materials",
    "material:",
];

pub const SOLD_OUT_PHRASES: &[&str] = &["sold out", "out of stock", "currently unavailable"];

/// First substring of `haystack` found in `table`
pub fn first_match<'a>(haystack: &str, table: &[&'a str]) -> Option<&'a str> {
    table.iter().copied().find(|kw| haystack.contains(kw))
}

pub fn contains_any(haystack: &str, table: &[&str]) -> bool {
    first_match(haystack, table).is_some()
}
