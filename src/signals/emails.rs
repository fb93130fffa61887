//! Email discovery
//!
//! Five independent detectors each return candidates tagged with where they
//! were found. [`discover_emails`] unions them, then a single filter/rank step
//! produces the published list.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::vocab::{
    ASSET_FILE_EXTENSIONS, COMMON_MAILBOXES, NO_REPLY_PREFIXES, PLACEHOLDER_EMAIL_PREFIXES,
};
use crate::page_extractor::DomSnapshot;

/// Loose match; `filter_and_rank` removes the over-matches
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").expect("valid regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailSource {
    BodyText,
    Footer,
    ContactBlock,
    Mailto,
    DomainGuess,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCandidate {
    pub address: String,
    pub source: EmailSource,
}

fn scan_text(text: &str, source: EmailSource) -> Vec<EmailCandidate> {
    EMAIL_PATTERN
        .find_iter(text)
        .map(|m| EmailCandidate {
            address: m.as_str().to_string(),
            source,
        })
        .collect()
}

pub fn from_body_text(snapshot: &DomSnapshot) -> Vec<EmailCandidate> {
    scan_text(&snapshot.body_text, EmailSource::BodyText)
}

pub fn from_footer(snapshot: &DomSnapshot) -> Vec<EmailCandidate> {
    scan_text(&snapshot.footer_text, EmailSource::Footer)
}

pub fn from_contact_blocks(snapshot: &DomSnapshot) -> Vec<EmailCandidate> {
    snapshot
        .contact_texts
        .iter()
        .flat_map(|text| scan_text(text, EmailSource::ContactBlock))
        .collect()
}

pub fn from_mailto(snapshot: &DomSnapshot) -> Vec<EmailCandidate> {
    snapshot
        .mailto_hrefs
        .iter()
        .filter_map(|href| {
            let trimmed = href.trim();
            let lower = trimmed.to_ascii_lowercase();
            let rest = if lower.starts_with("mailto:") {
                &trimmed["mailto:".len()..]
            } else {
                trimmed
            };
            let address = rest.split('?').next().unwrap_or_default().trim();
            // mailto:a@x.com,b@x.com lists several recipients
            let first = address.split(',').next().unwrap_or_default().trim();
            if first.contains('@') {
                Some(EmailCandidate {
                    address: first.to_string(),
                    source: EmailSource::Mailto,
                })
            } else {
                None
            }
        })
        .collect()
}

/// Common mailboxes at the page's own domain that appear literally in the body
pub fn from_domain_guess(snapshot: &DomSnapshot, domain: &str) -> Vec<EmailCandidate> {
    if domain.is_empty() {
        return Vec::new();
    }
    let body = snapshot.body_text.to_lowercase();
    COMMON_MAILBOXES
        .iter()
        .map(|mailbox| format!("{mailbox}@{domain}"))
        .filter(|address| body.contains(address.as_str()))
        .map(|address| EmailCandidate {
            address,
            source: EmailSource::DomainGuess,
        })
        .collect()
}

fn is_publishable(address: &str) -> bool {
    if NO_REPLY_PREFIXES.iter().any(|p| address.starts_with(p)) {
        return false;
    }
    if PLACEHOLDER_EMAIL_PREFIXES.iter().any(|p| address.starts_with(p)) {
        return false;
    }
    if ASSET_FILE_EXTENSIONS.iter().any(|ext| address.ends_with(ext)) {
        return false;
    }
    true
}

/// Lower-case, trim, dedup, filter, then move page-domain addresses first
///
/// The sort is stable, so discovery order is kept within each group.
pub fn filter_and_rank<I>(candidates: I, domain: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    let mut emails: Vec<String> = candidates
        .into_iter()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .filter(|c| seen.insert(c.clone()))
        .filter(|c| is_publishable(c))
        .collect();

    if !domain.is_empty() {
        let domain = domain.to_lowercase();
        emails.sort_by_key(|e| !e.contains(&domain));
    }
    emails
}

/// Run every detector against the snapshot and produce the ranked list
pub fn discover_emails(snapshot: &DomSnapshot, domain: &str) -> Vec<String> {
    let candidates = from_body_text(snapshot)
        .into_iter()
        .chain(from_footer(snapshot))
        .chain(from_contact_blocks(snapshot))
        .chain(from_mailto(snapshot))
        .chain(from_domain_guess(snapshot, domain));

    filter_and_rank(candidates.map(|c| c.address), domain)
}
