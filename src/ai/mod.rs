//! AI design assessment
//!
//! The provider is a black box: screenshots go in, an [`AiAssessment`] or
//! nothing comes out. [`assess_or_none`] is the call boundary; every failure
//! past it is logged and turned into `None` so scoring can proceed without
//! the AI category.

mod claude;

pub use claude::ClaudeAssessor;

use std::time::Duration;

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Structured verdict returned by the vision model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AiAssessment {
    /// Overall visual trustworthiness, 1 (poor) to 10 (excellent)
    #[serde(deserialize_with = "clamped_design_score")]
    pub design_score: u8,
    /// Two or three sentences on how trustworthy the design looks
    pub assessment: String,
    /// Concrete fixes, most important first
    #[serde(default)]
    pub priority_fixes: Vec<String>,
    /// How the store compares with typical stores in its niche
    #[serde(default)]
    pub niche_comparison: String,
}

/// Highest design score a provider can award
pub const MAX_DESIGN_SCORE: u8 = 10;

/// Accept any finite JSON number and round it into 0..=10
fn clamped_design_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(D::Error::custom("designScore is not a finite number"));
    }
    Ok(raw.round().clamp(0.0, f64::from(MAX_DESIGN_SCORE)) as u8)
}

/// Screenshots handed to the provider
#[derive(Debug, Clone, Copy)]
pub struct AssessmentInput<'a> {
    pub desktop_screenshot: &'a [u8],
    pub mobile_screenshot: Option<&'a [u8]>,
}

#[derive(Error, Debug)]
pub enum AssessError {
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Screenshot exceeds provider limits: {0}")]
    ImageTooLarge(String),

    #[error("Malformed model response: {0}")]
    MalformedResponse(String),

    #[error("Assessment timed out after {0}s")]
    Timeout(u64),
}

/// Anything that can turn screenshots into an [`AiAssessment`]
#[async_trait]
pub trait DesignAssessor: Send + Sync {
    async fn assess(&self, input: AssessmentInput<'_>) -> Result<AiAssessment, AssessError>;
}

/// Run the assessor under `timeout`; any error or timeout becomes `None`
pub async fn assess_or_none(
    assessor: &dyn DesignAssessor,
    input: AssessmentInput<'_>,
    timeout: Duration,
) -> Option<AiAssessment> {
    let outcome = match tokio::time::timeout(timeout, assessor.assess(input)).await {
        Ok(result) => result,
        Err(_) => Err(AssessError::Timeout(timeout.as_secs())),
    };

    match outcome {
        Ok(assessment) => {
            info!(design_score = assessment.design_score, "AI design assessment received");
            Some(assessment)
        }
        Err(e) => {
            warn!("AI design assessment unavailable, scoring without it: {}", e);
            None
        }
    }
}

/// Extract the first JSON object from a model reply
///
/// Models sometimes wrap the object in a Markdown fence or add a sentence
/// before it; everything outside the outermost braces is ignored.
pub fn parse_assessment(text: &str) -> Result<AiAssessment, AssessError> {
    let start = text
        .find('{')
        .ok_or_else(|| AssessError::MalformedResponse("no JSON object in reply".to_string()))?;
    let end = text
        .rfind('}')
        .filter(|end| *end > start)
        .ok_or_else(|| AssessError::MalformedResponse("unterminated JSON object".to_string()))?;

    serde_json::from_str(&text[start..=end]).map_err(|e| AssessError::MalformedResponse(e.to_string()))
}
