use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AiAssessment, AssessError, AssessmentInput, DesignAssessor, parse_assessment};
use crate::AiConfig;
use crate::utils::constants::{ANTHROPIC_API_URL, MAX_PROVIDER_IMAGE_BYTES, MAX_PROVIDER_IMAGE_EDGE_PX};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const SYSTEM_PROMPT: &str = "You are a conversion-rate and e-commerce trust expert. \
You review storefront screenshots the way a first-time shopper would and judge \
whether the store looks legitimate and safe to buy from.";

/// Anthropic Messages API vision client
#[derive(Clone)]
pub struct ClaudeAssessor {
    api_key: String,
    model: String,
    max_tokens: u32,
    base_url: String,
    http: reqwest::Client,
}

impl ClaudeAssessor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            max_tokens: 1024,
            base_url: ANTHROPIC_API_URL.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Build from config, reading the key from `ANTHROPIC_API_KEY`
    pub fn from_config(config: &AiConfig) -> Result<Self, AssessError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AssessError::MissingApiKey("ANTHROPIC_API_KEY environment variable not set".into())
            })?;

        let mut assessor = Self::new(api_key, config.model.clone()).with_max_tokens(config.max_tokens);
        if let Some(url) = &config.base_url {
            assessor = assessor.with_base_url(url);
        }
        Ok(assessor)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap, AssessError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&self.api_key)
                .map_err(|e| AssessError::MissingApiKey(format!("invalid API key header: {e}")))?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    fn build_request(&self, input: AssessmentInput<'_>) -> Result<MessagesRequest, AssessError> {
        let schema = serde_json::to_string_pretty(&schemars::schema_for!(AiAssessment))
            .unwrap_or_default();

        check_image_limits(input.desktop_screenshot)?;
        let mut content = vec![
            ContentBlock::Text {
                text: "Desktop screenshot of the storefront homepage:".to_string(),
            },
            ContentBlock::image(input.desktop_screenshot),
        ];
        match input.mobile_screenshot.map(|mobile| (mobile, check_image_limits(mobile))) {
            Some((mobile, Ok(()))) => {
                content.push(ContentBlock::Text {
                    text: "Mobile screenshot of the same page:".to_string(),
                });
                content.push(ContentBlock::image(mobile));
            }
            Some((_, Err(e))) => warn!("Assessing desktop only, mobile screenshot dropped: {}", e),
            None => {}
        }
        content.push(ContentBlock::Text {
            text: format!(
                "Rate the visual trustworthiness of this store. Reply with a single JSON \
                 object and nothing else, matching this JSON schema:\n{schema}\n\
                 designScore is an integer from 1 to 10. priorityFixes holds at most five \
                 short, concrete instructions ordered by impact."
            ),
        });

        Ok(MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            system: SYSTEM_PROMPT.to_string(),
            temperature: 0.0,
            messages: vec![Message {
                role: "user",
                content,
            }],
        })
    }
}

/// Width and height from the IHDR chunk, `None` if `bytes` is not a PNG
fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    const SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
    if bytes.len() < 24 || !bytes.starts_with(SIGNATURE) || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

/// Reject images the API would refuse with a 400
fn check_image_limits(png: &[u8]) -> Result<(), AssessError> {
    let encoded_len = png.len().div_ceil(3) * 4;
    if encoded_len > MAX_PROVIDER_IMAGE_BYTES {
        return Err(AssessError::ImageTooLarge(format!("{encoded_len} bytes base64 encoded")));
    }
    match png_dimensions(png) {
        Some((width, height))
            if width >= MAX_PROVIDER_IMAGE_EDGE_PX || height >= MAX_PROVIDER_IMAGE_EDGE_PX =>
        {
            Err(AssessError::ImageTooLarge(format!("{width}x{height} px")))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl DesignAssessor for ClaudeAssessor {
    async fn assess(&self, input: AssessmentInput<'_>) -> Result<AiAssessment, AssessError> {
        let url = format!("{}/messages", self.base_url);
        let request = self.build_request(input)?;

        debug!(model = %self.model, "Claude design assessment request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AssessError::Status { status, body });
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AssessError::MalformedResponse(e.to_string()))?;

        let text: String = reply
            .content
            .iter()
            .filter_map(|block| match block {
                ResponseBlock::Text { text } => Some(text.as_str()),
                ResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        parse_assessment(&text)
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    temperature: f32,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: &'static str,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

impl ContentBlock {
    fn image(png: &[u8]) -> Self {
        ContentBlock::Image {
            source: ImageSource {
                source_type: "base64",
                media_type: "image/png",
                data: BASE64.encode(png),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: &'static str,
    media_type: &'static str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
