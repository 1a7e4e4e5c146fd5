//! Size-chart extraction from images
//!
//! A [`ChartExtractor`] turns a size-chart image URL into a [`SizeChart`].
//! [`HttpChartExtractor`] does this through an OpenAI-compatible vision
//! chat-completion endpoint.

use async_trait::async_trait;
use fairshelf_core::SizeChart;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_EXTRACTOR_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_EXTRACTOR_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_EXTRACTION_TIMEOUT: Duration = Duration::from_secs(30);

const CHART_PROMPT: &str = r#"Analyze this size chart image and extract all size measurements.

Return a JSON object where:
- Keys are the size labels (XS, S, M, L, XL, etc. OR measurements like 28x30, 32x32)
- Values are objects containing measurements in INCHES

Expected measurements to extract (if visible):
- chest: Chest/bust measurement
- waist: Waist measurement
- hip: Hip measurement
- length: Body/torso length
- inseam: Inseam length (for pants)
- shoulder: Shoulder width

Example output format:
{
    "S": {"chest": 36, "waist": 30, "length": 27},
    "M": {"chest": 38, "waist": 32, "length": 28},
    "L": {"chest": 40, "waist": 34, "length": 29}
}

If a measurement is in centimeters, convert to inches (divide by 2.54).
Only return the JSON, no other text."#;

/// Errors that can occur while extracting a size chart
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Chart extractor has no API key configured")]
    NotConfigured,

    #[error("Request to chart extractor failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Chart extractor returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chart extractor returned no content")]
    EmptyResponse,

    #[error("Could not parse size chart: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Turns a size-chart image into a structured chart
#[async_trait]
pub trait ChartExtractor: Send + Sync {
    async fn extract(&self, image_url: &str) -> Result<SizeChart, ExtractionError>;
}

/// Settings for [`HttpChartExtractor`]
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_EXTRACTOR_URL.to_string(),
            model: DEFAULT_EXTRACTOR_MODEL.to_string(),
            api_key: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_EXTRACTION_TIMEOUT,
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Extracts charts through a vision chat-completion API
#[derive(Debug, Clone)]
pub struct HttpChartExtractor {
    client: reqwest::Client,
    config: ExtractorConfig,
}

impl HttpChartExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractionError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }
}

#[async_trait]
impl ChartExtractor for HttpChartExtractor {
    async fn extract(&self, image_url: &str) -> Result<SizeChart, ExtractionError> {
        let api_key = self.config.api_key.as_deref().ok_or(ExtractionError::NotConfigured)?;

        let body = json!({
            "model": self.config.model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": CHART_PROMPT},
                    {"type": "image_url", "image_url": {"url": image_url}}
                ]
            }],
            "max_tokens": self.config.max_tokens,
        });

        debug!("Requesting size chart extraction for {}", image_url);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ExtractionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(ExtractionError::EmptyResponse)?;

        parse_chart(&content)
    }
}

/// Parse a chart from model output, tolerating Markdown code fences
pub fn parse_chart(content: &str) -> Result<SizeChart, ExtractionError> {
    Ok(serde_json::from_str(strip_code_fences(content))?)
}

/// Body of the first fenced block (preferring a `json` fence), or the
/// trimmed input when there is none
pub fn strip_code_fences(content: &str) -> &str {
    let inner = if let Some((_, rest)) = content.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = content.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        content
    };
    inner.trim()
}
