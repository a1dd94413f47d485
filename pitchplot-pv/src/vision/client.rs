//! Anthropic Messages API client
//!
//! Submits one image plus the extraction instruction and returns the raw
//! reply text. Callers must treat that text as untrusted; the JSON
//! recovery and record validation stages exist because this boundary
//! provides no structural guarantee.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use pitchplot_common::config::VisionConfig;

use super::prompt::EXTRACTION_PROMPT;

const USER_AGENT: &str = "PitchPlot/0.1.0 (https://github.com/pitchplot/pitchplot)";

/// Protocol version header required by the Messages API
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Extraction provider errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VisionError {
    /// No API key in configuration or environment
    #[error("API key not configured")]
    MissingApiKey,

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Provider returned an error response; the raw provider message is
    /// surfaced as-is
    #[error("{1}")]
    Api(u16, String),

    /// Failed to parse the provider response envelope
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Boundary to the multimodal extraction provider.
///
/// Implementations submit an image and return the raw text of the model's
/// reply, concatenated across reply blocks.
#[async_trait]
pub trait TableExtractor: Send + Sync {
    async fn extract_table(
        &self,
        image_base64: &str,
        media_type: &str,
    ) -> Result<String, VisionError>;
}

/// Anthropic Messages API client
pub struct AnthropicClient {
    http_client: reqwest::Client,
    config: VisionConfig,
}

impl AnthropicClient {
    /// Create a new client from vision settings.
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VisionError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn build_request<'a>(
        &'a self,
        image_base64: &'a str,
        media_type: &'a str,
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentBlock::Image {
                        source: ImageSource {
                            kind: "base64",
                            media_type,
                            data: image_base64,
                        },
                    },
                    ContentBlock::Text {
                        text: EXTRACTION_PROMPT,
                    },
                ],
            }],
        }
    }
}

#[async_trait]
impl TableExtractor for AnthropicClient {
    async fn extract_table(
        &self,
        image_base64: &str,
        media_type: &str,
    ) -> Result<String, VisionError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(VisionError::MissingApiKey)?;

        let url = format!("{}/v1/messages", self.config.base_url);
        let request = self.build_request(image_base64, media_type);

        tracing::debug!(model = %self.config.model, media_type = %media_type, "Submitting extraction request");

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| VisionError::Network(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let message = provider_message(response).await;
            return Err(VisionError::Api(status.as_u16(), message));
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| VisionError::Parse(e.to_string()))?;

        let text: String = reply
            .content
            .iter()
            .filter_map(|block| block.text.as_deref())
            .collect();

        tracing::info!(reply_chars = text.chars().count(), "Extraction reply received");

        Ok(text)
    }
}

/// Pull the nested message out of a provider error body, with a fixed
/// fallback when the body is unreadable.
async fn provider_message(response: reqwest::Response) -> String {
    match response.json::<ProviderErrorBody>().await {
        Ok(body) => body
            .error
            .and_then(|e| e.message)
            .unwrap_or_else(|| "API request failed".to_string()),
        Err(_) => "API request failed".to_string(),
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: Vec<ContentBlock<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock<'a> {
    Image { source: ImageSource<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ReplyBlock>,
}

/// One block of the reply. Non-text blocks deserialize with `text: None`
/// and contribute nothing to the joined reply.
#[derive(Debug, Deserialize)]
struct ReplyBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}
