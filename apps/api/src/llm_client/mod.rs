/// LLM Client — the single point of entry for all generation-service calls.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All generation goes through `GenerationService`, which `LlmClient` implements.
///
/// One submission = one HTTP call. There is no retry: a failed call is turned into
/// `GenerationResult::Failure` and the operator resubmits if they want another try.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::prompt::assembler::GenerationRequest;

pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/responses";
pub const DEFAULT_MODEL: &str = "gpt-4.1";
const WEB_SEARCH_TOOL: &str = "web_search";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("generation service returned an empty response")]
    EmptyContent,
}

/// Outcome of one generation call. Both variants are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationResult {
    Success { text: String },
    Failure { error: String },
}

impl GenerationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResult::Success { .. })
    }
}

/// The generation seam. `AppState` carries an `Arc<dyn GenerationService>` so the
/// pipeline can be exercised without a live service.
///
/// Implementations must never fail outward: every error becomes `GenerationResult::Failure`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest, max_output_tokens: u32)
        -> GenerationResult;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI Responses API)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    tools: Vec<ToolSpec>,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ToolSpec {
    #[serde(rename = "type")]
    tool_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ResponsesResponse {
    #[serde(default)]
    pub output: Vec<OutputItem>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct OutputItem {
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub part_type: String,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` part of every message item.
    /// Web-search call items carry no text and are skipped.
    pub fn text(&self) -> Option<String> {
        let messages: Vec<String> = self
            .output
            .iter()
            .filter(|item| item.item_type == "message")
            .map(|item| {
                item.content
                    .iter()
                    .filter(|part| part.part_type == "output_text")
                    .filter_map(|part| part.text.as_deref())
                    .collect::<String>()
            })
            .filter(|text| !text.trim().is_empty())
            .collect();

        if messages.is_empty() {
            None
        } else {
            Some(messages.join("\n\n"))
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
}

impl std::fmt::Debug for LlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl LlmClient {
    /// `timeout` of `None` leaves the transport default in place (no overall timeout).
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api_key,
            api_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Makes exactly one call and returns the response text.
    pub async fn call(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> Result<String, LlmError> {
        let tools = if request.browsing_enabled {
            vec![ToolSpec {
                tool_type: WEB_SEARCH_TOOL,
            }]
        } else {
            Vec::new()
        };

        let body = ResponsesRequest {
            model: &self.model,
            instructions: &request.instructions,
            input: &request.task,
            tools,
            max_output_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&raw)
                .map(|e| e.error.message)
                .unwrap_or(raw);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ResponsesResponse = serde_json::from_str(&raw)?;

        if let Some(usage) = &parsed.usage {
            debug!(
                "Generation succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        parsed.text().ok_or(LlmError::EmptyContent)
    }
}

#[async_trait]
impl GenerationService for LlmClient {
    async fn generate(
        &self,
        request: &GenerationRequest,
        max_output_tokens: u32,
    ) -> GenerationResult {
        info!(
            "Generating for path {} (model: {}, max_output_tokens: {})",
            request.path, self.model, max_output_tokens
        );

        match self.call(request, max_output_tokens).await {
            Ok(text) => GenerationResult::Success { text },
            Err(e) => {
                error!("Generation failed for path {}: {e}", request.path);
                GenerationResult::Failure {
                    error: e.to_string(),
                }
            }
        }
    }
}
