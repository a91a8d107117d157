//! GeminiProvider -- concrete [`LlmProvider`] implementation for Google Gemini.
//!
//! Sends requests to `{base_url}/models/{model}:generateContent` with the
//! `x-goog-api-key` header. Image parts are sent inline as base64.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};

use gemchat_core::llm::provider::LlmProvider;
use gemchat_types::config::GeminiConfig;
use gemchat_types::llm::{
    CompletionRequest, CompletionResponse, ContentPart, LlmError, MessageRole,
    ProviderCapabilities, StopReason, Usage,
};

use super::types::{
    GeminiContent, GeminiErrorResponse, GeminiPart, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig,
};

/// Google Gemini LLM provider.
///
/// No `Debug` derive: the struct holds the API key.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    capabilities: ProviderCapabilities,
}

impl GeminiProvider {
    /// Create a provider from the `[gemini]` config section.
    pub fn new(api_key: SecretString, config: &GeminiConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            capabilities: ProviderCapabilities {
                vision: true,
                max_context_tokens: 1_048_576,
                max_output_tokens: config.max_output_tokens,
            },
        })
    }

    /// Build the `generateContent` URL for a model.
    fn url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Convert a generic [`CompletionRequest`] into a Gemini request body.
    fn to_gemini_request(request: &CompletionRequest) -> GenerateContentRequest {
        let contents = request
            .messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        MessageRole::User => "user",
                        MessageRole::Assistant => "model",
                    }
                    .to_string(),
                ),
                parts: m
                    .parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => GeminiPart::text(text.clone()),
                        ContentPart::Image { mime_type, data } => {
                            GeminiPart::inline(mime_type.clone(), STANDARD.encode(data))
                        }
                    })
                    .collect(),
            })
            .collect();

        GenerateContentRequest {
            contents,
            system_instruction: request.system.as_ref().map(|s| GeminiContent {
                role: None,
                parts: vec![GeminiPart::text(s.clone())],
            }),
            generation_config: Some(GenerationConfig {
                max_output_tokens: (request.max_tokens > 0).then_some(request.max_tokens),
                temperature: request.temperature,
            }),
        }
    }

    /// Map a non-2xx response to an [`LlmError`].
    fn map_error(status: reqwest::StatusCode, retry_after: Option<u64>, body: &str) -> LlmError {
        let parsed = serde_json::from_str::<GeminiErrorResponse>(body).ok();
        let message = parsed
            .as_ref()
            .map(|e| e.error.message.clone())
            .unwrap_or_else(|| body.to_string());

        match status.as_u16() {
            401 | 403 => LlmError::AuthenticationFailed,
            // An unknown key comes back as 400 INVALID_ARGUMENT.
            400 if message.contains("API key") => LlmError::AuthenticationFailed,
            400 => LlmError::InvalidRequest(message),
            429 => LlmError::RateLimited {
                retry_after_ms: retry_after.map(|secs| secs * 1_000),
            },
            503 => LlmError::Overloaded(message),
            _ => LlmError::Provider {
                message: format!("HTTP {status}: {message}"),
            },
        }
    }
}

fn map_finish_reason(reason: Option<&str>) -> StopReason {
    match reason {
        Some("MAX_TOKENS") => StopReason::MaxTokens,
        Some("SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII") => {
            StopReason::ContentFilter
        }
        _ => StopReason::EndTurn,
    }
}

impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn capabilities(&self) -> &ProviderCapabilities {
        &self.capabilities
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let model = if request.model.is_empty() {
            self.model.as_str()
        } else {
            request.model.as_str()
        };
        let body = Self::to_gemini_request(request);

        let response = self
            .client
            .post(self.url(model))
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            return Err(Self::map_error(status, retry_after, &error_body));
        }

        let gemini_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            LlmError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        let candidate = gemini_resp
            .candidates
            .first()
            .ok_or_else(|| LlmError::Provider {
                message: "response contained no candidates".to_string(),
            })?;

        let usage = gemini_resp
            .usage_metadata
            .as_ref()
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            id: gemini_resp.response_id.clone().unwrap_or_default(),
            content: candidate.text(),
            model: gemini_resp
                .model_version
                .clone()
                .unwrap_or_else(|| model.to_string()),
            stop_reason: map_finish_reason(candidate.finish_reason.as_deref()),
            usage,
        })
    }
}
