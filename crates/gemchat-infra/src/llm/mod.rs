//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined in
//! `gemchat-core`, a factory ([`create_gemini_provider`]) that builds it from
//! config and a credential, and a connection test ([`test_provider_connection`])
//! used for the startup probe.
//!
//! [`LlmProvider`]: gemchat_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use gemchat_core::llm::box_provider::BoxLlmProvider;
use gemchat_types::config::GeminiConfig;
use gemchat_types::llm::{CompletionRequest, LlmError, Message};

use self::gemini::GeminiProvider;

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Read the Gemini API key from the environment.
///
/// Unset and empty values both mean "no credential".
pub fn api_key_from_env() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

/// Create a [`BoxLlmProvider`] for Gemini from config and an API key.
pub fn create_gemini_provider(
    config: &GeminiConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, LlmError> {
    let provider = GeminiProvider::new(api_key, config)?;
    Ok(BoxLlmProvider::new(provider))
}

/// Test provider connectivity by sending a minimal completion request.
///
/// Sends a tiny "Hello" message with a minimal token budget.
pub async fn test_provider_connection(provider: &BoxLlmProvider) -> Result<(), LlmError> {
    let request = CompletionRequest {
        model: String::new(), // Provider uses its configured default
        messages: vec![Message::user_text("Hello")],
        system: None,
        max_tokens: 10,
        temperature: Some(0.0),
    };
    provider.complete(&request).await?;
    Ok(())
}
