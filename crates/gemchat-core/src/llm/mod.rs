//! LLM provider abstractions for gemchat.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: Object-safe wrapper for dynamic dispatch
//! - `AiGateway`: the reply boundary used by the HTTP layer, with offline mode

pub mod box_provider;
pub mod gateway;
pub mod provider;
