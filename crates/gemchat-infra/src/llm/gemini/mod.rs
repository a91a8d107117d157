//! Google Gemini LLM provider implementation.
//!
//! This module provides the [`GeminiProvider`] which implements the
//! [`LlmProvider`](gemchat_core::llm::provider::LlmProvider) trait for
//! the Gemini `generateContent` REST API, including inline image parts.

pub mod client;
pub mod types;

pub use client::GeminiProvider;
