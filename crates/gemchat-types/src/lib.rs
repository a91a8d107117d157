//! Shared domain types for gemchat.
//!
//! Chat sessions and messages, the provider-agnostic LLM request/response
//! shapes, configuration, and the error enums shared by every layer.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
