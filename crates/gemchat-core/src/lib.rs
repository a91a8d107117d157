//! Chat services and port traits for gemchat.
//!
//! This crate defines the "ports" (repository, filesystem and LLM provider
//! traits) that the infrastructure layer implements, plus the services built
//! on them. It depends only on `gemchat-types` -- never on `gemchat-infra`
//! or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod service;
pub mod upload;
