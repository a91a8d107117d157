//! Infrastructure layer for gemchat.
//!
//! Contains implementations of the port traits defined in `gemchat-core`:
//! SQLite storage, the local filesystem adapter, the Gemini HTTP provider,
//! and the `config.toml` loader.

pub mod config;
pub mod filesystem;
pub mod llm;
pub mod sqlite;
