//! HTTP layer for gemchat.
//!
//! Axum router serving the chat page, its JSON endpoints, uploaded images and
//! embedded static assets.

pub mod error;
pub mod handlers;
pub mod page;
pub mod router;
