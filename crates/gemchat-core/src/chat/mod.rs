//! Chat session and message persistence.
//!
//! `ChatRepository` is the storage port; `ChatService` layers the title rule
//! on top of it and `ChatNamingService` hands out fresh session names.

pub mod naming;
pub mod repository;
pub mod service;
pub mod title;
