//! Shared domain types for recall.
//!
//! This crate contains the domain types used across the workspace: archived
//! chats and messages, history windows, LLM request/response shapes, transport
//! handles, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod transport;
