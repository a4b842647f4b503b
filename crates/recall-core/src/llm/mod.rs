//! LLM provider abstractions for recall.
//!
//! - `LlmProvider`: RPITIT trait for concrete provider implementations
//! - `BoxLlmProvider`: owned handle that erases the concrete provider type

pub mod box_provider;
pub mod provider;
