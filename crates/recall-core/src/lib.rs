//! Business logic and port definitions for recall.
//!
//! This crate defines the "ports" (repository, transport, publisher, and LLM
//! provider traits) that the infrastructure and bot layers implement, plus
//! the orchestration of the `/history` and `/qwen` commands. It depends only
//! on `recall-types`, never on `recall-infra` or any database/IO crate.

pub mod answer;
pub mod command;
pub mod completion;
pub mod history;
pub mod llm;
pub mod markup;
pub mod publish;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;
