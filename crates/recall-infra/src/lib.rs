//! Infrastructure layer for recall.
//!
//! Contains implementations of the ports defined in `recall-core`: the SQLite
//! message archive, the OpenAI-compatible completion provider, the Telegraph
//! document publisher, and the `config.toml` loader.

pub mod config;
pub mod llm;
pub mod sqlite;
pub mod telegraph;
