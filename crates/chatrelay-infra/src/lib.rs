//! Infrastructure layer for chatrelay.
//!
//! Contains implementations of the port traits defined in `chatrelay-core`:
//! SQLite and in-memory conversation stores, the OpenAI-compatible
//! completion client, and the configuration loader.

pub mod config;
pub mod llm;
pub mod memory;
pub mod sqlite;
