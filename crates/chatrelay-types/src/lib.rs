//! Shared domain types for chatrelay.
//!
//! This crate contains the core domain types used across the relay:
//! sessions, turns, provider messages, configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
