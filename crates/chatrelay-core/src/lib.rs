//! Business logic and port trait definitions for chatrelay.
//!
//! This crate defines the "ports" (store and completion traits) that the
//! infrastructure layer implements, plus the session resolver and the chat
//! orchestrator that composes them. It depends only on `chatrelay-types` --
//! never on `chatrelay-infra` or any database/HTTP crate.

pub mod chat;
pub mod llm;
pub mod session;
