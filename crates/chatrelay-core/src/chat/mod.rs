//! Conversation persistence port and the chat orchestrator.
//!
//! `ConversationStore` is implemented by the infrastructure layer;
//! `ChatOrchestrator` drives one request/response exchange over it.

pub mod box_store;
pub mod exchange;
pub mod repository;
pub mod service;
