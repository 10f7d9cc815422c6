//! # critik-assistant
//!
//! Conversation orchestration for Critik.
//!
//! This crate provides:
//! - [`SessionHandle`], the opaque per-conversation state callers persist
//! - [`ReviewAssistant`], which turns one-shot prompts into a stateful,
//!   resumable conversation with the review model

pub mod assistant;
pub mod handle;

pub use assistant::ReviewAssistant;
pub use handle::SessionHandle;
