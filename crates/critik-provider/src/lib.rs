//! # critik-provider
//!
//! LLM provider layer for Critik.
//!
//! This crate provides:
//! - The [`GenerativeModel`] trait abstracting the provider transport
//! - [`GeminiModel`], the reqwest-backed Google Gemini implementation
//! - [`ChatSession`], the live provider-side conversation object
//! - Bounded retry with an explicit [`Backoff`] policy

pub mod chat;
pub mod gemini;
pub mod retry;
pub mod traits;

pub use chat::ChatSession;
pub use gemini::{GeminiModel, CREDENTIAL_ENV_VAR};
pub use retry::{Backoff, RetryPolicy};
pub use traits::{ChatResponse, GenerativeModel};
