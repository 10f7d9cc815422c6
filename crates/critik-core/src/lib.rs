//! # critik-core
//!
//! Core types and configuration for Critik - the automated code-review
//! assistant.
//!
//! This crate provides:
//! - Conversation primitives (roles and turns)
//! - Per-model token budgets
//! - Path inclusion/exclusion rules for reviewable files
//! - Configuration system
//! - Common error types

pub mod config;
pub mod error;
pub mod limits;
pub mod message;
pub mod path_filter;

pub use config::Config;
pub use error::{Error, ProviderError, Result};
pub use limits::TokenLimits;
pub use message::{Role, Turn};
pub use path_filter::PathFilter;
