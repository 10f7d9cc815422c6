//! Configuration system for Critik.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::error::Error;
use crate::limits::TokenLimits;
use crate::path_filter::PathFilter;

/// Main configuration struct for Critik.
///
/// Read once at startup and held immutable for the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Verbose logging (response dumps)
    pub debug: bool,
    /// ISO language code the responses must be written in
    pub language: String,
    /// System message template seeding every conversation
    pub system_message: String,
    /// Review policy settings
    pub review: ReviewConfig,
    /// Gemini provider settings
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            language: "en-US".to_string(),
            system_message: String::new(),
            review: ReviewConfig::default(),
            gemini: GeminiConfig::default(),
        }
    }
}

/// Review policy settings consumed by the orchestrator's callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    /// Skip the review pass entirely
    pub disable_review: bool,
    /// Skip release-notes generation
    pub disable_release_notes: bool,
    /// Cap on files considered upstream (0 = unlimited)
    pub max_files: usize,
    /// Review changes judged too simple to need attention
    pub review_simple_changes: bool,
    /// Post a comment even when the verdict is LGTM
    pub review_comment_lgtm: bool,
    /// Ordered path rules, `!`-prefixed for exclusions
    pub path_filters: Vec<String>,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            disable_review: false,
            disable_release_notes: false,
            max_files: 0,
            review_simple_changes: false,
            review_comment_lgtm: false,
            path_filters: vec![],
        }
    }
}

/// Gemini provider tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Fast model for summarization-scale work
    pub light_model: String,
    /// Higher-quality model for detailed review
    pub heavy_model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Attempts per exchange
    pub retries: u32,
    /// Request timeout, milliseconds
    pub timeout_ms: u64,
    /// Bound on simultaneous outstanding provider calls; the caller
    /// multiplexes within it, no throttle lives in the core
    pub concurrency_limit: usize,
    /// API base endpoint
    pub api_endpoint: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            light_model: "gemini-2.0-flash-lite".to_string(),
            heavy_model: "gemini-2.5-pro-preview-03-25".to_string(),
            temperature: 0.0,
            retries: 3,
            timeout_ms: 120_000,
            concurrency_limit: 6,
            api_endpoint: "https://generativelanguage.googleapis.com/v1".to_string(),
        }
    }
}

/// Validation result with multiple issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation issues
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a new empty validation result.
    pub fn new() -> Self {
        Self { issues: Vec::new() }
    }

    /// Check if validation passed (no errors).
    pub fn is_ok(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|i| i.severity == IssueSeverity::Error)
    }

    /// Get only error-level issues.
    pub fn errors(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Error)
            .collect()
    }

    /// Get only warning-level issues.
    pub fn warnings(&self) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .collect()
    }

    /// Add an error.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Error,
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning.
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            severity: IssueSeverity::Warning,
            field: field.into(),
            message: message.into(),
        });
    }
}

/// A single validation issue.
#[derive(Debug, Clone)]
pub struct ValidationIssue {
    /// Severity of the issue
    pub severity: IssueSeverity,
    /// Field path (e.g., "gemini.retries")
    pub field: String,
    /// Human-readable message
    pub message: String,
}

/// Severity level for validation issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// Warnings don't prevent loading
    Warning,
    /// Errors prevent loading
    Error,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Malformed values (a non-numeric retry count, say) are rejected here
    /// rather than propagated into downstream comparisons.
    pub fn load() -> Result<Self, figment::Error> {
        let config_dir = Self::config_dir();

        Figment::new()
            // Default values
            .merge(figment::providers::Serialized::defaults(Config::default()))
            // User config
            .merge(Toml::file(config_dir.join("config.toml")))
            // Project config
            .merge(Toml::file(".critik/config.toml"))
            // Project local config (gitignored)
            .merge(Toml::file(".critik/config.local.toml"))
            // Environment variables
            .merge(Env::prefixed("CRITIK_").split("__"))
            .extract()
    }

    /// Load and validate configuration.
    pub fn load_validated() -> Result<Self, Error> {
        let config = Self::load().map_err(|e| Error::Config(e.to_string()))?;
        let result = config.validate();

        if !result.is_ok() {
            let errors: Vec<String> = result
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Err(Error::Config(format!(
                "Configuration validation failed:\n  {}",
                errors.join("\n  ")
            )));
        }

        for warning in result.warnings() {
            tracing::warn!("Config warning - {}: {}", warning.field, warning.message);
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        if self.language.trim().is_empty() {
            result.add_error("language", "language code cannot be empty");
        }

        if self.gemini.light_model.is_empty() {
            result.add_error("gemini.light_model", "model id cannot be empty");
        }

        if self.gemini.heavy_model.is_empty() {
            result.add_error("gemini.heavy_model", "model id cannot be empty");
        }

        if !(0.0..=2.0).contains(&self.gemini.temperature) {
            result.add_error(
                "gemini.temperature",
                format!(
                    "temperature {} is outside the valid range [0, 2]",
                    self.gemini.temperature
                ),
            );
        } else if self.gemini.temperature > 1.0 {
            result.add_warning(
                "gemini.temperature",
                "temperature above 1.0 makes review output less deterministic",
            );
        }

        if self.gemini.retries == 0 {
            result.add_error("gemini.retries", "retries must be greater than 0");
        }

        if self.gemini.timeout_ms == 0 {
            result.add_error("gemini.timeout_ms", "timeout_ms must be greater than 0");
        }

        if self.gemini.concurrency_limit == 0 {
            result.add_error(
                "gemini.concurrency_limit",
                "concurrency_limit must be greater than 0",
            );
        }

        if !self.gemini.api_endpoint.starts_with("http://")
            && !self.gemini.api_endpoint.starts_with("https://")
        {
            result.add_error(
                "gemini.api_endpoint",
                "api_endpoint must start with http:// or https://",
            );
        }

        if let Err(e) = PathFilter::new(&self.review.path_filters) {
            result.add_error("review.path_filters", e.to_string());
        }

        result
    }

    /// Compile the configured path rules.
    pub fn path_filter(&self) -> Result<PathFilter, Error> {
        PathFilter::new(&self.review.path_filters)
    }

    /// Token budget for the light model.
    pub fn light_limits(&self) -> TokenLimits {
        TokenLimits::for_model(&self.gemini.light_model)
    }

    /// Token budget for the heavy model.
    pub fn heavy_limits(&self) -> TokenLimits {
        TokenLimits::for_model(&self.gemini.heavy_model)
    }

    /// Log every effective option at info level.
    pub fn print(&self) {
        info!("debug: {}", self.debug);
        info!("disable_review: {}", self.review.disable_review);
        info!(
            "disable_release_notes: {}",
            self.review.disable_release_notes
        );
        info!("max_files: {}", self.review.max_files);
        info!(
            "review_simple_changes: {}",
            self.review.review_simple_changes
        );
        info!("review_comment_lgtm: {}", self.review.review_comment_lgtm);
        info!("path_filters: {:?}", self.review.path_filters);
        info!("system_message: {}", self.system_message);
        info!("light_model: {}", self.gemini.light_model);
        info!("heavy_model: {}", self.gemini.heavy_model);
        info!("temperature: {}", self.gemini.temperature);
        info!("retries: {}", self.gemini.retries);
        info!("timeout_ms: {}", self.gemini.timeout_ms);
        info!("concurrency_limit: {}", self.gemini.concurrency_limit);
        info!("api_endpoint: {}", self.gemini.api_endpoint);
        info!("language: {}", self.language);
        info!("light_token_limits: {}", self.light_limits());
        info!("heavy_token_limits: {}", self.heavy_limits());
    }

    /// Get the configuration directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("critik"))
            .unwrap_or_else(|| PathBuf::from("~/.config/critik"))
    }
}
