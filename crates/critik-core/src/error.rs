//! Error types for Critik.

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Critik.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider error with structured details
    #[error("{0}")]
    Provider(#[from] ProviderError),
}

impl Error {
    /// Get a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Error::Config(_) => Some("Check your config file or CRITIK_* environment overrides"),
            Error::Provider(e) => e.recovery_suggestion(),
        }
    }
}

/// Provider-specific errors with detailed context.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider credential is absent.
    ///
    /// This is the one unrecoverable construction failure: without a
    /// credential an assistant instance must not be created at all.
    #[error("credential environment variable '{env_var}' is not set")]
    MissingCredential { env_var: &'static str },

    /// API request failed
    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    /// Request timed out
    #[error("request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Network error
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned a body that could not be decoded
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Get a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            ProviderError::MissingCredential { .. } => {
                Some("Export the API key environment variable before starting")
            }
            ProviderError::Api { status: 429, .. } => {
                Some("You've hit rate limits. Wait a moment and try again")
            }
            ProviderError::Api {
                status: 500..=599, ..
            } => Some("The API service is having issues. Try again later"),
            ProviderError::Timeout { .. } => {
                Some("Raise gemini.timeout_ms or check your network connection")
            }
            ProviderError::Network(_) => Some("Check your internet connection"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_message() {
        let err = ProviderError::MissingCredential {
            env_var: "GEMINI_API_KEY",
        };
        assert!(err.to_string().contains("GEMINI_API_KEY"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_rate_limit_suggestion() {
        let err = ProviderError::Api {
            status: 429,
            message: "Resource has been exhausted".into(),
        };
        assert!(err.to_string().contains("429"));
        assert!(err.recovery_suggestion().unwrap().contains("rate limits"));
    }

    #[test]
    fn test_config_error_wraps() {
        let err = Error::Config("retries must be greater than 0".into());
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
