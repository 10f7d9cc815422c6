//! Per-model token budgets.

use std::fmt;

/// Margin subtracted from the request allowance so a prompt sized right up
/// to `request_tokens` cannot tip the combined request over `max_tokens`.
const REQUEST_TOKEN_MARGIN: u32 = 100;

/// Knowledge cutoff reported for all supported models.
const KNOWLEDGE_CUTOFF: &str = "2024-03-25";

/// Token ceilings for a given model.
///
/// `request_tokens` is derived, never stored independently:
/// `max_tokens - response_tokens - REQUEST_TOKEN_MARGIN`. Keeping prompts
/// within `request_tokens` is the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimits {
    /// Combined input+output ceiling
    pub max_tokens: u32,
    /// Input allowance after reserving the response and the margin
    pub request_tokens: u32,
    /// Output ceiling
    pub response_tokens: u32,
    /// Knowledge cutoff date
    pub knowledge_cutoff: &'static str,
}

impl TokenLimits {
    /// Look up the budget for a model identifier.
    ///
    /// The match is exact and case-sensitive. Unknown identifiers fall back
    /// to the conservative 32K tier; that is a safe default, not an error.
    pub fn for_model(model: &str) -> Self {
        let (max_tokens, response_tokens) = match model {
            "gemini-2.5-pro-preview-03-25" => (1_048_576, 65_536),
            "gemini-2.0-flash" => (1_048_576, 65_536),
            "gemini-2.0-flash-lite" => (1_048_576, 65_536),
            _ => (32_768, 4_096),
        };

        Self {
            max_tokens,
            request_tokens: max_tokens - response_tokens - REQUEST_TOKEN_MARGIN,
            response_tokens,
            knowledge_cutoff: KNOWLEDGE_CUTOFF,
        }
    }
}

impl Default for TokenLimits {
    fn default() -> Self {
        Self::for_model("gemini-2.0-flash-lite")
    }
}

impl fmt::Display for TokenLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "max_tokens={}, request_tokens={}, response_tokens={}",
            self.max_tokens, self.request_tokens, self.response_tokens
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_models_partition_exactly() {
        for model in [
            "gemini-2.5-pro-preview-03-25",
            "gemini-2.0-flash",
            "gemini-2.0-flash-lite",
        ] {
            let limits = TokenLimits::for_model(model);
            assert_eq!(limits.max_tokens, 1_048_576, "{model}");
            assert_eq!(limits.response_tokens, 65_536, "{model}");
            assert_eq!(
                limits.request_tokens + limits.response_tokens + REQUEST_TOKEN_MARGIN,
                limits.max_tokens,
                "{model}"
            );
        }
    }

    #[test]
    fn test_unknown_model_falls_back_to_conservative_tier() {
        let limits = TokenLimits::for_model("gpt-3.5-turbo");
        assert_eq!(limits.max_tokens, 32_768);
        assert_eq!(limits.response_tokens, 4_096);
        assert_eq!(limits.request_tokens, 28_572);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let limits = TokenLimits::for_model("Gemini-2.0-Flash");
        assert_eq!(limits.max_tokens, 32_768);
    }

    #[test]
    fn test_display_line() {
        let limits = TokenLimits::for_model("gemini-2.0-flash");
        assert_eq!(
            limits.to_string(),
            "max_tokens=1048576, request_tokens=982940, response_tokens=65536"
        );
    }

    #[test]
    fn test_knowledge_cutoff_is_model_independent() {
        assert_eq!(
            TokenLimits::for_model("gemini-2.0-flash").knowledge_cutoff,
            TokenLimits::for_model("something-else").knowledge_cutoff
        );
    }
}
