//! Provider trait definitions.

use async_trait::async_trait;

use critik_core::{ProviderError, Turn};

/// Reply from one generation exchange.
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Concatenated text of the reply; empty when the provider produced
    /// no usable candidate
    pub text: String,
}

impl ChatResponse {
    /// Reply text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the provider produced no usable text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Core transport trait - one conversation-shaped generation call.
///
/// The provider call is the only suspension point in the exchange path.
/// Implementations must be cheap to share behind an `Arc`.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Model identifier this capability targets.
    fn model_id(&self) -> &str;

    /// Generate a reply to the given conversation contents.
    ///
    /// A reply with empty text is a valid result, distinct from a
    /// transport error; callers decide how to treat it.
    async fn generate(&self, contents: &[Turn]) -> Result<ChatResponse, ProviderError>;
}
