//! The review assistant orchestrator.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use critik_core::{Config, ProviderError, Result, Turn};
use critik_provider::{ChatSession, GeminiModel, GenerativeModel, RetryPolicy};

use crate::handle::SessionHandle;

/// Canned acknowledgment closing the system-instruction seed pair.
const ACKNOWLEDGMENT: &str =
    "I understand and will follow these guidelines for the code review.";

/// Drives a conversational review exchange against one model.
///
/// Callers typically hold two instances: a light one for
/// summarization-scale work and a heavy one for detailed review. Apart
/// from construction, nothing here fails outward: a broken exchange
/// degrades to an empty response and an empty handle.
pub struct ReviewAssistant {
    model: Arc<dyn GenerativeModel>,
    system_message: String,
    retry: RetryPolicy,
    debug: bool,
}

impl ReviewAssistant {
    /// Create an assistant with an injected model capability.
    pub fn with_model(model: Arc<dyn GenerativeModel>, config: &Config) -> Self {
        let current_date = chrono::Utc::now().format("%Y-%m-%d");
        let system_message = format!(
            "{}\nCurrent date: {}\n\nIMPORTANT: Entire response must be in the language with ISO code: {}\n",
            config.system_message, current_date, config.language
        );

        Self {
            model,
            system_message,
            retry: RetryPolicy::new(config.gemini.retries),
            debug: config.debug,
        }
    }

    /// Create an assistant for the given model id using the credential
    /// from the environment.
    ///
    /// A missing credential fails construction; the instance must not
    /// exist without one.
    pub fn from_env(config: &Config, model_id: &str) -> Result<Self> {
        let model = GeminiModel::from_env(model_id, &config.gemini)?;
        Ok(Self::with_model(Arc::new(model), config))
    }

    /// The light (summarization) assistant for this configuration.
    pub fn light(config: &Config) -> Result<Self> {
        Self::from_env(config, &config.gemini.light_model)
    }

    /// The heavy (detailed review) assistant for this configuration.
    pub fn heavy(config: &Config) -> Result<Self> {
        Self::from_env(config, &config.gemini.heavy_model)
    }

    /// Model identifier this assistant drives.
    pub fn model_id(&self) -> &str {
        self.model.model_id()
    }

    /// Send one message within the conversation carried by `handle`.
    ///
    /// Returns the reply text and a fresh handle for the caller to
    /// persist. An empty message is a no-op. Any exchange failure is
    /// logged and collapsed to `("", SessionHandle::default())` - no
    /// session progress was made and this call never returns an error.
    pub async fn converse(&self, message: &str, handle: SessionHandle) -> (String, SessionHandle) {
        match self.converse_inner(message, handle).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Failed to chat with Gemini: {}", e);
                (String::new(), SessionHandle::default())
            }
        }
    }

    async fn converse_inner(
        &self,
        message: &str,
        handle: SessionHandle,
    ) -> std::result::Result<(String, SessionHandle), ProviderError> {
        if message.is_empty() {
            return Ok((String::new(), SessionHandle::default()));
        }

        let start = Instant::now();
        let (mut chat, mut transcript) = self.restore(handle);

        let reply = chat.send_message(message).await?;

        info!(
            "Gemini exchange (including retries) response time: {} ms",
            start.elapsed().as_millis()
        );

        if reply.is_empty() {
            warn!("Gemini response is empty");
            return Ok((String::new(), SessionHandle::default()));
        }

        if self.debug {
            info!("Gemini response: {}", reply.text());
        }

        transcript.push(Turn::user(message));
        transcript.push(Turn::model(reply.text()));

        Ok((
            reply.text().to_string(),
            SessionHandle {
                chat: Some(chat),
                transcript,
            },
        ))
    }

    /// Recover the live session, preferring the one already in the handle.
    ///
    /// The system-instruction pair is seeded exactly once per
    /// conversation: a rebuild from a non-empty transcript reuses the
    /// already-seeded turns instead of inserting a fresh pair.
    fn restore(&self, handle: SessionHandle) -> (ChatSession, Vec<Turn>) {
        let SessionHandle { chat, transcript } = handle;

        if let Some(chat) = chat {
            return (chat, transcript);
        }

        if !transcript.is_empty() {
            let chat =
                ChatSession::with_history(Arc::clone(&self.model), self.retry, transcript.clone());
            return (chat, transcript);
        }

        let seed = vec![
            Turn::user(self.system_message.clone()),
            Turn::model(ACKNOWLEDGMENT),
        ];
        let chat = ChatSession::with_history(Arc::clone(&self.model), self.retry, seed.clone());
        (chat, seed)
    }
}
