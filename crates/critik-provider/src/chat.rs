//! Live provider-side conversation state.

use std::fmt;
use std::sync::Arc;

use critik_core::{ProviderError, Turn};

use crate::retry::RetryPolicy;
use crate::traits::{ChatResponse, GenerativeModel};

/// A live chat session: accumulated history plus the model capability.
///
/// Exists for one process invocation only; it is never serialized. A
/// session can be rebuilt from a persisted transcript with
/// [`ChatSession::with_history`]. Not for sharing between concurrent
/// exchanges - one logical conversation at a time.
pub struct ChatSession {
    model: Arc<dyn GenerativeModel>,
    history: Vec<Turn>,
    retry: RetryPolicy,
}

impl ChatSession {
    /// Start a session with no history.
    pub fn start(model: Arc<dyn GenerativeModel>, retry: RetryPolicy) -> Self {
        Self::with_history(model, retry, Vec::new())
    }

    /// Rebuild a session from an existing transcript.
    pub fn with_history(
        model: Arc<dyn GenerativeModel>,
        retry: RetryPolicy,
        history: Vec<Turn>,
    ) -> Self {
        Self {
            model,
            history,
            retry,
        }
    }

    /// Accumulated history, oldest first.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Send a message and await the reply, retrying per the policy.
    ///
    /// The user and model turns are appended to the history only after a
    /// non-empty reply; a failed or empty exchange leaves it untouched, so
    /// a retried attempt never sees a duplicated user turn.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatResponse, ProviderError> {
        let mut contents = self.history.clone();
        contents.push(Turn::user(text));

        let model = Arc::clone(&self.model);
        let reply = self.retry.run(|| model.generate(&contents)).await?;

        if !reply.is_empty() {
            self.history.push(Turn::user(text));
            self.history.push(Turn::model(reply.text.clone()));
        }

        Ok(reply)
    }
}

impl fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatSession")
            .field("model", &self.model.model_id())
            .field("history_turns", &self.history.len())
            .field("retry", &self.retry)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedModel {
        replies: Mutex<Vec<Result<ChatResponse, ProviderError>>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<ChatResponse, ProviderError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GenerativeModel for ScriptedModel {
        fn model_id(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _contents: &[Turn]) -> Result<ChatResponse, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                Ok(ChatResponse {
                    text: "out of script".to_string(),
                })
            } else {
                replies.remove(0)
            }
        }
    }

    fn reply(text: &str) -> Result<ChatResponse, ProviderError> {
        Ok(ChatResponse {
            text: text.to_string(),
        })
    }

    fn network_error() -> Result<ChatResponse, ProviderError> {
        Err(ProviderError::Network("connection reset".to_string()))
    }

    #[tokio::test]
    async fn test_successful_exchange_appends_both_turns() {
        let model = Arc::new(ScriptedModel::new(vec![reply("looks fine")]));
        let mut chat = ChatSession::start(model, RetryPolicy::new(3));

        let response = chat.send_message("review this diff").await.unwrap();

        assert_eq!(response.text(), "looks fine");
        assert_eq!(chat.history().len(), 2);
        assert_eq!(chat.history()[0], Turn::user("review this diff"));
        assert_eq!(chat.history()[1], Turn::model("looks fine"));
    }

    #[tokio::test]
    async fn test_retry_does_not_duplicate_user_turn() {
        let model = Arc::new(ScriptedModel::new(vec![
            network_error(),
            network_error(),
            reply("third time"),
        ]));
        let mut chat = ChatSession::start(Arc::clone(&model) as Arc<dyn GenerativeModel>, RetryPolicy::new(3));

        let response = chat.send_message("hello").await.unwrap();

        assert_eq!(response.text(), "third time");
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_exchange_leaves_history_untouched() {
        let model = Arc::new(ScriptedModel::new(vec![
            network_error(),
            network_error(),
            network_error(),
        ]));
        let mut chat = ChatSession::with_history(
            Arc::clone(&model) as Arc<dyn GenerativeModel>,
            RetryPolicy::new(3),
            vec![Turn::user("earlier"), Turn::model("earlier reply")],
        );

        let result = chat.send_message("hello").await;

        assert!(result.is_err());
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
        assert_eq!(chat.history().len(), 2);
    }

    #[tokio::test]
    async fn test_empty_reply_is_not_recorded() {
        let model = Arc::new(ScriptedModel::new(vec![reply("")]));
        let mut chat = ChatSession::start(model, RetryPolicy::new(3));

        let response = chat.send_message("hello").await.unwrap();

        assert!(response.is_empty());
        assert!(chat.history().is_empty());
    }

    #[tokio::test]
    async fn test_history_is_sent_with_the_new_message() {
        struct CapturingModel {
            seen: Mutex<Vec<Vec<Turn>>>,
        }

        #[async_trait]
        impl GenerativeModel for CapturingModel {
            fn model_id(&self) -> &str {
                "capturing"
            }

            async fn generate(&self, contents: &[Turn]) -> Result<ChatResponse, ProviderError> {
                self.seen.lock().unwrap().push(contents.to_vec());
                Ok(ChatResponse {
                    text: "ack".to_string(),
                })
            }
        }

        let model = Arc::new(CapturingModel {
            seen: Mutex::new(vec![]),
        });
        let mut chat = ChatSession::with_history(
            Arc::clone(&model) as Arc<dyn GenerativeModel>,
            RetryPolicy::new(1),
            vec![Turn::user("sys"), Turn::model("ok")],
        );

        chat.send_message("new message").await.unwrap();

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].len(), 3);
        assert_eq!(seen[0][2], Turn::user("new message"));
    }
}
