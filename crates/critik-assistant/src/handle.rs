//! Opaque per-conversation state.

use serde::{Deserialize, Serialize};

use critik_core::Turn;
use critik_provider::ChatSession;

/// Session state the caller persists between `converse` calls.
///
/// Two halves with different lifetimes: the live [`ChatSession`] exists
/// only within one process invocation and is dropped by serialization; the
/// transcript is append-only and survives it. Reconstruction prefers the
/// live session and falls back to the transcript. A handle must not be
/// shared between concurrent `converse` calls.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SessionHandle {
    #[serde(skip)]
    pub(crate) chat: Option<ChatSession>,
    pub(crate) transcript: Vec<Turn>,
}

impl SessionHandle {
    /// Ordered conversation transcript, oldest turn first.
    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    /// Whether a live provider-side session is attached.
    pub fn has_live_session(&self) -> bool {
        self.chat.is_some()
    }

    /// Whether no conversation progress has been made.
    pub fn is_empty(&self) -> bool {
        self.chat.is_none() && self.transcript.is_empty()
    }
}
