//! Google Gemini provider implementation.
//!
//! Speaks the `generateContent` REST surface: conversation history goes in
//! `contents` with `user`/`model` roles, generation tuning in
//! `generationConfig`, and content filtering is disabled for review text
//! via `safetySettings`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use critik_core::config::GeminiConfig;
use critik_core::{ProviderError, Role, TokenLimits, Turn};

use crate::traits::{ChatResponse, GenerativeModel};

/// Environment variable holding the API credential.
pub const CREDENTIAL_ENV_VAR: &str = "GEMINI_API_KEY";

const TOP_K: u32 = 64;
const TOP_P: f32 = 0.95;

/// Gemini model capability backed by reqwest.
pub struct GeminiModel {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    generation_config: GenerationConfig,
    timeout_ms: u64,
}

impl GeminiModel {
    /// Create a model capability from an explicit credential.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        config: &GeminiConfig,
    ) -> Result<Self, ProviderError> {
        let model = model.into();
        let limits = TokenLimits::for_model(&model);

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model,
            base_url: config.api_endpoint.trim_end_matches('/').to_string(),
            generation_config: GenerationConfig {
                temperature: config.temperature,
                top_k: TOP_K,
                top_p: TOP_P,
                max_output_tokens: limits.response_tokens,
            },
            timeout_ms: config.timeout_ms,
        })
    }

    /// Create a model capability from [`CREDENTIAL_ENV_VAR`].
    ///
    /// Absence of the credential is the one fatal construction failure.
    pub fn from_env(model: impl Into<String>, config: &GeminiConfig) -> Result<Self, ProviderError> {
        let api_key = std::env::var(CREDENTIAL_ENV_VAR).map_err(|_| {
            ProviderError::MissingCredential {
                env_var: CREDENTIAL_ENV_VAR,
            }
        })?;
        Self::new(api_key, model, config)
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    fn build_request(&self, contents: &[Turn]) -> GeminiRequest {
        GeminiRequest {
            contents: contents
                .iter()
                .map(|turn| GeminiContent {
                    role: turn.role,
                    parts: vec![GeminiPart {
                        text: Some(turn.text.clone()),
                    }],
                })
                .collect(),
            generation_config: self.generation_config.clone(),
            safety_settings: SafetySetting::block_none(),
        }
    }

    fn parse_response(&self, response: GeminiResponse) -> ChatResponse {
        // A blocked or empty generation carries no candidates; that is an
        // empty reply, not a transport error.
        let text = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        ChatResponse { text }
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout {
                ms: self.timeout_ms,
            }
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiModel {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, contents: &[Turn]) -> Result<ChatResponse, ProviderError> {
        let request = self.build_request(contents);

        debug!(model = %self.model, turns = contents.len(), "Sending request to Gemini API");

        let response = self
            .client
            .post(self.request_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status, message);
            return Err(ProviderError::Api { status, message });
        }

        let api_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        Ok(self.parse_response(api_response))
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: Role,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl SafetySetting {
    fn block_none() -> Vec<Self> {
        [
            "HARM_CATEGORY_HARASSMENT",
            "HARM_CATEGORY_HATE_SPEECH",
            "HARM_CATEGORY_SEXUALLY_EXPLICIT",
            "HARM_CATEGORY_DANGEROUS_CONTENT",
        ]
        .into_iter()
        .map(|category| Self {
            category,
            threshold: "BLOCK_NONE",
        })
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: GeminiContent,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}
