//! Gemini generation adapter — the secondary provider.
//!
//! The wire format differs from the primary in two ways the adapter owns
//! entirely:
//! - role relabeling: `assistant` turns become Gemini's `model` role,
//!   `user` stays `user`
//! - the system prompt travels in the top-level `systemInstruction`
//!   field, not as a leading message
//!
//! Authentication uses the `x-goog-api-key` header (not Bearer).

use async_trait::async_trait;
use folio_core::error::ProviderError;
use folio_core::message::{ChatMessage, Role};
use folio_core::provider::{ChatProvider, ProviderId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ATTEMPT_TIMEOUT, MAX_REPLY_TOKENS, REPLY_TEMPERATURE};

/// The secondary chat provider, speaking the Gemini wire format.
pub struct GeminiChatProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiChatProvider {
    /// Create a new adapter with an injected credential.
    pub fn new(
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(ATTEMPT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            client,
        }
    }

    /// Convert conversation turns to Gemini contents, relabeling roles.
    fn to_api_contents(messages: &[ChatMessage]) -> Vec<GeminiContent> {
        messages
            .iter()
            .map(|message| GeminiContent {
                role: match message.role {
                    Role::User => "user".into(),
                    Role::Assistant => "model".into(),
                },
                parts: vec![GeminiPart {
                    text: message.content.clone(),
                }],
            })
            .collect()
    }
}

#[async_trait]
impl ChatProvider for GeminiChatProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Secondary
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(ProviderError::NotConfigured {
                provider: self.id(),
                reason: "API key is not set".into(),
            });
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = GenerateBody {
            contents: Self::to_api_contents(messages),
            system_instruction: SystemInstruction {
                parts: vec![GeminiPart {
                    text: system_prompt.to_string(),
                }],
            },
            generation_config: GenerationConfig {
                temperature: REPLY_TEMPERATURE,
                max_output_tokens: MAX_REPLY_TOKENS,
            },
        };

        debug!(provider = %self.id(), model = %self.model, turns = messages.len(), "Sending generation request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network {
                provider: self.id(),
                reason: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.id(), status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                provider: self.id(),
                status_code: status,
                message: error_body,
            });
        }

        let api_response: GenerateResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                provider: self.id(),
                status_code: status,
                message: format!("Failed to parse response: {e}"),
            })?;

        extract_reply(self.id(), api_response)
    }
}

/// Join the text parts of the first candidate, or fail with `EmptyReply`.
fn extract_reply(
    provider: ProviderId,
    response: GenerateResponse,
) -> std::result::Result<String, ProviderError> {
    let reply = response
        .candidates
        .into_iter()
        .next()
        .map(|candidate| {
            candidate
                .content
                .parts
                .into_iter()
                .map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if reply.trim().is_empty() {
        return Err(ProviderError::EmptyReply {
            provider,
            reason: "response contained no candidate text".into(),
        });
    }

    Ok(reply)
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateBody {
    contents: Vec<GeminiContent>,
    system_instruction: SystemInstruction,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}
