//! OpenAI-compatible chat-completion adapter — the primary provider.
//!
//! Works with OpenAI and any endpoint exposing the `/chat/completions`
//! shape. The corpus-derived system prompt is prepended as a leading
//! `system` message, followed by the trimmed visitor/assistant turns in
//! order.

use async_trait::async_trait;
use folio_core::error::ProviderError;
use folio_core::message::{ChatMessage, Role};
use folio_core::provider::{ChatProvider, ProviderId};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{ATTEMPT_TIMEOUT, MAX_REPLY_TOKENS, REPLY_TEMPERATURE};

/// The primary chat provider, speaking the OpenAI wire format.
pub struct OpenAiChatProvider {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl OpenAiChatProvider {
    /// Create a new adapter. The credential is injected here; `None`
    /// makes every `complete` call fail fast without touching the
    /// network.
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

    /// Convert the system prompt and conversation turns to the OpenAI
    /// message array.
    fn to_api_messages(system_prompt: &str, messages: &[ChatMessage]) -> Vec<ApiMessage> {
        let mut api_messages = Vec::with_capacity(messages.len() + 1);
        api_messages.push(ApiMessage {
            role: "system".into(),
            content: system_prompt.to_string(),
        });
        for message in messages {
            api_messages.push(ApiMessage {
                role: match message.role {
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: message.content.clone(),
            });
        }
        api_messages
    }
}

#[async_trait]
impl ChatProvider for OpenAiChatProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Primary
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

        let url = format!("{}/chat/completions", self.base_url);
        let body = CompletionBody {
            model: &self.model,
            messages: Self::to_api_messages(system_prompt, messages),
            temperature: REPLY_TEMPERATURE,
            max_tokens: MAX_REPLY_TOKENS,
        };

        debug!(provider = %self.id(), model = %self.model, turns = messages.len(), "Sending completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {api_key}"))
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

        let api_response: ApiResponse =
            response.json().await.map_err(|e| ProviderError::ApiError {
                provider: self.id(),
                status_code: status,
                message: format!("Failed to parse response: {e}"),
            })?;

        extract_reply(self.id(), api_response)
    }
}

/// Pull the reply text out of a parsed response, or fail with
/// `EmptyReply` when there is none.
fn extract_reply(
    provider: ProviderId,
    response: ApiResponse,
) -> std::result::Result<String, ProviderError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ProviderError::EmptyReply {
            provider,
            reason: "response contained no choices with content".into(),
        })
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize)]
struct CompletionBody<'a> {
    model: &'a str,
    messages: Vec<ApiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
