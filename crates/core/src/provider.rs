//! ChatProvider trait — the abstraction over LLM backends.
//!
//! A provider knows how to send a conversation (plus the corpus-derived
//! system prompt) to an LLM and return the reply text. Each adapter is
//! solely responsible for its own wire-format translation; nothing
//! upstream has provider-specific knowledge. Adding a third provider
//! means writing one new adapter and registering it, touching nothing
//! else.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::message::ChatMessage;

/// The failover slot a provider occupies. Exactly two exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Primary,
    Secondary,
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Secondary => write!(f, "secondary"),
        }
    }
}

/// The core provider trait.
///
/// Every LLM backend implements this. The failover orchestrator calls
/// `complete()` without knowing which provider is being used.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Which failover slot this provider serves.
    fn id(&self) -> ProviderId;

    /// Whether a credential is present. Never performs I/O — this feeds
    /// the capability probe, not the completion path.
    fn is_configured(&self) -> bool;

    /// Send the system prompt and conversation turns, return the reply
    /// text. Exactly one outbound request per call; generation length
    /// and sampling temperature are fixed constants inside the adapter.
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, ProviderError>;
}
