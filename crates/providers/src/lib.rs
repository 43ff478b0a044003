//! LLM provider adapters for Folio.
//!
//! Both adapters implement `folio_core::ChatProvider`; the failover
//! orchestrator tries them in a fixed order. Generation parameters are
//! configuration constants shared by every adapter, never re-derived per
//! call.

pub mod failover;
pub mod gemini;
pub mod openai_compat;

pub use failover::{FailoverOrchestrator, FailoverReply};
pub use gemini::GeminiChatProvider;
pub use openai_compat::OpenAiChatProvider;

use std::sync::Arc;
use std::time::Duration;

/// Sampling temperature for a factual-assistant tone.
pub const REPLY_TEMPERATURE: f32 = 0.4;

/// Bounded generation length for every provider call.
pub const MAX_REPLY_TOKENS: u32 = 1024;

/// Deadline for a single adapter attempt. The observed contract leaves
/// timeouts to the transport layer; this explicit bound is a deliberate
/// strengthening so a hung provider cannot stall the failover sequence.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Well-known endpoints and models, used when the config leaves them out.
const PRIMARY_BASE_URL: &str = "https://api.openai.com/v1";
const PRIMARY_MODEL: &str = "gpt-4o-mini";
const SECONDARY_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const SECONDARY_MODEL: &str = "gemini-1.5-flash";

/// Build the failover orchestrator from configuration. This is the only
/// place adapters are constructed outside of tests.
pub fn build_orchestrator(config: &folio_config::AppConfig) -> FailoverOrchestrator {
    let primary = Arc::new(OpenAiChatProvider::new(
        config.primary.api_key.clone(),
        config.primary.api_url.as_deref().unwrap_or(PRIMARY_BASE_URL),
        config.primary.model.as_deref().unwrap_or(PRIMARY_MODEL),
    ));
    let secondary = Arc::new(GeminiChatProvider::new(
        config.secondary.api_key.clone(),
        config
            .secondary
            .api_url
            .as_deref()
            .unwrap_or(SECONDARY_BASE_URL),
        config.secondary.model.as_deref().unwrap_or(SECONDARY_MODEL),
    ));

    FailoverOrchestrator::new(primary, secondary)
}
