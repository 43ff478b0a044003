//! Provider failover — sequential primary-then-secondary orchestration.
//!
//! The policy is a fixed state machine:
//!
//! ```text
//! TryPrimary ──success──▶ Succeeded
//!     │ any failure
//!     ▼
//! TrySecondary ──success──▶ Succeeded
//!     │ any failure
//!     ▼
//!   Failed (both captured failures surfaced together)
//! ```
//!
//! Invariants: at most one successful provider call, at most two calls
//! total, no retries within an adapter, never concurrent. Every kind of
//! primary failure (missing credential, transport error, empty reply)
//! triggers the same transition to the secondary.

use folio_core::error::{AggregateFailure, ProviderError};
use folio_core::message::ChatMessage;
use folio_core::provider::{ChatProvider, ProviderId};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::ATTEMPT_TIMEOUT;

/// The successful outcome of a failover run.
#[derive(Debug, Clone)]
pub struct FailoverReply {
    /// Which provider produced the reply
    pub provider: ProviderId,
    pub reply: String,
}

/// Tries the primary adapter, then the secondary, then gives up.
pub struct FailoverOrchestrator {
    primary: Arc<dyn ChatProvider>,
    secondary: Arc<dyn ChatProvider>,
    attempt_timeout: Duration,
}

impl FailoverOrchestrator {
    pub fn new(primary: Arc<dyn ChatProvider>, secondary: Arc<dyn ChatProvider>) -> Self {
        Self {
            primary,
            secondary,
            attempt_timeout: ATTEMPT_TIMEOUT,
        }
    }

    /// Override the per-attempt deadline (tests use short ones).
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Whether the primary provider has a credential. Feeds the
    /// capability probe; never performs I/O.
    pub fn primary_configured(&self) -> bool {
        self.primary.is_configured()
    }

    /// Whether the secondary provider has a credential.
    pub fn secondary_configured(&self) -> bool {
        self.secondary.is_configured()
    }

    /// Run the failover sequence for one request.
    pub async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<FailoverReply, AggregateFailure> {
        // TryPrimary
        let primary_failure = match self.attempt(&self.primary, system_prompt, messages).await {
            Ok(reply) => {
                info!(provider = %ProviderId::Primary, "Reply produced");
                return Ok(FailoverReply {
                    provider: ProviderId::Primary,
                    reply,
                });
            }
            Err(e) => {
                warn!(provider = %ProviderId::Primary, error = %e, "Provider failed, trying secondary");
                e
            }
        };

        // TrySecondary
        let secondary_failure = match self.attempt(&self.secondary, system_prompt, messages).await {
            Ok(reply) => {
                info!(provider = %ProviderId::Secondary, "Reply produced after failover");
                return Ok(FailoverReply {
                    provider: ProviderId::Secondary,
                    reply,
                });
            }
            Err(e) => {
                warn!(provider = %ProviderId::Secondary, error = %e, "Provider failed");
                e
            }
        };

        // Failed — surface both captured failures, not just the last one.
        Err(AggregateFailure {
            primary: primary_failure,
            secondary: secondary_failure,
        })
    }

    /// One bounded adapter call.
    async fn attempt(
        &self,
        provider: &Arc<dyn ChatProvider>,
        system_prompt: &str,
        messages: &[ChatMessage],
    ) -> std::result::Result<String, ProviderError> {
        match tokio::time::timeout(self.attempt_timeout, provider.complete(system_prompt, messages))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: provider.id(),
                reason: format!(
                    "no answer within {}s",
                    self.attempt_timeout.as_secs()
                ),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// A mock provider that always fails.
    struct FailingProvider {
        id: ProviderId,
        error: ProviderError,
        call_count: Mutex<usize>,
    }

    impl FailingProvider {
        fn new(id: ProviderId, error: ProviderError) -> Self {
            Self {
                id,
                error,
                call_count: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ChatProvider for FailingProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn is_configured(&self) -> bool {
            !matches!(self.error, ProviderError::NotConfigured { .. })
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            _messages: &[ChatMessage],
        ) -> std::result::Result<String, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            Err(self.error.clone())
        }
    }

    /// A mock provider that always succeeds, recording what it received.
    struct SuccessProvider {
        id: ProviderId,
        reply: String,
        call_count: Mutex<usize>,
        received_lens: Mutex<Vec<usize>>,
    }

    impl SuccessProvider {
        fn new(id: ProviderId, reply: &str) -> Self {
            Self {
                id,
                reply: reply.into(),
                call_count: Mutex::new(0),
                received_lens: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }

        fn last_received_len(&self) -> Option<usize> {
            self.received_lens.lock().unwrap().last().copied()
        }
    }

    #[async_trait]
    impl ChatProvider for SuccessProvider {
        fn id(&self) -> ProviderId {
            self.id
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            messages: &[ChatMessage],
        ) -> std::result::Result<String, ProviderError> {
            *self.call_count.lock().unwrap() += 1;
            self.received_lens.lock().unwrap().push(messages.len());
            Ok(self.reply.clone())
        }
    }

    /// A mock provider that hangs forever (for timeout testing).
    struct HangingProvider;

    #[async_trait]
    impl ChatProvider for HangingProvider {
        fn id(&self) -> ProviderId {
            ProviderId::Primary
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn complete(
            &self,
            _system_prompt: &str,
            _messages: &[ChatMessage],
        ) -> std::result::Result<String, ProviderError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    fn history() -> Vec<ChatMessage> {
        vec![ChatMessage::user("What projects have you built?")]
    }

    #[tokio::test]
    async fn primary_success_short_circuits() {
        let primary = Arc::new(SuccessProvider::new(ProviderId::Primary, "Here are 3 projects..."));
        let secondary = Arc::new(SuccessProvider::new(ProviderId::Secondary, "unused"));

        let orchestrator = FailoverOrchestrator::new(primary.clone(), secondary.clone());
        let outcome = orchestrator.complete("prompt", &history()).await.unwrap();

        assert_eq!(outcome.provider, ProviderId::Primary);
        assert_eq!(outcome.reply, "Here are 3 projects...");
        assert_eq!(primary.calls(), 1);
        // Secondary must never be invoked on the happy path
        assert_eq!(secondary.calls(), 0);
    }

    #[tokio::test]
    async fn primary_failure_falls_over_to_secondary() {
        let primary = Arc::new(FailingProvider::new(
            ProviderId::Primary,
            ProviderError::ApiError {
                provider: ProviderId::Primary,
                status_code: 500,
                message: "upstream exploded".into(),
            },
        ));
        let secondary = Arc::new(SuccessProvider::new(ProviderId::Secondary, "from secondary"));

        let orchestrator = FailoverOrchestrator::new(primary.clone(), secondary.clone());
        let outcome = orchestrator.complete("prompt", &history()).await.unwrap();

        assert_eq!(outcome.provider, ProviderId::Secondary);
        assert_eq!(outcome.reply, "from secondary");
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn missing_credential_triggers_same_failover() {
        let primary = Arc::new(FailingProvider::new(
            ProviderId::Primary,
            ProviderError::NotConfigured {
                provider: ProviderId::Primary,
                reason: "API key is not set".into(),
            },
        ));
        let secondary = Arc::new(SuccessProvider::new(ProviderId::Secondary, "ok"));

        let orchestrator = FailoverOrchestrator::new(primary.clone(), secondary.clone());
        let outcome = orchestrator.complete("prompt", &history()).await.unwrap();

        assert_eq!(outcome.provider, ProviderId::Secondary);
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn both_failures_are_preserved() {
        let primary = Arc::new(FailingProvider::new(
            ProviderId::Primary,
            ProviderError::Network {
                provider: ProviderId::Primary,
                reason: "E1".into(),
            },
        ));
        let secondary = Arc::new(FailingProvider::new(
            ProviderId::Secondary,
            ProviderError::EmptyReply {
                provider: ProviderId::Secondary,
                reason: "E2".into(),
            },
        ));

        let orchestrator = FailoverOrchestrator::new(primary.clone(), secondary.clone());
        let failure = orchestrator
            .complete("prompt", &history())
            .await
            .unwrap_err();

        assert!(failure.primary.to_string().contains("E1"));
        assert!(failure.secondary.to_string().contains("E2"));
        // Exactly one call each — no retries
        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
    }

    // The per-attempt deadline is a strengthening beyond the observed
    // contract: without it a hung provider would stall failover forever.
    #[tokio::test]
    async fn hung_primary_times_out_into_failover() {
        let primary = Arc::new(HangingProvider);
        let secondary = Arc::new(SuccessProvider::new(ProviderId::Secondary, "rescued"));

        let orchestrator = FailoverOrchestrator::new(primary, secondary.clone())
            .with_attempt_timeout(Duration::from_millis(50));
        let outcome = orchestrator.complete("prompt", &history()).await.unwrap();

        assert_eq!(outcome.provider, ProviderId::Secondary);
        assert_eq!(secondary.calls(), 1);
    }

    #[tokio::test]
    async fn adapter_receives_history_unchanged() {
        let primary = Arc::new(SuccessProvider::new(ProviderId::Primary, "ok"));
        let secondary = Arc::new(SuccessProvider::new(ProviderId::Secondary, "unused"));

        let orchestrator = FailoverOrchestrator::new(primary.clone(), secondary);
        let many: Vec<ChatMessage> = (0..7).map(|i| ChatMessage::user(format!("m{i}"))).collect();
        orchestrator.complete("prompt", &many).await.unwrap();

        assert_eq!(primary.last_received_len(), Some(7));
    }

    #[tokio::test]
    async fn configuration_accessors_reflect_adapters() {
        let primary = Arc::new(SuccessProvider::new(ProviderId::Primary, "ok"));
        let secondary = Arc::new(FailingProvider::new(
            ProviderId::Secondary,
            ProviderError::NotConfigured {
                provider: ProviderId::Secondary,
                reason: "API key is not set".into(),
            },
        ));

        let orchestrator = FailoverOrchestrator::new(primary, secondary);
        assert!(orchestrator.primary_configured());
        assert!(!orchestrator.secondary_configured());
    }
}
