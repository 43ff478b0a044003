//! Error types for the Folio domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

use crate::provider::ProviderId;

/// The top-level error type for all Folio operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Request validation ---
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    // --- Single provider ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Both providers exhausted ---
    #[error("{0}")]
    AllProvidersFailed(#[from] AggregateFailure),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// A structural defect in an inbound conversation payload.
///
/// These are client-caused and always surface as a 400-class response.
/// A rejected request never reaches a provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("messages must be a non-empty array")]
    EmptyConversation,

    #[error("message at index {index} is missing a role or has empty content")]
    MalformedMessage { index: usize },

    #[error("message at index {index} has unsupported role '{role}'")]
    InvalidRole { index: usize, role: String },
}

/// A failure from a single provider adapter.
///
/// Every variant is treated identically by the failover sequence: the
/// orchestrator moves on to the next provider regardless of kind. The
/// variants exist so operators can tell a missing credential from a
/// network outage in the aggregated failure payload.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// The service credential is absent. Raised before any network call.
    #[error("{provider} provider is not configured: {reason}")]
    NotConfigured { provider: ProviderId, reason: String },

    /// The transport layer failed (DNS, TLS, connection reset).
    #[error("{provider} network error: {reason}")]
    Network { provider: ProviderId, reason: String },

    /// The provider answered with a non-success HTTP status.
    #[error("{provider} API request failed: {message} (status: {status_code})")]
    ApiError {
        provider: ProviderId,
        status_code: u16,
        message: String,
    },

    /// Success status, but no usable reply text could be extracted.
    #[error("{provider} returned no reply text: {reason}")]
    EmptyReply { provider: ProviderId, reason: String },

    /// The adapter call exceeded the per-attempt deadline.
    #[error("{provider} timed out: {reason}")]
    Timeout { provider: ProviderId, reason: String },
}

impl ProviderError {
    /// Which provider produced this failure.
    pub fn provider(&self) -> ProviderId {
        match self {
            Self::NotConfigured { provider, .. }
            | Self::Network { provider, .. }
            | Self::ApiError { provider, .. }
            | Self::EmptyReply { provider, .. }
            | Self::Timeout { provider, .. } => *provider,
        }
    }
}

/// Both providers were tried and both failed.
///
/// This is the only provider error that crosses the gateway boundary,
/// and it retains both captured failures so a caller debugging an outage
/// can see whether credentials are missing for one provider, the other,
/// or both.
#[derive(Debug, Clone, Error)]
#[error("all providers failed (primary: {primary}; secondary: {secondary})")]
pub struct AggregateFailure {
    pub primary: ProviderError,
    pub secondary: ProviderError,
}
