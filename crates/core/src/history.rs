//! Conversation history trimming.
//!
//! Callers keep the full conversation client-side and post it whole on
//! every turn, so the history the gateway forwards downstream must be
//! bounded regardless of how long the stored conversation has grown.

use crate::message::ChatMessage;

/// How many of the most recent messages are forwarded to a provider.
pub const MAX_HISTORY_MESSAGES: usize = 20;

/// Keep at most the most recent [`MAX_HISTORY_MESSAGES`] messages,
/// preserving relative order, dropping the oldest first.
///
/// Idempotent: trimming an already-short or already-trimmed sequence is
/// a no-op.
pub fn trim_history(messages: &[ChatMessage]) -> &[ChatMessage] {
    let start = messages.len().saturating_sub(MAX_HISTORY_MESSAGES);
    &messages[start..]
}
