//! Tracing-based observability hooks for provider operations and chat sessions.
//!
//! ```rust
//! use sobserve::TracingObservabilityHooks;
//! use schat::ChatRuntimeHooks;
//!
//! fn accepts_chat_hooks(_hooks: &dyn ChatRuntimeHooks) {}
//!
//! let hooks = TracingObservabilityHooks;
//! accepts_chat_hooks(&hooks);
//! ```

use std::time::Duration;

use schat::{ChatError, ChatRuntimeHooks};
use scommon::ConversationId;
use sprovider::{ProviderError, ProviderId, ProviderOperationHooks, StopReason};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObservabilityHooks;

impl ProviderOperationHooks for TracingObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        tracing::info!(
            phase = "provider",
            event = "attempt_start",
            provider = %provider,
            operation,
            attempt
        );
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        tracing::warn!(
            phase = "provider",
            event = "retry_scheduled",
            provider = %provider,
            operation,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        tracing::info!(
            phase = "provider",
            event = "success",
            provider = %provider,
            operation,
            attempts
        );
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        tracing::error!(
            phase = "provider",
            event = "failure",
            provider = %provider,
            operation,
            attempts,
            error_kind = ?error.kind,
            retryable = error.retryable,
            error = %error
        );
    }
}

impl ChatRuntimeHooks for TracingObservabilityHooks {
    fn on_session_start(&self, conversation_id: &ConversationId) {
        tracing::info!(
            phase = "chat",
            event = "session_start",
            conversation_id = %conversation_id
        );
    }

    fn on_round_start(&self, conversation_id: &ConversationId, round: u32) {
        tracing::info!(
            phase = "chat",
            event = "round_start",
            conversation_id = %conversation_id,
            round
        );
    }

    fn on_round_complete(
        &self,
        conversation_id: &ConversationId,
        round: u32,
        stop_reason: Option<StopReason>,
    ) {
        tracing::info!(
            phase = "chat",
            event = "round_complete",
            conversation_id = %conversation_id,
            round,
            stop_reason = ?stop_reason
        );
    }

    fn on_tool_dispatch(&self, conversation_id: &ConversationId, tool: &str, failed: bool) {
        if failed {
            tracing::warn!(
                phase = "chat",
                event = "tool_dispatch",
                conversation_id = %conversation_id,
                tool,
                failed
            );
        } else {
            tracing::info!(
                phase = "chat",
                event = "tool_dispatch",
                conversation_id = %conversation_id,
                tool,
                failed
            );
        }
    }

    fn on_persistence_failure(&self, conversation_id: &ConversationId, error: &ChatError) {
        tracing::error!(
            phase = "chat",
            event = "persistence_failure",
            conversation_id = %conversation_id,
            error_kind = ?error.kind,
            error = %error
        );
    }

    fn on_session_complete(&self, conversation_id: &ConversationId, rounds: u32) {
        tracing::info!(
            phase = "chat",
            event = "session_complete",
            conversation_id = %conversation_id,
            rounds
        );
    }
}
