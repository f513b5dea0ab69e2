//! Metrics-based observability hooks for provider operations and chat sessions.
//!
//! ```rust
//! use sobserve::MetricsObservabilityHooks;
//! use sprovider::ProviderOperationHooks;
//!
//! fn accepts_provider_hooks(_hooks: &dyn ProviderOperationHooks) {}
//!
//! let hooks = MetricsObservabilityHooks;
//! accepts_provider_hooks(&hooks);
//! ```

use std::time::Duration;

use schat::{ChatError, ChatRuntimeHooks};
use scommon::ConversationId;
use sprovider::{ProviderError, ProviderId, ProviderOperationHooks, StopReason};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsObservabilityHooks;

impl ProviderOperationHooks for MetricsObservabilityHooks {
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, _attempt: u32) {
        metrics::counter!(
            "shopsmith_provider_attempt_start_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        _attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "shopsmith_provider_retry_scheduled_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "shopsmith_provider_retry_delay_seconds",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(delay.as_secs_f64());
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        metrics::counter!(
            "shopsmith_provider_success_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "shopsmith_provider_attempts_per_success",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        metrics::counter!(
            "shopsmith_provider_failure_total",
            "provider" => provider.to_string(),
            "operation" => operation.to_string(),
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
        metrics::histogram!(
            "shopsmith_provider_attempts_per_failure",
            "provider" => provider.to_string(),
            "operation" => operation.to_string()
        )
        .record(attempts as f64);
    }
}

impl ChatRuntimeHooks for MetricsObservabilityHooks {
    fn on_session_start(&self, _conversation_id: &ConversationId) {
        metrics::counter!("shopsmith_chat_session_start_total").increment(1);
    }

    fn on_round_start(&self, _conversation_id: &ConversationId, _round: u32) {
        metrics::counter!("shopsmith_chat_round_start_total").increment(1);
    }

    fn on_round_complete(
        &self,
        _conversation_id: &ConversationId,
        _round: u32,
        stop_reason: Option<StopReason>,
    ) {
        metrics::counter!(
            "shopsmith_chat_round_complete_total",
            "stop_reason" => format!("{:?}", stop_reason)
        )
        .increment(1);
    }

    fn on_tool_dispatch(&self, _conversation_id: &ConversationId, tool: &str, failed: bool) {
        metrics::counter!(
            "shopsmith_chat_tool_dispatch_total",
            "tool" => tool.to_string(),
            "status" => if failed { "failure" } else { "success" }
        )
        .increment(1);
    }

    fn on_persistence_failure(&self, _conversation_id: &ConversationId, error: &ChatError) {
        metrics::counter!(
            "shopsmith_chat_persistence_failure_total",
            "error_kind" => format!("{:?}", error.kind)
        )
        .increment(1);
    }

    fn on_session_complete(&self, _conversation_id: &ConversationId, rounds: u32) {
        metrics::counter!("shopsmith_chat_session_complete_total").increment(1);
        metrics::histogram!("shopsmith_chat_rounds_per_session").record(rounds as f64);
    }
}
