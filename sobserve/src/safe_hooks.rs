use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use schat::{ChatError, ChatRuntimeHooks};
use scommon::ConversationId;
use sprovider::{ProviderError, ProviderId, ProviderOperationHooks, StopReason};

pub struct SafeProviderHooks<H> {
    inner: H,
}

impl<H> SafeProviderHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ProviderOperationHooks for SafeProviderHooks<H>
where
    H: ProviderOperationHooks,
{
    fn on_attempt_start(&self, provider: ProviderId, operation: &str, attempt: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_attempt_start(provider, operation, attempt)
        }));
    }

    fn on_retry_scheduled(
        &self,
        provider: ProviderId,
        operation: &str,
        attempt: u32,
        delay: Duration,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_retry_scheduled(provider, operation, attempt, delay, error)
        }));
    }

    fn on_success(&self, provider: ProviderId, operation: &str, attempts: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_success(provider, operation, attempts)
        }));
    }

    fn on_failure(
        &self,
        provider: ProviderId,
        operation: &str,
        attempts: u32,
        error: &ProviderError,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_failure(provider, operation, attempts, error)
        }));
    }
}

pub struct SafeChatHooks<H> {
    inner: H,
}

impl<H> SafeChatHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> ChatRuntimeHooks for SafeChatHooks<H>
where
    H: ChatRuntimeHooks,
{
    fn on_session_start(&self, conversation_id: &ConversationId) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_start(conversation_id)
        }));
    }

    fn on_round_start(&self, conversation_id: &ConversationId, round: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_round_start(conversation_id, round)
        }));
    }

    fn on_round_complete(
        &self,
        conversation_id: &ConversationId,
        round: u32,
        stop_reason: Option<StopReason>,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_round_complete(conversation_id, round, stop_reason)
        }));
    }

    fn on_tool_dispatch(&self, conversation_id: &ConversationId, tool: &str, failed: bool) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_tool_dispatch(conversation_id, tool, failed)
        }));
    }

    fn on_persistence_failure(&self, conversation_id: &ConversationId, error: &ChatError) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_persistence_failure(conversation_id, error)
        }));
    }

    fn on_session_complete(&self, conversation_id: &ConversationId, rounds: u32) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_session_complete(conversation_id, rounds)
        }));
    }
}
