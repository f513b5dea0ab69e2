use std::sync::{Arc, Mutex};
use std::time::Duration;

use schat::{ChatError, ChatRuntimeHooks};
use scommon::ConversationId;
use sprovider::{ProviderError, ProviderId, ProviderOperationHooks, StopReason};

use crate::{
    MetricsObservabilityHooks, SafeChatHooks, SafeProviderHooks, TracingObservabilityHooks,
};

fn drive_provider_hooks(hooks: &dyn ProviderOperationHooks) {
    let error = ProviderError::timeout("provider timeout");

    hooks.on_attempt_start(ProviderId::Anthropic, "messages", 1);
    hooks.on_retry_scheduled(
        ProviderId::Anthropic,
        "messages",
        1,
        Duration::from_millis(10),
        &error,
    );
    hooks.on_success(ProviderId::Anthropic, "messages", 2);
    hooks.on_failure(ProviderId::Anthropic, "messages", 2, &error);
}

fn drive_chat_hooks(hooks: &dyn ChatRuntimeHooks) {
    let id = ConversationId::from("conv-1");
    let error = ChatError::store("write failed");

    hooks.on_session_start(&id);
    hooks.on_round_start(&id, 1);
    hooks.on_round_complete(&id, 1, Some(StopReason::ToolUse));
    hooks.on_tool_dispatch(&id, "search_catalog", false);
    hooks.on_tool_dispatch(&id, "search_catalog", true);
    hooks.on_persistence_failure(&id, &error);
    hooks.on_session_complete(&id, 2);
}

#[test]
fn tracing_hooks_smoke_test_all_callbacks() {
    let hooks = TracingObservabilityHooks;
    drive_provider_hooks(&hooks);
    drive_chat_hooks(&hooks);
}

#[test]
fn metrics_hooks_smoke_test_all_callbacks() {
    let hooks = MetricsObservabilityHooks;
    drive_provider_hooks(&hooks);
    drive_chat_hooks(&hooks);
}

#[derive(Default, Clone)]
struct RecordingProviderHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ProviderOperationHooks for RecordingProviderHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        self.events
            .lock()
            .expect("events lock")
            .push("attempt_start");
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push("retry_scheduled");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        self.events.lock().expect("events lock").push("success");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        self.events.lock().expect("events lock").push("failure");
    }
}

#[derive(Default, Clone)]
struct RecordingChatHooks {
    events: Arc<Mutex<Vec<&'static str>>>,
}

impl ChatRuntimeHooks for RecordingChatHooks {
    fn on_session_start(&self, _conversation_id: &ConversationId) {
        self.events
            .lock()
            .expect("events lock")
            .push("session_start");
    }

    fn on_round_start(&self, _conversation_id: &ConversationId, _round: u32) {
        self.events.lock().expect("events lock").push("round_start");
    }

    fn on_round_complete(
        &self,
        _conversation_id: &ConversationId,
        _round: u32,
        _stop_reason: Option<StopReason>,
    ) {
        self.events
            .lock()
            .expect("events lock")
            .push("round_complete");
    }

    fn on_tool_dispatch(&self, _conversation_id: &ConversationId, _tool: &str, _failed: bool) {
        self.events
            .lock()
            .expect("events lock")
            .push("tool_dispatch");
    }

    fn on_persistence_failure(&self, _conversation_id: &ConversationId, _error: &ChatError) {
        self.events
            .lock()
            .expect("events lock")
            .push("persistence_failure");
    }

    fn on_session_complete(&self, _conversation_id: &ConversationId, _rounds: u32) {
        self.events
            .lock()
            .expect("events lock")
            .push("session_complete");
    }
}

struct PanicProviderHooks;

impl ProviderOperationHooks for PanicProviderHooks {
    fn on_attempt_start(&self, _provider: ProviderId, _operation: &str, _attempt: u32) {
        panic!("attempt_start panic");
    }

    fn on_retry_scheduled(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempt: u32,
        _delay: Duration,
        _error: &ProviderError,
    ) {
        panic!("retry_scheduled panic");
    }

    fn on_success(&self, _provider: ProviderId, _operation: &str, _attempts: u32) {
        panic!("success panic");
    }

    fn on_failure(
        &self,
        _provider: ProviderId,
        _operation: &str,
        _attempts: u32,
        _error: &ProviderError,
    ) {
        panic!("failure panic");
    }
}

struct PanicChatHooks;

impl ChatRuntimeHooks for PanicChatHooks {
    fn on_session_start(&self, _conversation_id: &ConversationId) {
        panic!("session_start panic");
    }

    fn on_round_start(&self, _conversation_id: &ConversationId, _round: u32) {
        panic!("round_start panic");
    }

    fn on_round_complete(
        &self,
        _conversation_id: &ConversationId,
        _round: u32,
        _stop_reason: Option<StopReason>,
    ) {
        panic!("round_complete panic");
    }

    fn on_tool_dispatch(&self, _conversation_id: &ConversationId, _tool: &str, _failed: bool) {
        panic!("tool_dispatch panic");
    }

    fn on_persistence_failure(&self, _conversation_id: &ConversationId, _error: &ChatError) {
        panic!("persistence_failure panic");
    }

    fn on_session_complete(&self, _conversation_id: &ConversationId, _rounds: u32) {
        panic!("session_complete panic");
    }
}

#[test]
fn safe_provider_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingProviderHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeProviderHooks::new(inner);

    drive_provider_hooks(&hooks);

    assert_eq!(events.lock().expect("events lock").len(), 4);
}

#[test]
fn safe_chat_hooks_delegate_when_inner_succeeds() {
    let inner = RecordingChatHooks::default();
    let events = Arc::clone(&inner.events);
    let hooks = SafeChatHooks::new(inner);

    drive_chat_hooks(&hooks);

    assert_eq!(events.lock().expect("events lock").len(), 7);
}

#[test]
fn safe_provider_hooks_swallow_panics() {
    let hooks = SafeProviderHooks::new(PanicProviderHooks);
    drive_provider_hooks(&hooks);
}

#[test]
fn safe_chat_hooks_swallow_panics() {
    let hooks = SafeChatHooks::new(PanicChatHooks);
    drive_chat_hooks(&hooks);
}
