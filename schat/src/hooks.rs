//! Runtime observation hooks for the turn loop.

use scommon::ConversationId;
use sprovider::StopReason;

use crate::ChatError;

pub trait ChatRuntimeHooks: Send + Sync {
    fn on_session_start(&self, _conversation_id: &ConversationId) {}

    fn on_round_start(&self, _conversation_id: &ConversationId, _round: u32) {}

    fn on_round_complete(
        &self,
        _conversation_id: &ConversationId,
        _round: u32,
        _stop_reason: Option<StopReason>,
    ) {
    }

    fn on_tool_dispatch(&self, _conversation_id: &ConversationId, _tool: &str, _failed: bool) {}

    fn on_persistence_failure(&self, _conversation_id: &ConversationId, _error: &ChatError) {}

    fn on_session_complete(&self, _conversation_id: &ConversationId, _rounds: u32) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopChatHooks;

impl ChatRuntimeHooks for NoopChatHooks {}
