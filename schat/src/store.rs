//! Conversation storage contract and a basic in-memory implementation.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use scommon::ConversationId;
use sprovider::Turn;

use crate::ChatError;

pub type ChatFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Append-only log of turns per conversation. Appends are ordered per
/// conversation and turns are never mutated once written.
pub trait ConversationStore: Send + Sync {
    fn load_turns<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> ChatFuture<'a, Result<Vec<Turn>, ChatError>>;

    fn append_turn<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
        turn: Turn,
    ) -> ChatFuture<'a, Result<(), ChatError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    conversations: Mutex<HashMap<ConversationId, Vec<Turn>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn load_turns<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> ChatFuture<'a, Result<Vec<Turn>, ChatError>> {
        Box::pin(async move {
            let conversations = self
                .conversations
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            Ok(conversations.get(conversation_id).cloned().unwrap_or_default())
        })
    }

    fn append_turn<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
        turn: Turn,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let mut conversations = self
                .conversations
                .lock()
                .map_err(|_| ChatError::store("conversation store lock poisoned"))?;

            conversations
                .entry(conversation_id.clone())
                .or_default()
                .push(turn);

            Ok(())
        })
    }
}
