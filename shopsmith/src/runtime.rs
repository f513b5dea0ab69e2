//! The session runner: authorization gate in front of the turn loop.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use sauth::{AuthorizationGate, GateDecision};
use schat::{
    classify_session_failure, BufferedEmitter, ChatError, ChatService, ChatSessionRequest,
    ClientEvent, ConversationStore, EventEmitter, SessionDocument,
};
use scommon::ConversationId;
use sprovider::Turn;

/// One inbound client message. The conversation id is optional; a missing
/// id starts a fresh conversation under a time-derived one.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRequest {
    pub message: String,
    pub conversation_id: Option<ConversationId>,
    pub prompt_type: Option<String>,
}

impl SessionRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            conversation_id: None,
            prompt_type: None,
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<ConversationId>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    pub fn with_prompt_type(mut self, prompt_type: impl Into<String>) -> Self {
        self.prompt_type = Some(prompt_type.into());
        self
    }
}

/// The assistant reply used when a message is short-circuited to the
/// authorization handshake.
pub fn authorization_prompt(url: &str) -> String {
    format!(
        "To help with that, you'll need to sign in to your account first. \
         Use this link to continue: {url}"
    )
}

/// Composes gate, turn loop, and event channel into the single entry
/// point a transport layer calls per inbound message.
pub struct SessionRunner {
    chat: ChatService,
    store: Arc<dyn ConversationStore>,
    gate: Option<Arc<AuthorizationGate>>,
}

impl SessionRunner {
    pub fn builder() -> SessionRunnerBuilder {
        SessionRunnerBuilder::default()
    }

    /// Runs one message to its terminal event.
    ///
    /// A blank message fails before any event is emitted. Everything
    /// after that surfaces through `emitter`: either the session runs to
    /// `done`, or exactly one classified error event closes it. Session
    /// failures are not returned; the terminal frame is their surface.
    pub async fn run(
        &self,
        request: SessionRequest,
        emitter: &dyn EventEmitter,
    ) -> Result<(), ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::invalid_request("message must not be empty"));
        }

        let conversation_id = request
            .conversation_id
            .clone()
            .unwrap_or_else(derived_conversation_id);

        match self.drive(&conversation_id, request, emitter).await {
            Ok(()) => emitter.send(&ClientEvent::Done),
            Err(error) => emitter.send(&classify_session_failure(&error)),
        }
        emitter.close();

        Ok(())
    }

    /// Buffered-mode counterpart of [`run`](Self::run): drives a
    /// [`BufferedEmitter`] and returns the materialized document.
    pub async fn run_buffered(
        &self,
        request: SessionRequest,
    ) -> Result<SessionDocument, ChatError> {
        let emitter = BufferedEmitter::new();
        self.run(request, &emitter).await?;
        Ok(emitter.into_document())
    }

    /// Read-only history fetch; no model involvement.
    pub async fn fetch_history(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Turn>, ChatError> {
        self.store.load_turns(conversation_id).await
    }

    async fn drive(
        &self,
        conversation_id: &ConversationId,
        request: SessionRequest,
        emitter: &dyn EventEmitter,
    ) -> Result<(), ChatError> {
        let mut chat_request =
            ChatSessionRequest::new(conversation_id.clone(), request.message.clone());
        if let Some(prompt_type) = request.prompt_type {
            chat_request = chat_request.with_prompt_type(prompt_type);
        }

        if let Some(gate) = &self.gate {
            let decision = gate
                .evaluate(&request.message, conversation_id)
                .await
                .map_err(|error| ChatError::store(error.to_string()))?;

            match decision {
                GateDecision::Authorized { customer_token } => {
                    if let Some(token) = customer_token {
                        chat_request = chat_request.with_customer_token(token);
                    }
                }
                GateDecision::NeedsAuthorization { prompt_url } => {
                    return self
                        .short_circuit(conversation_id, &request.message, &prompt_url, emitter)
                        .await;
                }
            }
        }

        self.chat.run_session(chat_request, emitter).await
    }

    /// Answers with the authorization prompt instead of invoking the
    /// model. The prompt is logged as a regular assistant turn, so the
    /// exchange reads like any other answer in the history.
    async fn short_circuit(
        &self,
        conversation_id: &ConversationId,
        message: &str,
        prompt_url: &str,
        emitter: &dyn EventEmitter,
    ) -> Result<(), ChatError> {
        emitter.send(&ClientEvent::Id {
            conversation_id: conversation_id.to_string(),
        });

        let prompt = authorization_prompt(prompt_url);
        self.store
            .append_turn(conversation_id, Turn::user_text(message))
            .await?;
        self.store
            .append_turn(conversation_id, Turn::assistant_text(prompt.clone()))
            .await?;

        emitter.send(&ClientEvent::Chunk { text: prompt });
        emitter.send(&ClientEvent::MessageComplete);

        Ok(())
    }
}

#[derive(Default)]
pub struct SessionRunnerBuilder {
    chat: Option<ChatService>,
    store: Option<Arc<dyn ConversationStore>>,
    gate: Option<Arc<AuthorizationGate>>,
}

impl SessionRunnerBuilder {
    pub fn chat(mut self, chat: ChatService) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn gate(mut self, gate: Arc<AuthorizationGate>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn build(self) -> Result<SessionRunner, ChatError> {
        let chat = self
            .chat
            .ok_or_else(|| ChatError::invalid_request("session runner requires a chat service"))?;
        let store = self
            .store
            .ok_or_else(|| ChatError::invalid_request("session runner requires a store"))?;

        Ok(SessionRunner {
            chat,
            store,
            gate: self.gate,
        })
    }
}

fn derived_conversation_id() -> ConversationId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    ConversationId::from(format!("conv-{nanos}"))
}
