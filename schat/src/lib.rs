//! Turn loop and client event channel for storefront chat sessions.
//!
//! A [`ChatService`] drives one user message through a bounded number of
//! model rounds, dispatching tool calls between rounds and relaying
//! progress to an [`EventEmitter`]: either streamed SSE frames
//! ([`SseEmitter`]) or one buffered document ([`BufferedEmitter`]).
//!
//! ```rust
//! use schat::{classify_session_failure, ChatError, ClientEvent};
//!
//! let event = classify_session_failure(&ChatError::rate_limited("busy"));
//! assert!(matches!(event, ClientEvent::RateLimitExceeded { .. }));
//! ```

mod emitter;
mod error;
mod events;
mod history;
mod hooks;
mod service;
mod store;

pub use emitter::{BufferedEmitter, EventEmitter, SessionDocument, SseEmitter};
pub use error::{ChatError, ChatErrorKind};
pub use events::{
    classify_session_failure, ClientEvent, AUTH_FAILURE_MESSAGE, RATE_LIMIT_MESSAGE,
};
pub use history::WorkingHistory;
pub use hooks::{ChatRuntimeHooks, NoopChatHooks};
pub use service::{
    ChatPolicy, ChatService, ChatServiceBuilder, ChatSessionRequest, PersistenceMode,
};
pub use store::{ChatFuture, ConversationStore, InMemoryConversationStore};
