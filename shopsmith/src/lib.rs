//! Unified facade over the shopsmith workspace crates.
//!
//! This crate is designed to be the single dependency for most
//! applications. It re-exports the core shopsmith crates and provides the
//! [`SessionRunner`], which puts the authorization gate in front of the
//! turn loop and drives one inbound message to its terminal client event.
//!
//! ```rust
//! use shopsmith::{Role, ss_history};
//!
//! let history = ss_history![
//!     user => "Do you carry boots?",
//!     assistant => "We do.",
//! ];
//! assert_eq!(history[0].role, Role::User);
//! ```

mod macros;

pub mod prelude;
pub mod runtime;

pub use sauth;
pub use schat;
pub use scommon;
pub use smemory;
pub use sobserve;
pub use sprovider;
pub use stooling;

pub use sauth::{
    challenge_for, requires_authorization, AuthConfig, AuthError, AuthErrorKind,
    AuthorizationGate, AuthorizationState, AuthStateStore, CustomerSession, CustomerSessionStore,
    GateDecision, InMemoryAuthStateStore, InMemoryCustomerSessionStore, PkcePair, RedeemedState,
    ACCOUNT_INTENT_KEYWORDS,
};
pub use schat::{
    classify_session_failure, BufferedEmitter, ChatError, ChatErrorKind, ChatPolicy, ChatService,
    ChatServiceBuilder, ChatSessionRequest, ChatRuntimeHooks, ClientEvent, ConversationStore,
    EventEmitter, InMemoryConversationStore, NoopChatHooks, PersistenceMode, SessionDocument,
    SseEmitter, WorkingHistory, AUTH_FAILURE_MESSAGE, RATE_LIMIT_MESSAGE,
};
pub use scommon::{BoxFuture, ConversationId, MetadataMap, ShopId};
pub use smemory::{SqliteAuthStore, SqliteConversationStore};
pub use sobserve::{
    MetricsObservabilityHooks, SafeChatHooks, SafeProviderHooks, TracingObservabilityHooks,
};
pub use sprovider::adapters::anthropic::{
    AnthropicHttpTransport, AnthropicProvider, ANTHROPIC_BASE_URL, DEFAULT_ANTHROPIC_MODEL,
};
pub use sprovider::{
    content_from_stored, content_to_stored, execute_with_retry, BoxedEventStream, ContentBlock,
    FinalMessage, ModelEventStream, ModelProvider, ModelRequest, ModelRequestBuilder,
    NoopOperationHooks, PromptCatalog, ProviderError, ProviderErrorKind, ProviderFuture,
    ProviderId, ProviderOperationHooks, RetryPolicy, Role, StopReason, StreamEvent, TokenUsage,
    ToolDefinition, ToolInvocation, Turn, VecEventStream, DEFAULT_PROMPT_KEY,
};
pub use stooling::{
    describe_tool_call, extract_display_items, CapabilityDomain, FunctionTool, ProductDisplay,
    RegistryGateway, Tool, ToolEnvelope, ToolError, ToolErrorKind, ToolExecutionContext,
    ToolFuture, ToolGateway, ToolOutcome, ToolRegistry,
};

pub use runtime::{
    authorization_prompt, SessionRequest, SessionRunner, SessionRunnerBuilder,
};
