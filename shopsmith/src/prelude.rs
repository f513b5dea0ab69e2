//! Common imports for most shopsmith applications.

pub use crate::{authorization_prompt, SessionRequest, SessionRunner, SessionRunnerBuilder};
pub use crate::{ss_history, ss_turn};
pub use crate::{
    AuthConfig, AuthError, AuthErrorKind, AuthorizationGate, BoxFuture, BufferedEmitter,
    ChatError, ChatErrorKind, ChatPolicy, ChatService, ChatServiceBuilder, ChatSessionRequest,
    ClientEvent, ContentBlock, ConversationId, ConversationStore, CustomerSession,
    CustomerSessionStore, EventEmitter, FunctionTool, GateDecision, InMemoryAuthStateStore,
    InMemoryConversationStore, InMemoryCustomerSessionStore, ModelProvider, ModelRequest,
    PersistenceMode, ProductDisplay, PromptCatalog, ProviderError, ProviderId, RegistryGateway,
    Role, SessionDocument, ShopId, SqliteAuthStore, SqliteConversationStore, SseEmitter,
    StopReason, StreamEvent, Tool, ToolEnvelope, ToolError, ToolExecutionContext, ToolGateway,
    ToolRegistry, Turn, VecEventStream,
};
