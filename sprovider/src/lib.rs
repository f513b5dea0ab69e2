//! Streaming model-provider abstraction for storefront chat sessions.
//!
//! A [`ModelProvider`] turns one [`ModelRequest`] into a stream of
//! [`StreamEvent`]s: incremental text deltas, tool-use requests, and a
//! single terminal [`FinalMessage`]. The [`adapters`] module maps concrete
//! provider APIs onto this contract.
//!
//! ```rust
//! use sprovider::{ModelRequest, Turn};
//!
//! let request = ModelRequest::builder("claude-sonnet-4-5")
//!     .system("You are a storefront assistant.")
//!     .turn(Turn::user_text("Do you carry hiking boots?"))
//!     .build()
//!     .expect("request should build");
//!
//! assert_eq!(request.history.len(), 1);
//! ```

pub mod adapters;
mod error;
mod model;
mod prompts;
mod provider;
mod resilience;
mod stream;

pub use error::{ProviderError, ProviderErrorKind};
pub use model::{
    content_from_stored, content_to_stored, ContentBlock, FinalMessage, ModelRequest,
    ModelRequestBuilder, ProviderId, Role, StopReason, TokenUsage, ToolDefinition, ToolInvocation,
    Turn,
};
pub use prompts::{PromptCatalog, DEFAULT_PROMPT_KEY};
pub use provider::{ModelProvider, ProviderFuture};
pub use resilience::{
    execute_with_retry, NoopOperationHooks, ProviderOperationHooks, RetryPolicy,
};
pub use stream::{BoxedEventStream, ModelEventStream, StreamEvent, VecEventStream};
