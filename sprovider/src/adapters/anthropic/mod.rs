mod provider;
mod serde_api;
mod transport;

pub use provider::{AnthropicProvider, DEFAULT_ANTHROPIC_MODEL};
pub use transport::{
    AnthropicHttpTransport, AnthropicTransport, AnthropicWireStream, ANTHROPIC_BASE_URL,
};

pub use serde_api::{AnthropicRequest, AnthropicStreamEvent};
