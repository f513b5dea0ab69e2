//! Tool gateway for storefront chat sessions.
//!
//! Tools are registered under a [`CapabilityDomain`] and dispatched through
//! a [`ToolGateway`]. Every call returns a [`ToolEnvelope`] whose `error`
//! field selects the reconciliation path: [`ToolOutcome::Failure`] when it
//! is present and non-empty, [`ToolOutcome::Success`] with extracted
//! [`ProductDisplay`] cards otherwise.
//!
//! ```rust
//! use serde_json::json;
//! use stooling::{ToolEnvelope, ToolOutcome};
//!
//! let outcome = ToolEnvelope::failure("backend offline").into_outcome();
//! assert!(outcome.is_failure());
//!
//! let outcome = ToolEnvelope::success(json!({"products": []})).into_outcome();
//! assert!(!outcome.is_failure());
//! ```

mod display;
mod error;
mod gateway;
mod registry;
mod tool;
mod types;

pub use display::{describe_tool_call, extract_display_items, ProductDisplay};
pub use error::{ToolError, ToolErrorKind};
pub use gateway::{RegistryGateway, ToolGateway};
pub use registry::ToolRegistry;
pub use tool::{FunctionTool, Tool, ToolFuture};
pub use types::{CapabilityDomain, ToolEnvelope, ToolExecutionContext, ToolOutcome};
