//! Tool trait contract for registry-managed capabilities.
//!
//! ```rust
//! use serde_json::json;
//! use sprovider::ToolDefinition;
//! use stooling::{FunctionTool, Tool, ToolEnvelope};
//!
//! let tool = FunctionTool::new(
//!     ToolDefinition {
//!         name: "echo".to_string(),
//!         description: "Echoes input".to_string(),
//!         input_schema: r#"{"type":"object"}"#.to_string(),
//!     },
//!     |input, _ctx| async move { Ok(ToolEnvelope::success(input)) },
//! );
//!
//! assert_eq!(tool.definition().name, "echo");
//! ```

use std::future::Future;
use std::sync::Arc;

use scommon::BoxFuture;
use serde_json::Value;
use sprovider::ToolDefinition;

use crate::{CapabilityDomain, ToolEnvelope, ToolError, ToolExecutionContext};

pub type ToolFuture<'a, T> = BoxFuture<'a, T>;

pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    fn domain(&self) -> CapabilityDomain {
        CapabilityDomain::Storefront
    }

    fn invoke<'a>(
        &'a self,
        input: &'a Value,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolEnvelope, ToolError>>;
}

type ToolHandler = dyn Fn(Value, ToolExecutionContext) -> ToolFuture<'static, Result<ToolEnvelope, ToolError>>
    + Send
    + Sync;

pub struct FunctionTool {
    definition: ToolDefinition,
    domain: CapabilityDomain,
    handler: Arc<ToolHandler>,
}

impl FunctionTool {
    pub fn new<F, Fut>(definition: ToolDefinition, handler: F) -> Self
    where
        F: Fn(Value, ToolExecutionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ToolEnvelope, ToolError>> + Send + 'static,
    {
        let handler: Arc<ToolHandler> =
            Arc::new(move |input, context| Box::pin(handler(input, context)));

        Self {
            definition,
            domain: CapabilityDomain::Storefront,
            handler,
        }
    }

    pub fn in_domain(mut self, domain: CapabilityDomain) -> Self {
        self.domain = domain;
        self
    }
}

impl Tool for FunctionTool {
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn domain(&self) -> CapabilityDomain {
        self.domain
    }

    fn invoke<'a>(
        &'a self,
        input: &'a Value,
        context: &'a ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolEnvelope, ToolError>> {
        let input = input.clone();
        let context = context.clone();
        (self.handler)(input, context)
    }
}
