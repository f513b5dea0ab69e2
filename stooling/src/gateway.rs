//! Tool gateway trait and default registry-backed implementation.

use std::sync::Arc;

use sprovider::{ToolDefinition, ToolInvocation};

use crate::{ToolEnvelope, ToolError, ToolExecutionContext, ToolFuture, ToolRegistry};

/// Dispatches one tool invocation and reports the catalog offered to the
/// model. Implementations decide where tools actually run; the session
/// layer only sees envelopes.
pub trait ToolGateway: Send + Sync {
    fn catalog(&self) -> Vec<ToolDefinition>;

    fn call_tool<'a>(
        &'a self,
        invocation: ToolInvocation,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolEnvelope, ToolError>>;
}

#[derive(Clone, Default)]
pub struct RegistryGateway {
    registry: Arc<ToolRegistry>,
}

impl RegistryGateway {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> Arc<ToolRegistry> {
        Arc::clone(&self.registry)
    }
}

impl ToolGateway for RegistryGateway {
    fn catalog(&self) -> Vec<ToolDefinition> {
        self.registry.definitions()
    }

    fn call_tool<'a>(
        &'a self,
        invocation: ToolInvocation,
        context: ToolExecutionContext,
    ) -> ToolFuture<'a, Result<ToolEnvelope, ToolError>> {
        Box::pin(async move {
            let tool = self.registry.get(&invocation.name).ok_or_else(|| {
                ToolError::not_found(format!("tool '{}' is not registered", invocation.name))
            })?;

            if tool.domain().requires_customer() && context.customer_token.is_none() {
                return Err(ToolError::unauthorized(format!(
                    "tool '{}' requires an authorized customer session",
                    invocation.name
                )));
            }

            tool.invoke(&invocation.input, &context).await
        })
    }
}
