//! Tool execution context, gateway envelope, and outcome reconciliation.

use scommon::{ConversationId, MetadataMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::display::{extract_display_items, ProductDisplay};

/// Which surface a tool belongs to. `Customer` tools read or act on
/// account data and are only reachable once the session carries a
/// customer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityDomain {
    Storefront,
    Customer,
}

impl CapabilityDomain {
    pub fn requires_customer(self) -> bool {
        matches!(self, Self::Customer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolExecutionContext {
    pub conversation_id: ConversationId,
    pub customer_token: Option<String>,
    pub metadata: MetadataMap,
}

impl ToolExecutionContext {
    pub fn new(conversation_id: impl Into<ConversationId>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            customer_token: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn with_customer_token(mut self, token: impl Into<String>) -> Self {
        self.customer_token = Some(token.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// What a tool hands back over the wire. The `error` field is the
/// reconciliation switch: present and non-empty means the call failed,
/// regardless of what `payload` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub payload: Value,
}

impl ToolEnvelope {
    pub fn success(payload: Value) -> Self {
        Self {
            error: None,
            payload,
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            error: Some(detail.into()),
            payload: Value::Null,
        }
    }

    pub fn into_outcome(self) -> ToolOutcome {
        match self.error {
            Some(detail) if !detail.trim().is_empty() => ToolOutcome::Failure { detail },
            _ => {
                let display_items = extract_display_items(&self.payload);
                ToolOutcome::Success {
                    payload: self.payload,
                    display_items,
                }
            }
        }
    }
}

/// A reconciled tool call: the success path carries the payload plus any
/// product cards extracted from it, the failure path carries only the
/// error detail.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome {
    Success {
        payload: Value,
        display_items: Vec<ProductDisplay>,
    },
    Failure {
        detail: String,
    },
}

impl ToolOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }
}
