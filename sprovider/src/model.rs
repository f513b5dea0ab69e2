//! Provider-agnostic turn, content-block, and request model types.
//!
//! ```rust
//! use sprovider::{ContentBlock, ModelRequest, ProviderErrorKind, Turn};
//!
//! let ok = ModelRequest::builder("claude-sonnet-4-5")
//!     .turn(Turn::user_text("Where is my order?"))
//!     .build();
//! assert!(ok.is_ok());
//!
//! let err = ModelRequest::builder("").turn(Turn::user_text("hi")).build();
//! assert_eq!(err.err().map(|e| e.kind), Some(ProviderErrorKind::InvalidRequest));
//! ```

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use scommon::MetadataMap;

use crate::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    Anthropic,
    Scripted,
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let id = match self {
            Self::Anthropic => "anthropic",
            Self::Scripted => "scripted",
        };

        f.write_str(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A tool call produced by the model, consumed exactly once by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub input: Value,
}

/// Closed tagged variant for one unit of turn content. The serde shape is
/// also the persisted and wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "is_false")]
        is_error: bool,
    },
}

fn is_false(value: &bool) -> bool {
    !value
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn tool_use(invocation: ToolInvocation) -> Self {
        Self::ToolUse {
            id: invocation.id,
            name: invocation.name,
            input: invocation.input,
        }
    }

    pub fn tool_result(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: false,
        }
    }

    pub fn tool_error(tool_use_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
            is_error: true,
        }
    }
}

/// One role-tagged message composed of ordered content blocks. Turns are
/// append-only once handed to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    pub fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    pub fn user(content: Vec<ContentBlock>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::user(vec![ContentBlock::text(text)])
    }

    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::assistant(vec![ContentBlock::text(text)])
    }

    /// Concatenated text of all `Text` blocks, in order.
    pub fn text(&self) -> String {
        let mut text = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text: chunk } = block {
                text.push_str(chunk);
            }
        }

        text
    }

    pub fn tool_uses(&self) -> Vec<ToolInvocation> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse { id, name, input } => Some(ToolInvocation {
                    id: id.clone(),
                    name: name.clone(),
                    input: input.clone(),
                }),
                _ => None,
            })
            .collect()
    }
}

/// Serializes content blocks into the persisted form.
pub fn content_to_stored(content: &[ContentBlock]) -> Result<String, ProviderError> {
    serde_json::to_string(content)
        .map_err(|error| ProviderError::invalid_request(error.to_string()))
}

/// Reconstructs content blocks from the persisted form. A stored JSON array
/// of tagged blocks parses directly; anything else is treated as legacy
/// plain-string content and normalized into a single `Text` block.
pub fn content_from_stored(raw: &str) -> Vec<ContentBlock> {
    match serde_json::from_str::<Vec<ContentBlock>>(raw) {
        Ok(blocks) => blocks,
        Err(_) => vec![ContentBlock::text(raw)],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    MaxTokens,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The single terminal value of one provider invocation.
///
/// `stop_reason` is `None` when the provider never reported one; the turn
/// loop treats that as a defensive exit condition.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalMessage {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub usage: TokenUsage,
}

impl FinalMessage {
    pub fn text(&self) -> String {
        let mut text = String::new();
        for block in &self.content {
            if let ContentBlock::Text { text: chunk } = block {
                text.push_str(chunk);
            }
        }

        text
    }

    pub fn tool_uses(&self) -> Vec<ToolInvocation> {
        Turn::assistant(self.content.clone()).tool_uses()
    }

    pub fn ends_turn(&self) -> bool {
        self.stop_reason == Some(StopReason::EndTurn)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub model: String,
    pub system: Option<String>,
    pub history: Vec<Turn>,
    pub tools: Vec<ToolDefinition>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub metadata: MetadataMap,
}

impl ModelRequest {
    pub fn builder(model: impl Into<String>) -> ModelRequestBuilder {
        ModelRequestBuilder::new(model)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.model.trim().is_empty() {
            return Err(ProviderError::invalid_request("model must not be empty"));
        }

        if self.history.is_empty() {
            return Err(ProviderError::invalid_request(
                "at least one turn is required",
            ));
        }

        if self.max_tokens == 0 {
            return Err(ProviderError::invalid_request(
                "max_tokens must be greater than zero",
            ));
        }

        if let Some(temperature) = self.temperature
            && !(0.0..=1.0).contains(&temperature)
        {
            return Err(ProviderError::invalid_request(
                "temperature must be in the inclusive range 0.0..=1.0",
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequestBuilder {
    model: String,
    system: Option<String>,
    history: Vec<Turn>,
    tools: Vec<ToolDefinition>,
    max_tokens: u32,
    temperature: Option<f32>,
    metadata: MetadataMap,
}

impl ModelRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            system: None,
            history: Vec::new(),
            tools: Vec::new(),
            max_tokens: 1024,
            temperature: None,
            metadata: MetadataMap::new(),
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn turn(mut self, turn: Turn) -> Self {
        self.history.push(turn);
        self
    }

    pub fn history(mut self, history: Vec<Turn>) -> Self {
        self.history.extend(history);
        self
    }

    pub fn tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<ModelRequest, ProviderError> {
        let request = ModelRequest {
            model: self.model,
            system: self.system,
            history: self.history,
            tools: self.tools,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            metadata: self.metadata,
        };

        request.validate()?;
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::ProviderErrorKind;

    #[test]
    fn provider_id_display_is_stable() {
        assert_eq!(ProviderId::Anthropic.to_string(), "anthropic");
        assert_eq!(ProviderId::Scripted.to_string(), "scripted");
    }

    #[test]
    fn content_block_serde_uses_tagged_shape() {
        let block = ContentBlock::text("hi");
        let encoded = serde_json::to_string(&block).expect("encode");
        assert_eq!(encoded, r#"{"type":"text","text":"hi"}"#);

        let tool_use = ContentBlock::tool_use(ToolInvocation {
            id: "call_1".to_string(),
            name: "search_catalog".to_string(),
            input: json!({"query": "mugs"}),
        });
        let encoded = serde_json::to_value(&tool_use).expect("encode");
        assert_eq!(encoded["type"], "tool_use");
        assert_eq!(encoded["name"], "search_catalog");
    }

    #[test]
    fn tool_result_error_tag_survives_round_trip() {
        let block = ContentBlock::tool_error("call_1", "not found");
        let encoded = serde_json::to_string(&block).expect("encode");
        let decoded: ContentBlock = serde_json::from_str(&encoded).expect("decode");
        assert_eq!(decoded, block);

        // The error tag is omitted from the wire form when false.
        let ok = serde_json::to_value(ContentBlock::tool_result("call_2", "ok")).expect("encode");
        assert!(ok.get("is_error").is_none());
    }

    #[test]
    fn stored_content_round_trips_block_arrays() {
        let content = vec![
            ContentBlock::text("see results"),
            ContentBlock::tool_result("call_1", "{}"),
        ];

        let stored = content_to_stored(&content).expect("serialize");
        assert_eq!(content_from_stored(&stored), content);
    }

    #[test]
    fn stored_content_normalizes_legacy_plain_strings() {
        assert_eq!(
            content_from_stored("hi"),
            vec![ContentBlock::text("hi")]
        );
    }

    #[test]
    fn stored_content_normalization_is_idempotent() {
        let normalized = content_from_stored("hi");
        let stored = content_to_stored(&normalized).expect("serialize");
        assert_eq!(content_from_stored(&stored), normalized);
    }

    #[test]
    fn turn_text_concatenates_text_blocks_in_order() {
        let turn = Turn::assistant(vec![
            ContentBlock::text("Hel"),
            ContentBlock::tool_result("call_1", "ignored"),
            ContentBlock::text("lo"),
        ]);

        assert_eq!(turn.text(), "Hello");
    }

    #[test]
    fn turn_tool_uses_extracts_invocations() {
        let turn = Turn::assistant(vec![
            ContentBlock::text("let me check"),
            ContentBlock::tool_use(ToolInvocation {
                id: "call_1".to_string(),
                name: "lookup_order".to_string(),
                input: json!({"order_id": "1001"}),
            }),
        ]);

        let invocations = turn.tool_uses();
        assert_eq!(invocations.len(), 1);
        assert_eq!(invocations[0].name, "lookup_order");
    }

    #[test]
    fn model_request_validate_enforces_contract() {
        let empty_model = ModelRequest::builder("   ")
            .turn(Turn::user_text("hi"))
            .build();
        assert_eq!(
            empty_model.err().map(|e| e.kind),
            Some(ProviderErrorKind::InvalidRequest)
        );

        let empty_history = ModelRequest::builder("claude-sonnet-4-5").build();
        assert_eq!(
            empty_history.err().map(|e| e.kind),
            Some(ProviderErrorKind::InvalidRequest)
        );

        let bad_temperature = ModelRequest::builder("claude-sonnet-4-5")
            .turn(Turn::user_text("hi"))
            .temperature(1.5)
            .build();
        assert_eq!(
            bad_temperature.err().map(|e| e.kind),
            Some(ProviderErrorKind::InvalidRequest)
        );

        let valid = ModelRequest::builder("claude-sonnet-4-5")
            .system("You help shoppers.")
            .turn(Turn::user_text("hi"))
            .max_tokens(512)
            .metadata("trace_id", "abc")
            .build()
            .expect("request should build");
        assert_eq!(valid.max_tokens, 512);
        assert_eq!(valid.metadata.get("trace_id"), Some(&"abc".to_string()));
    }
}
