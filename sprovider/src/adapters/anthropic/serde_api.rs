//! Anthropic Messages API payload serde models and conversion helpers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ContentBlock, ModelRequest, ProviderError, StopReason};

pub(crate) fn build_api_request(
    request: ModelRequest,
    stream: bool,
) -> Result<AnthropicRequest, ProviderError> {
    let messages = request
        .history
        .into_iter()
        .map(|turn| AnthropicMessage {
            role: turn.role.as_str().to_string(),
            content: turn.content,
        })
        .collect::<Vec<_>>();

    let tools = if request.tools.is_empty() {
        None
    } else {
        Some(
            request
                .tools
                .into_iter()
                .map(AnthropicTool::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        )
    };

    Ok(AnthropicRequest {
        model: request.model,
        max_tokens: request.max_tokens,
        system: request.system,
        messages,
        tools,
        temperature: request.temperature,
        stream,
    })
}

pub(crate) fn parse_stop_reason(value: Option<&str>) -> Option<StopReason> {
    match value {
        Some("end_turn") | Some("stop_sequence") => Some(StopReason::EndTurn),
        Some("tool_use") => Some(StopReason::ToolUse),
        Some("max_tokens") => Some(StopReason::MaxTokens),
        Some(_) => Some(StopReason::Other),
        None => None,
    }
}

pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let parsed = serde_json::from_str::<AnthropicApiErrorEnvelope>(body).ok()?;
    Some(parsed.error.message)
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnthropicApiErrorEnvelope {
    pub error: AnthropicApiError,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnthropicApiError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicRequest {
    pub model: String,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    pub messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<AnthropicTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    pub stream: bool,
}

/// Turns already serialize in the Messages API content-block shape, so the
/// wire message reuses [`ContentBlock`] directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicMessage {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnthropicTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl TryFrom<crate::ToolDefinition> for AnthropicTool {
    type Error = ProviderError;

    fn try_from(value: crate::ToolDefinition) -> Result<Self, Self::Error> {
        let input_schema = serde_json::from_str::<Value>(&value.input_schema).map_err(|_| {
            ProviderError::invalid_request("tool input schema must be valid JSON")
        })?;

        Ok(Self {
            name: value.name,
            description: value.description,
            input_schema,
        })
    }
}

/// One server-sent event from the Messages API stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicStreamEvent {
    MessageStart {
        message: AnthropicMessageStart,
    },
    ContentBlockStart {
        index: usize,
        content_block: AnthropicBlockOpen,
    },
    ContentBlockDelta {
        index: usize,
        delta: AnthropicBlockDelta,
    },
    ContentBlockStop {
        index: usize,
    },
    MessageDelta {
        delta: AnthropicMessageDelta,
        #[serde(default)]
        usage: Option<AnthropicUsageDelta>,
    },
    MessageStop,
    Ping,
    Error {
        error: AnthropicApiError,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicMessageStart {
    #[serde(default)]
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicBlockOpen {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnthropicBlockDelta {
    TextDelta { text: String },
    InputJsonDelta { partial_json: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnthropicMessageDelta {
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnthropicUsage {
    #[serde(default)]
    pub input_tokens: u32,
    #[serde(default)]
    pub output_tokens: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnthropicUsageDelta {
    #[serde(default)]
    pub output_tokens: u32,
}
