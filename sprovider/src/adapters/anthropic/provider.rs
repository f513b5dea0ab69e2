//! Anthropic adapter: assembles Messages API wire events into the
//! provider-neutral stream contract.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_stream::try_stream;
use futures_util::StreamExt;
use serde_json::Value;

use super::serde_api::{
    build_api_request, parse_stop_reason, AnthropicBlockDelta, AnthropicBlockOpen,
    AnthropicStreamEvent,
};
use super::transport::{AnthropicHttpTransport, AnthropicTransport};
use crate::{
    BoxedEventStream, ContentBlock, FinalMessage, ModelProvider, ModelRequest, ProviderError,
    ProviderFuture, ProviderId, StreamEvent, TokenUsage, ToolInvocation,
};

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5";

pub struct AnthropicProvider {
    transport: Arc<dyn AnthropicTransport>,
    api_key: String,
}

impl AnthropicProvider {
    pub fn new(api_key: impl Into<String>, transport: Arc<dyn AnthropicTransport>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn over_http(api_key: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new(api_key, Arc::new(AnthropicHttpTransport::new(client)))
    }
}

impl ModelProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            request.validate()?;
            let api_request = build_api_request(request, true)?;
            let wire = self.transport.stream(api_request, self.api_key.clone()).await?;

            Ok(assemble(wire))
        })
    }
}

/// A content block still receiving deltas. Tool-use input arrives as
/// `partial_json` fragments and is only parseable once the block stops.
enum OpenBlock {
    Text(String),
    ToolUse {
        id: String,
        name: String,
        json: String,
    },
}

fn assemble<'a>(
    mut wire: super::transport::AnthropicWireStream<'a>,
) -> BoxedEventStream<'a> {
    Box::pin(try_stream! {
        let mut open: BTreeMap<usize, OpenBlock> = BTreeMap::new();
        let mut completed: BTreeMap<usize, ContentBlock> = BTreeMap::new();
        let mut stop_reason = None;
        let mut usage = TokenUsage::default();

        while let Some(event) = wire.next().await {
            match event? {
                AnthropicStreamEvent::MessageStart { message } => {
                    if let Some(start_usage) = message.usage {
                        usage.input_tokens = start_usage.input_tokens;
                        usage.output_tokens = start_usage.output_tokens;
                    }
                }
                AnthropicStreamEvent::ContentBlockStart { index, content_block } => {
                    let block = match content_block {
                        AnthropicBlockOpen::Text { text } => OpenBlock::Text(text),
                        AnthropicBlockOpen::ToolUse { id, name } => OpenBlock::ToolUse {
                            id,
                            name,
                            json: String::new(),
                        },
                    };
                    open.insert(index, block);
                }
                AnthropicStreamEvent::ContentBlockDelta { index, delta } => {
                    match (open.get_mut(&index), delta) {
                        (
                            Some(OpenBlock::Text(buffer)),
                            AnthropicBlockDelta::TextDelta { text },
                        ) => {
                            buffer.push_str(&text);
                            yield StreamEvent::TextDelta(text);
                        }
                        (
                            Some(OpenBlock::ToolUse { json, .. }),
                            AnthropicBlockDelta::InputJsonDelta { partial_json },
                        ) => {
                            json.push_str(&partial_json);
                        }
                        _ => {
                            Err::<(), ProviderError>(ProviderError::transport(
                                "Anthropic stream sent a delta for a mismatched block",
                            ))?;
                        }
                    }
                }
                AnthropicStreamEvent::ContentBlockStop { index } => {
                    let block = open.remove(&index).ok_or_else(|| {
                        ProviderError::transport(
                            "Anthropic stream stopped a block it never started",
                        )
                    })?;

                    let finished = match block {
                        OpenBlock::Text(text) => ContentBlock::Text { text },
                        OpenBlock::ToolUse { id, name, json } => {
                            let input = parse_tool_input(&json)?;
                            let invocation = ToolInvocation {
                                id: id.clone(),
                                name: name.clone(),
                                input: input.clone(),
                            };
                            yield StreamEvent::ToolUseRequest(invocation);
                            ContentBlock::ToolUse { id, name, input }
                        }
                    };
                    completed.insert(index, finished);
                }
                AnthropicStreamEvent::MessageDelta { delta, usage: usage_delta } => {
                    if delta.stop_reason.is_some() {
                        stop_reason = parse_stop_reason(delta.stop_reason.as_deref());
                    }
                    if let Some(usage_delta) = usage_delta {
                        usage.output_tokens = usage_delta.output_tokens;
                    }
                }
                AnthropicStreamEvent::MessageStop => break,
                AnthropicStreamEvent::Ping => {}
                AnthropicStreamEvent::Error { error } => {
                    Err::<(), ProviderError>(ProviderError::transport(format!(
                        "Anthropic stream error: {}",
                        error.message
                    )))?;
                }
            }
        }

        yield StreamEvent::MessageComplete(FinalMessage {
            content: completed.into_values().collect(),
            stop_reason,
            usage,
        });
    })
}

fn parse_tool_input(json: &str) -> Result<Value, ProviderError> {
    if json.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    serde_json::from_str(json).map_err(|error| {
        ProviderError::transport(format!("Anthropic tool input did not parse: {error}"))
    })
}
