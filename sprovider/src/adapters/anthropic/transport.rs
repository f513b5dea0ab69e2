//! HTTP transport for the Anthropic Messages API.

use std::pin::Pin;
use std::sync::Arc;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use reqwest::{Client, Response};

use super::serde_api::{extract_error_message, AnthropicRequest, AnthropicStreamEvent};
use crate::{
    execute_with_retry, NoopOperationHooks, ProviderError, ProviderFuture, ProviderId,
    ProviderOperationHooks, RetryPolicy,
};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const STREAM_OPERATION: &str = "messages";

pub type AnthropicWireStream<'a> =
    Pin<Box<dyn Stream<Item = Result<AnthropicStreamEvent, ProviderError>> + Send + 'a>>;

/// Transport seam between the adapter and the Messages API, so tests can
/// script wire events without a network.
pub trait AnthropicTransport: Send + Sync {
    fn stream<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<AnthropicWireStream<'a>, ProviderError>>;
}

pub struct AnthropicHttpTransport {
    client: Client,
    base_url: String,
    retry_policy: RetryPolicy,
    hooks: Arc<dyn ProviderOperationHooks>,
}

impl AnthropicHttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            retry_policy: RetryPolicy::default(),
            hooks: Arc::new(NoopOperationHooks),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_operation_hooks(mut self, hooks: Arc<dyn ProviderOperationHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }

    async fn send_once(
        &self,
        request: &AnthropicRequest,
        api_key: &str,
    ) -> Result<Response, ProviderError> {
        let response = self
            .client
            .post(self.endpoint())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    ProviderError::timeout(format!("Anthropic request timed out: {error}"))
                } else {
                    ProviderError::transport(format!("Anthropic request failed: {error}"))
                }
            })?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(map_status_error(response).await)
        }
    }
}

impl AnthropicTransport for AnthropicHttpTransport {
    fn stream<'a>(
        &'a self,
        request: AnthropicRequest,
        api_key: String,
    ) -> ProviderFuture<'a, Result<AnthropicWireStream<'a>, ProviderError>> {
        Box::pin(async move {
            let response = execute_with_retry(
                ProviderId::Anthropic,
                STREAM_OPERATION,
                &self.retry_policy,
                self.hooks.as_ref(),
                |_attempt| self.send_once(&request, &api_key),
                |delay| tokio::time::sleep(delay),
            )
            .await?;

            Ok(sse_event_stream(response))
        })
    }
}

/// Splits the response body into SSE lines and decodes each `data:`
/// payload. Non-data lines (`event:` names, comments, blank separators)
/// carry no information the payloads lack and are skipped.
fn sse_event_stream(response: Response) -> AnthropicWireStream<'static> {
    Box::pin(try_stream! {
        let mut chunks = response.bytes_stream();
        let mut pending: Vec<u8> = Vec::new();
        let mut buffer = String::new();

        while let Some(chunk) = chunks.next().await {
            let bytes = chunk.map_err(|error| {
                ProviderError::transport(format!("Anthropic stream read failed: {error}"))
            })?;
            pending.extend_from_slice(&bytes);
            buffer.push_str(&take_complete_utf8(&mut pending)?);

            while let Some(newline) = buffer.find('\n') {
                let line: String = buffer.drain(..=newline).collect();
                let line = line.trim();

                let Some(payload) = line.strip_prefix("data:") else {
                    continue;
                };
                let payload = payload.trim();
                if payload.is_empty() {
                    continue;
                }

                let event: AnthropicStreamEvent =
                    serde_json::from_str(payload).map_err(|error| {
                        ProviderError::transport(format!(
                            "Anthropic stream payload did not parse: {error}"
                        ))
                    })?;
                yield event;
            }
        }
    })
}

/// Takes the longest valid UTF-8 prefix out of `pending`. A multi-byte
/// character split across two body chunks stays in `pending` until its
/// remaining bytes arrive.
fn take_complete_utf8(pending: &mut Vec<u8>) -> Result<String, ProviderError> {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_owned();
            pending.clear();
            Ok(text)
        }
        Err(error) if error.error_len().is_none() => {
            let valid = error.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            Ok(text)
        }
        Err(error) => Err(ProviderError::transport(format!(
            "Anthropic stream was not valid UTF-8: {error}"
        ))),
    }
}

async fn map_status_error(response: Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = extract_error_message(&body)
        .unwrap_or_else(|| format!("Anthropic request failed with status {status}"));

    let error = match status {
        401 | 403 => ProviderError::authentication(message),
        429 | 529 => ProviderError::rate_limited(message),
        408 | 504 => ProviderError::timeout(message),
        400 | 422 => ProviderError::invalid_request(message),
        502 | 503 => ProviderError::unavailable(message),
        _ => ProviderError::transport(message),
    };
    error.with_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multibyte_characters_split_across_chunks_decode_intact() {
        let mut pending = Vec::new();
        pending.extend_from_slice("caf".as_bytes());
        pending.push(0xC3);

        let first = take_complete_utf8(&mut pending).expect("valid prefix decodes");
        assert_eq!(first, "caf");
        assert_eq!(pending, vec![0xC3]);

        pending.push(0xA9);
        let second = take_complete_utf8(&mut pending).expect("completed character decodes");
        assert_eq!(second, "\u{e9}");
        assert!(pending.is_empty());
    }

    #[test]
    fn fully_valid_chunks_drain_completely() {
        let mut pending = b"data: {}\n".to_vec();
        let text = take_complete_utf8(&mut pending).expect("valid bytes decode");
        assert_eq!(text, "data: {}\n");
        assert!(pending.is_empty());
    }

    #[test]
    fn invalid_bytes_mid_stream_are_an_error() {
        let mut pending = vec![b'o', b'k', 0xFF, b'!'];
        let error = take_complete_utf8(&mut pending).expect_err("invalid UTF-8 must fail");
        assert_eq!(error.kind, crate::ProviderErrorKind::Transport);
    }
}
