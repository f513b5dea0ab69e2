//! Streaming event contracts and in-memory stream utilities.
//!
//! ```rust
//! use sprovider::{BoxedEventStream, StreamEvent, VecEventStream};
//!
//! let stream = VecEventStream::new(vec![Ok(StreamEvent::TextDelta("hello".into()))]);
//! let _boxed: BoxedEventStream<'static> = Box::pin(stream);
//! ```

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;

use crate::{FinalMessage, ProviderError, ToolInvocation};

/// The three channels of one provider invocation, in provider emission
/// order with no reordering.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    TextDelta(String),
    ToolUseRequest(ToolInvocation),
    MessageComplete(FinalMessage),
}

/// Provider stream contract.
///
/// Invariants for consumers:
/// - Events are emitted in source order.
/// - `TextDelta` and `ToolUseRequest` may appear zero or more times.
/// - `MessageComplete` appears exactly once and is terminal; every delta
///   and tool-use request arrives before it.
/// - A stream that fails yields exactly one `Err` and nothing after it.
pub trait ModelEventStream: Stream<Item = Result<StreamEvent, ProviderError>> + Send {}

impl<T> ModelEventStream for T where T: Stream<Item = Result<StreamEvent, ProviderError>> + Send {}

pub type BoxedEventStream<'a> = Pin<Box<dyn ModelEventStream + 'a>>;

/// Scripted event stream for deterministic test providers.
#[derive(Debug)]
pub struct VecEventStream {
    events: VecDeque<Result<StreamEvent, ProviderError>>,
}

impl VecEventStream {
    pub fn new(events: Vec<Result<StreamEvent, ProviderError>>) -> Self {
        Self {
            events: events.into(),
        }
    }
}

impl Stream for VecEventStream {
    type Item = Result<StreamEvent, ProviderError>;

    fn poll_next(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Option<Result<StreamEvent, ProviderError>>> {
        Poll::Ready(self.events.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;

    use super::*;
    use crate::{StopReason, TokenUsage};

    #[tokio::test]
    async fn vec_event_stream_yields_events_in_order() {
        let complete = FinalMessage {
            content: Vec::new(),
            stop_reason: Some(StopReason::EndTurn),
            usage: TokenUsage::default(),
        };

        let mut stream = VecEventStream::new(vec![
            Ok(StreamEvent::TextDelta("one".into())),
            Ok(StreamEvent::TextDelta("two".into())),
            Ok(StreamEvent::MessageComplete(complete.clone())),
        ]);

        assert_eq!(
            stream.next().await,
            Some(Ok(StreamEvent::TextDelta("one".into())))
        );
        assert_eq!(
            stream.next().await,
            Some(Ok(StreamEvent::TextDelta("two".into())))
        );
        assert_eq!(
            stream.next().await,
            Some(Ok(StreamEvent::MessageComplete(complete)))
        );
        assert_eq!(stream.next().await, None);
    }
}
