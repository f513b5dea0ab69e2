//! Delivery-mode implementations of the client event channel.

use std::sync::Mutex;

use serde::Serialize;
use stooling::ProductDisplay;
use tokio::sync::mpsc::UnboundedSender;

use crate::ClientEvent;

/// Push target for client events. Chosen once at session start; the turn
/// loop never branches on the delivery mode.
pub trait EventEmitter: Send + Sync {
    fn send(&self, event: &ClientEvent);

    fn close(&self) {}
}

/// Streams each event as an SSE frame (`data: <JSON>\n\n`) the moment it
/// is sent. Delivery is best effort: a closed peer or a serialization
/// failure is logged and swallowed, never surfaced to the turn loop.
pub struct SseEmitter {
    frames: UnboundedSender<String>,
}

impl SseEmitter {
    pub fn new(frames: UnboundedSender<String>) -> Self {
        Self { frames }
    }
}

impl EventEmitter for SseEmitter {
    fn send(&self, event: &ClientEvent) {
        let encoded = match serde_json::to_string(event) {
            Ok(encoded) => encoded,
            Err(error) => {
                tracing::warn!(error = %error, "client event failed to serialize");
                return;
            }
        };

        if self.frames.send(format!("data: {encoded}\n\n")).is_err() {
            tracing::debug!("sse peer closed, dropping client event");
        }
    }
}

/// Collects the whole session and materializes one JSON document at the
/// end: the buffered (non-streaming) delivery mode.
#[derive(Default)]
pub struct BufferedEmitter {
    inner: Mutex<BufferedState>,
}

#[derive(Default)]
struct BufferedState {
    conversation_id: Option<String>,
    message: String,
    products: Vec<ProductDisplay>,
    events: Vec<ClientEvent>,
}

/// The single response document of a buffered session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionDocument {
    pub conversation_id: Option<String>,
    pub message: String,
    pub products: Vec<ProductDisplay>,
    pub events: Vec<ClientEvent>,
}

impl BufferedEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_document(self) -> SessionDocument {
        let state = self
            .inner
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        SessionDocument {
            conversation_id: state.conversation_id,
            message: state.message,
            products: state.products,
            events: state.events,
        }
    }
}

impl EventEmitter for BufferedEmitter {
    fn send(&self, event: &ClientEvent) {
        let Ok(mut state) = self.inner.lock() else {
            tracing::warn!("buffered emitter lock poisoned, dropping client event");
            return;
        };

        match event {
            ClientEvent::Id { conversation_id } => {
                state.conversation_id = Some(conversation_id.clone());
            }
            ClientEvent::Chunk { text } => state.message.push_str(text),
            ClientEvent::ProductResults { products } => {
                state.products = products.clone();
            }
            _ => {}
        }

        state.events.push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[test]
    fn sse_emitter_frames_events_as_data_lines() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emitter = SseEmitter::new(tx);

        emitter.send(&ClientEvent::Chunk {
            text: "Hel".to_string(),
        });

        let frame = rx.try_recv().expect("frame should be queued");
        assert_eq!(frame, "data: {\"type\":\"chunk\",\"text\":\"Hel\"}\n\n");
    }

    #[test]
    fn sse_emitter_swallows_closed_peer() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let emitter = SseEmitter::new(tx);

        emitter.send(&ClientEvent::EndTurn);
        emitter.close();
    }

    #[test]
    fn buffered_emitter_concatenates_chunks() {
        let emitter = BufferedEmitter::new();
        emitter.send(&ClientEvent::Id {
            conversation_id: "conv-1".to_string(),
        });
        emitter.send(&ClientEvent::Chunk {
            text: "Hel".to_string(),
        });
        emitter.send(&ClientEvent::Chunk {
            text: "lo".to_string(),
        });
        emitter.send(&ClientEvent::EndTurn);

        let document = emitter.into_document();
        assert_eq!(document.conversation_id.as_deref(), Some("conv-1"));
        assert_eq!(document.message, "Hello");
        assert_eq!(document.events.len(), 4);
        assert!(document.products.is_empty());
    }

    #[test]
    fn buffered_emitter_keeps_latest_product_results() {
        let boots = ProductDisplay {
            title: Some("Trail Boots".to_string()),
            ..ProductDisplay::default()
        };
        let socks = ProductDisplay {
            title: Some("Wool Socks".to_string()),
            ..ProductDisplay::default()
        };

        let emitter = BufferedEmitter::new();
        emitter.send(&ClientEvent::ProductResults {
            products: vec![boots],
        });
        emitter.send(&ClientEvent::ProductResults {
            products: vec![socks.clone()],
        });

        let document = emitter.into_document();
        assert_eq!(document.products, vec![socks]);
    }
}
