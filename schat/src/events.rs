//! The client event vocabulary and terminal failure classification.

use serde::Serialize;
use stooling::ProductDisplay;

use crate::{ChatError, ChatErrorKind};

pub const AUTH_FAILURE_MESSAGE: &str =
    "The assistant could not authenticate with its model provider. Please contact the store.";
pub const RATE_LIMIT_MESSAGE: &str =
    "The assistant is handling too many requests right now. Please try again in a moment.";

/// Everything a client can receive over a session, as a closed enum.
/// String names exist only at the serialization boundary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Id { conversation_id: String },
    Chunk { text: String },
    MessageComplete,
    ToolUse { description: String },
    ContentBlockComplete,
    NewMessage,
    EndTurn,
    ProductResults { products: Vec<ProductDisplay> },
    Done,
    Error { message: String },
    RateLimitExceeded { message: String },
}

/// Maps a session failure to the single terminal event the client sees.
///
/// Authentication problems get a fixed message so key material never
/// leaks into the client; rate limiting gets its own event type so the
/// client can back off; everything else surfaces the raw message.
pub fn classify_session_failure(error: &ChatError) -> ClientEvent {
    let lowered = error.message.to_lowercase();

    if error.kind == ChatErrorKind::Authentication
        || error.status == Some(401)
        || lowered.contains("auth")
        || lowered.contains("key")
    {
        return ClientEvent::Error {
            message: AUTH_FAILURE_MESSAGE.to_string(),
        };
    }

    if error.kind == ChatErrorKind::RateLimited
        || matches!(error.status, Some(429) | Some(529))
        || lowered.contains("overloaded")
    {
        return ClientEvent::RateLimitExceeded {
            message: RATE_LIMIT_MESSAGE.to_string(),
        };
    }

    ClientEvent::Error {
        message: error.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_snake_case_type_tags() {
        let id = ClientEvent::Id {
            conversation_id: "conv-1".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&id).expect("encode"),
            r#"{"type":"id","conversation_id":"conv-1"}"#
        );

        let end = ClientEvent::EndTurn;
        assert_eq!(
            serde_json::to_string(&end).expect("encode"),
            r#"{"type":"end_turn"}"#
        );

        let rate = ClientEvent::RateLimitExceeded {
            message: "slow down".to_string(),
        };
        let value = serde_json::to_value(&rate).expect("encode");
        assert_eq!(value["type"], "rate_limit_exceeded");
    }

    #[test]
    fn authentication_failures_use_the_fixed_message() {
        let by_kind = classify_session_failure(&ChatError::authentication("invalid x-api-key"));
        let by_status = classify_session_failure(&ChatError::provider("denied").with_status(401));
        let by_marker = classify_session_failure(&ChatError::provider("API key missing"));

        for event in [by_kind, by_status, by_marker] {
            assert_eq!(
                event,
                ClientEvent::Error {
                    message: AUTH_FAILURE_MESSAGE.to_string()
                }
            );
        }
    }

    #[test]
    fn rate_limit_failures_get_their_own_event() {
        let by_kind = classify_session_failure(&ChatError::rate_limited("try later"));
        let by_status = classify_session_failure(&ChatError::provider("busy").with_status(529));
        let by_marker = classify_session_failure(&ChatError::provider("Overloaded"));

        for event in [by_kind, by_status, by_marker] {
            assert!(matches!(event, ClientEvent::RateLimitExceeded { .. }));
        }
    }

    #[test]
    fn other_failures_carry_the_raw_message() {
        let event = classify_session_failure(&ChatError::provider("connection reset"));
        assert_eq!(
            event,
            ClientEvent::Error {
                message: "connection reset".to_string()
            }
        );
    }
}
