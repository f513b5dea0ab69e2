//! Chat-layer errors and conversions from the provider and tooling seams.

use std::error::Error;
use std::fmt::{Display, Formatter};

use sprovider::{ProviderError, ProviderErrorKind};
use stooling::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    InvalidRequest,
    Authentication,
    RateLimited,
    Provider,
    Store,
    Tooling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
    pub status: Option<u16>,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::InvalidRequest, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Authentication, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::RateLimited, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Provider, message)
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Store, message)
    }

    pub fn tooling(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Tooling, message)
    }
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for ChatError {}

impl From<ProviderError> for ChatError {
    fn from(value: ProviderError) -> Self {
        let kind = match value.kind {
            ProviderErrorKind::Authentication => ChatErrorKind::Authentication,
            ProviderErrorKind::RateLimited => ChatErrorKind::RateLimited,
            _ => ChatErrorKind::Provider,
        };

        Self {
            kind,
            message: value.message,
            status: value.status,
        }
    }
}

impl From<ToolError> for ChatError {
    fn from(value: ToolError) -> Self {
        ChatError::tooling(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_kind_and_status() {
        let auth: ChatError = ProviderError::authentication("bad key")
            .with_status(401)
            .into();
        assert_eq!(auth.kind, ChatErrorKind::Authentication);
        assert_eq!(auth.status, Some(401));

        let rate: ChatError = ProviderError::rate_limited("slow down").into();
        assert_eq!(rate.kind, ChatErrorKind::RateLimited);

        let transport: ChatError = ProviderError::transport("connection reset").into();
        assert_eq!(transport.kind, ChatErrorKind::Provider);
    }
}
