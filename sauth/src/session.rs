//! Customer session storage.

use std::collections::HashMap;
use std::sync::Mutex;

use scommon::ConversationId;

use crate::state::{unix_now, AuthFuture};
use crate::AuthError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSession {
    pub conversation_id: ConversationId,
    pub access_token: String,
    pub issued_at: u64,
    pub expires_in: Option<u64>,
}

impl CustomerSession {
    pub fn new(
        conversation_id: impl Into<ConversationId>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            access_token: access_token.into(),
            issued_at: unix_now(),
            expires_in: None,
        }
    }

    pub fn with_expires_in(mut self, seconds: u64) -> Self {
        self.expires_in = Some(seconds);
        self
    }

    /// A session without an expiry never lapses.
    pub fn is_usable_at(&self, now: u64) -> bool {
        match self.expires_in {
            Some(seconds) => now < self.issued_at.saturating_add(seconds),
            None => true,
        }
    }

    pub fn is_usable(&self) -> bool {
        self.is_usable_at(unix_now())
    }
}

pub trait CustomerSessionStore: Send + Sync {
    fn put<'a>(&'a self, session: CustomerSession) -> AuthFuture<'a, Result<(), AuthError>>;

    fn get<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> AuthFuture<'a, Result<Option<CustomerSession>, AuthError>>;
}

#[derive(Default)]
pub struct InMemoryCustomerSessionStore {
    sessions: Mutex<HashMap<ConversationId, CustomerSession>>,
}

impl InMemoryCustomerSessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CustomerSessionStore for InMemoryCustomerSessionStore {
    fn put<'a>(&'a self, session: CustomerSession) -> AuthFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let mut sessions = self
                .sessions
                .lock()
                .map_err(|_| AuthError::storage("customer session store lock poisoned"))?;
            sessions.insert(session.conversation_id.clone(), session);
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> AuthFuture<'a, Result<Option<CustomerSession>, AuthError>> {
        Box::pin(async move {
            let sessions = self
                .sessions
                .lock()
                .map_err(|_| AuthError::storage("customer session store lock poisoned"))?;
            Ok(sessions.get(conversation_id).cloned())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sessions_without_expiry_stay_usable() {
        let session = CustomerSession::new("conv-1", "shcat_123");
        assert!(session.is_usable_at(u64::MAX));
    }

    #[test]
    fn expired_sessions_are_unusable() {
        let mut session = CustomerSession::new("conv-1", "shcat_123").with_expires_in(60);
        session.issued_at = 1_000;
        assert!(session.is_usable_at(1_059));
        assert!(!session.is_usable_at(1_060));
    }

    #[tokio::test]
    async fn store_round_trips_by_conversation() {
        let store = InMemoryCustomerSessionStore::new();
        let session = CustomerSession::new("conv-1", "shcat_123");

        store.put(session.clone()).await.expect("put should succeed");

        let loaded = store
            .get(&ConversationId::from("conv-1"))
            .await
            .expect("get should succeed");
        assert_eq!(loaded, Some(session));

        let missing = store
            .get(&ConversationId::from("conv-2"))
            .await
            .expect("get should succeed");
        assert_eq!(missing, None);
    }
}
