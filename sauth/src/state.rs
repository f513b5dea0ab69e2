//! Single-use authorization state storage.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use scommon::{BoxFuture, ConversationId, ShopId};

use crate::AuthError;

pub type AuthFuture<'a, T> = BoxFuture<'a, T>;

/// Pending authorization handshake, keyed by the composite state token
/// `{conversationId}-{shopId}` that rides the authorization URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationState {
    pub conversation_id: ConversationId,
    pub shop_id: ShopId,
    pub code_verifier: String,
    pub created_at: u64,
}

impl AuthorizationState {
    pub fn new(
        conversation_id: impl Into<ConversationId>,
        shop_id: impl Into<ShopId>,
        code_verifier: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            shop_id: shop_id.into(),
            code_verifier: code_verifier.into(),
            created_at: unix_now(),
        }
    }

    pub fn state_key(&self) -> String {
        format!("{}-{}", self.conversation_id, self.shop_id)
    }
}

/// Store contract for pending handshakes. `consume` must be at-most-once:
/// of two concurrent redemptions of the same key, exactly one sees the
/// state.
pub trait AuthStateStore: Send + Sync {
    fn put<'a>(&'a self, state: AuthorizationState) -> AuthFuture<'a, Result<(), AuthError>>;

    fn consume<'a>(
        &'a self,
        state_key: &'a str,
    ) -> AuthFuture<'a, Result<Option<AuthorizationState>, AuthError>>;
}

#[derive(Default)]
pub struct InMemoryAuthStateStore {
    states: Mutex<HashMap<String, AuthorizationState>>,
}

impl InMemoryAuthStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuthStateStore for InMemoryAuthStateStore {
    fn put<'a>(&'a self, state: AuthorizationState) -> AuthFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let mut states = self
                .states
                .lock()
                .map_err(|_| AuthError::storage("auth state store lock poisoned"))?;
            states.insert(state.state_key(), state);
            Ok(())
        })
    }

    fn consume<'a>(
        &'a self,
        state_key: &'a str,
    ) -> AuthFuture<'a, Result<Option<AuthorizationState>, AuthError>> {
        Box::pin(async move {
            let mut states = self
                .states
                .lock()
                .map_err(|_| AuthError::storage("auth state store lock poisoned"))?;
            Ok(states.remove(state_key))
        })
    }
}

pub(crate) fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
