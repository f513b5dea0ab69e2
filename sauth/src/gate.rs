//! The authorization gate: intent check, handshake start, callback
//! redemption.

use std::sync::Arc;

use scommon::{ConversationId, ShopId};
use urlencoding::encode;

use crate::intent::requires_authorization;
use crate::pkce::PkcePair;
use crate::state::{AuthFuture, AuthStateStore, AuthorizationState};
use crate::{AuthError, CustomerSessionStore};

/// Explicit gate configuration; nothing is read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    pub client_id: String,
    pub shop_id: ShopId,
    pub authorize_endpoint: String,
    pub redirect_uri: String,
    pub scope: String,
}

impl AuthConfig {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.client_id.trim().is_empty() {
            return Err(AuthError::invalid_config("client_id must not be empty"));
        }
        if self.authorize_endpoint.trim().is_empty() {
            return Err(AuthError::invalid_config(
                "authorize_endpoint must not be empty",
            ));
        }
        if self.redirect_uri.trim().is_empty() {
            return Err(AuthError::invalid_config("redirect_uri must not be empty"));
        }

        Ok(())
    }
}

/// What the session layer does with an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Proceed to the model. Carries the customer token when account
    /// tools are in reach.
    Authorized { customer_token: Option<String> },
    /// Short-circuit the turn: answer with the authorization prompt
    /// instead of invoking the model.
    NeedsAuthorization { prompt_url: String },
}

/// One redeemed handshake, ready for the token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemedState {
    pub conversation_id: ConversationId,
    pub shop_id: ShopId,
    pub code_verifier: String,
    pub authorization_code: String,
}

pub struct AuthorizationGate {
    config: AuthConfig,
    states: Arc<dyn AuthStateStore>,
    sessions: Arc<dyn CustomerSessionStore>,
}

impl AuthorizationGate {
    pub fn new(
        config: AuthConfig,
        states: Arc<dyn AuthStateStore>,
        sessions: Arc<dyn CustomerSessionStore>,
    ) -> Result<Self, AuthError> {
        config.validate()?;

        Ok(Self {
            config,
            states,
            sessions,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Decides whether `message` may proceed to the model for this
    /// conversation. Messages without account intent always pass; with
    /// intent, a usable session passes with its token, otherwise a new
    /// PKCE handshake is persisted and the prompt URL returned.
    pub fn evaluate<'a>(
        &'a self,
        message: &'a str,
        conversation_id: &'a ConversationId,
    ) -> AuthFuture<'a, Result<GateDecision, AuthError>> {
        Box::pin(async move {
            if !requires_authorization(message) {
                return Ok(GateDecision::Authorized {
                    customer_token: None,
                });
            }

            if let Some(session) = self.sessions.get(conversation_id).await? {
                if session.is_usable() {
                    return Ok(GateDecision::Authorized {
                        customer_token: Some(session.access_token),
                    });
                }
            }

            let pair = PkcePair::generate();
            let state = AuthorizationState::new(
                conversation_id.clone(),
                self.config.shop_id.clone(),
                pair.verifier,
            );
            let state_key = state.state_key();
            self.states.put(state).await?;

            Ok(GateDecision::NeedsAuthorization {
                prompt_url: self.authorization_url(&state_key, &pair.challenge),
            })
        })
    }

    /// Consumes the stored handshake state exactly once. A second
    /// redemption of the same state fails with `StateNotFound`.
    pub fn redeem_callback<'a>(
        &'a self,
        state_key: &'a str,
        code: &'a str,
    ) -> AuthFuture<'a, Result<RedeemedState, AuthError>> {
        Box::pin(async move {
            let state = self.states.consume(state_key).await?.ok_or_else(|| {
                AuthError::state_not_found(format!(
                    "authorization state '{state_key}' is unknown or already redeemed"
                ))
            })?;

            Ok(RedeemedState {
                conversation_id: state.conversation_id,
                shop_id: state.shop_id,
                code_verifier: state.code_verifier,
                authorization_code: code.to_string(),
            })
        })
    }

    fn authorization_url(&self, state_key: &str, challenge: &str) -> String {
        format!(
            "{}?client_id={}&scope={}&redirect_uri={}&response_type=code&state={}&code_challenge={}&code_challenge_method=S256",
            self.config.authorize_endpoint,
            encode(&self.config.client_id),
            encode(&self.config.scope),
            encode(&self.config.redirect_uri),
            encode(state_key),
            encode(challenge),
        )
    }
}
