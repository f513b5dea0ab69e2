//! Customer authorization gate for storefront chat sessions.
//!
//! Messages carrying account, order, or identity intent must ride an
//! authorized customer session. The [`AuthorizationGate`] checks a fixed
//! keyword vocabulary, reuses a usable [`CustomerSession`] when one
//! exists, and otherwise starts an OAuth authorization-code handshake
//! with a PKCE S256 challenge and a single-use state token.
//!
//! ```rust
//! use sauth::requires_authorization;
//!
//! assert!(requires_authorization("track my order"));
//! assert!(!requires_authorization("do you carry hiking boots?"));
//! ```

mod error;
mod gate;
mod intent;
mod pkce;
mod session;
mod state;

pub use error::{AuthError, AuthErrorKind};
pub use gate::{AuthConfig, AuthorizationGate, GateDecision, RedeemedState};
pub use intent::{requires_authorization, ACCOUNT_INTENT_KEYWORDS};
pub use pkce::{challenge_for, PkcePair};
pub use session::{CustomerSession, CustomerSessionStore, InMemoryCustomerSessionStore};
pub use state::{AuthFuture, AuthStateStore, AuthorizationState, InMemoryAuthStateStore};
