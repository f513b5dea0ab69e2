//! SQLite persistence for conversations, handshakes, and sessions.
//!
//! [`SqliteConversationStore`] keeps the append-only turn log behind the
//! `schat` store contract, and [`SqliteAuthStore`] backs the `sauth` state
//! and session contracts with single-use handshake rows.
//!
//! ```rust
//! use smemory::SqliteConversationStore;
//!
//! let store = SqliteConversationStore::new_in_memory();
//! assert!(store.is_ok());
//! ```

mod auth;
mod conversation;

pub use auth::SqliteAuthStore;
pub use conversation::SqliteConversationStore;
