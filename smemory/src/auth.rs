//! SQLite-backed authorization state and customer session storage.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension};
use sauth::{
    AuthError, AuthFuture, AuthStateStore, AuthorizationState, CustomerSession,
    CustomerSessionStore,
};
use scommon::ConversationId;

/// Pending PKCE handshakes and redeemed customer sessions in one database.
#[derive(Debug)]
pub struct SqliteAuthStore {
    connection: Mutex<Connection>,
}

impl SqliteAuthStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                AuthError::storage(format!("failed to create sqlite parent directory: {error}"))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            AuthError::storage(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, AuthError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            AuthError::storage(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, AuthError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                AuthError::storage(format!("failed to configure sqlite busy timeout: {error}"))
            })?;
        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, AuthError> {
        self.connection
            .lock()
            .map_err(|_| AuthError::storage("auth store lock poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), AuthError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS auth_states (
                state_key TEXT PRIMARY KEY,
                conversation_id TEXT NOT NULL,
                shop_id TEXT NOT NULL,
                code_verifier TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS customer_sessions (
                conversation_id TEXT PRIMARY KEY,
                access_token TEXT NOT NULL,
                issued_at INTEGER NOT NULL,
                expires_in INTEGER
            );
            ",
        )
        .map_err(|error| {
            AuthError::storage(format!("failed to initialize sqlite schema: {error}"))
        })?;

        Ok(())
    }
}

impl AuthStateStore for SqliteAuthStore {
    fn put<'a>(&'a self, state: AuthorizationState) -> AuthFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "
                INSERT INTO auth_states (
                    state_key,
                    conversation_id,
                    shop_id,
                    code_verifier,
                    created_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(state_key) DO UPDATE SET
                    conversation_id = excluded.conversation_id,
                    shop_id = excluded.shop_id,
                    code_verifier = excluded.code_verifier,
                    created_at = excluded.created_at
                ",
                params![
                    state.state_key(),
                    state.conversation_id.as_str(),
                    state.shop_id.as_str(),
                    state.code_verifier,
                    state.created_at as i64,
                ],
            )
            .map_err(|error| {
                AuthError::storage(format!("failed to upsert authorization state: {error}"))
            })?;
            Ok(())
        })
    }

    fn consume<'a>(
        &'a self,
        state_key: &'a str,
    ) -> AuthFuture<'a, Result<Option<AuthorizationState>, AuthError>> {
        Box::pin(async move {
            // The lock makes the select-then-delete pair atomic, so two
            // concurrent redemptions cannot both see the row.
            let conn = self.connection()?;
            let state = conn
                .query_row(
                    "
                    SELECT conversation_id, shop_id, code_verifier, created_at
                    FROM auth_states
                    WHERE state_key = ?1
                    ",
                    params![state_key],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                        ))
                    },
                )
                .optional()
                .map_err(|error| {
                    AuthError::storage(format!("failed to query authorization state: {error}"))
                })?;

            let Some((conversation_id, shop_id, code_verifier, created_at)) = state else {
                return Ok(None);
            };

            conn.execute(
                "DELETE FROM auth_states WHERE state_key = ?1",
                params![state_key],
            )
            .map_err(|error| {
                AuthError::storage(format!("failed to delete authorization state: {error}"))
            })?;

            Ok(Some(AuthorizationState {
                conversation_id: conversation_id.into(),
                shop_id: shop_id.into(),
                code_verifier,
                created_at: created_at.max(0) as u64,
            }))
        })
    }
}

impl CustomerSessionStore for SqliteAuthStore {
    fn put<'a>(&'a self, session: CustomerSession) -> AuthFuture<'a, Result<(), AuthError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            conn.execute(
                "
                INSERT INTO customer_sessions (
                    conversation_id,
                    access_token,
                    issued_at,
                    expires_in
                )
                VALUES (?1, ?2, ?3, ?4)
                ON CONFLICT(conversation_id) DO UPDATE SET
                    access_token = excluded.access_token,
                    issued_at = excluded.issued_at,
                    expires_in = excluded.expires_in
                ",
                params![
                    session.conversation_id.as_str(),
                    session.access_token,
                    session.issued_at as i64,
                    session.expires_in.map(|seconds| seconds as i64),
                ],
            )
            .map_err(|error| {
                AuthError::storage(format!("failed to upsert customer session: {error}"))
            })?;
            Ok(())
        })
    }

    fn get<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> AuthFuture<'a, Result<Option<CustomerSession>, AuthError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let row = conn
                .query_row(
                    "
                    SELECT access_token, issued_at, expires_in
                    FROM customer_sessions
                    WHERE conversation_id = ?1
                    ",
                    params![conversation_id.as_str()],
                    |row| {
                        Ok((
                            row.get::<_, String>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, Option<i64>>(2)?,
                        ))
                    },
                )
                .optional()
                .map_err(|error| {
                    AuthError::storage(format!("failed to query customer session: {error}"))
                })?;

            Ok(row.map(|(access_token, issued_at, expires_in)| CustomerSession {
                conversation_id: conversation_id.clone(),
                access_token,
                issued_at: issued_at.max(0) as u64,
                expires_in: expires_in.map(|seconds| seconds.max(0) as u64),
            }))
        })
    }
}
