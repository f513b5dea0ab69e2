//! SQLite-backed conversation log.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::{params, Connection};
use schat::{ChatError, ChatFuture, ConversationStore};
use scommon::ConversationId;
use sprovider::{content_from_stored, content_to_stored, Role, Turn};

/// Durable append-only turn log.
///
/// Turn content is stored as the JSON array of tagged content blocks.
/// Rows written by earlier deployments hold plain message strings; those
/// are normalized into a single text block on read, never rewritten.
#[derive(Debug)]
pub struct SqliteConversationStore {
    connection: Mutex<Connection>,
}

impl SqliteConversationStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|error| {
                ChatError::store(format!("failed to create sqlite parent directory: {error}"))
            })?;
        }

        let connection = Connection::open(path).map_err(|error| {
            ChatError::store(format!("failed to open sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    pub fn new_in_memory() -> Result<Self, ChatError> {
        let connection = Connection::open_in_memory().map_err(|error| {
            ChatError::store(format!("failed to open in-memory sqlite database: {error}"))
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(connection: Connection) -> Result<Self, ChatError> {
        connection
            .busy_timeout(Duration::from_secs(5))
            .map_err(|error| {
                ChatError::store(format!("failed to configure sqlite busy timeout: {error}"))
            })?;
        let store = Self {
            connection: Mutex::new(connection),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, ChatError> {
        self.connection
            .lock()
            .map_err(|_| ChatError::store("conversation store lock poisoned"))
    }

    fn initialize_schema(&self) -> Result<(), ChatError> {
        let conn = self.connection()?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS turns (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                conversation_id TEXT NOT NULL,
                seq INTEGER NOT NULL,
                role TEXT NOT NULL,
                content TEXT NOT NULL
            );

            CREATE UNIQUE INDEX IF NOT EXISTS idx_turns_conversation_seq
            ON turns(conversation_id, seq);
            ",
        )
        .map_err(|error| {
            ChatError::store(format!("failed to initialize sqlite schema: {error}"))
        })?;

        Ok(())
    }
}

impl ConversationStore for SqliteConversationStore {
    fn load_turns<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
    ) -> ChatFuture<'a, Result<Vec<Turn>, ChatError>> {
        Box::pin(async move {
            let conn = self.connection()?;
            let mut stmt = conn
                .prepare(
                    "
                    SELECT role, content
                    FROM turns
                    WHERE conversation_id = ?1
                    ORDER BY seq ASC
                    ",
                )
                .map_err(|error| {
                    ChatError::store(format!("failed to prepare turn query: {error}"))
                })?;
            let rows = stmt
                .query_map(params![conversation_id.as_str()], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
                })
                .map_err(|error| ChatError::store(format!("failed to query turn rows: {error}")))?;

            let mut turns = Vec::new();
            for row in rows {
                let (role, content) = row.map_err(|error| {
                    ChatError::store(format!("failed to read turn row: {error}"))
                })?;
                turns.push(Turn::new(role_from_str(&role)?, content_from_stored(&content)));
            }
            Ok(turns)
        })
    }

    fn append_turn<'a>(
        &'a self,
        conversation_id: &'a ConversationId,
        turn: Turn,
    ) -> ChatFuture<'a, Result<(), ChatError>> {
        Box::pin(async move {
            let content = content_to_stored(&turn.content)?;
            let conn = self.connection()?;
            // The lock serializes appends, so MAX(seq) + 1 cannot race.
            let next_seq = conn
                .query_row(
                    "SELECT COALESCE(MAX(seq), -1) + 1 FROM turns WHERE conversation_id = ?1",
                    params![conversation_id.as_str()],
                    |row| row.get::<_, i64>(0),
                )
                .map_err(|error| {
                    ChatError::store(format!("failed to compute next turn sequence: {error}"))
                })?;

            conn.execute(
                "
                INSERT INTO turns (conversation_id, seq, role, content)
                VALUES (?1, ?2, ?3, ?4)
                ",
                params![
                    conversation_id.as_str(),
                    next_seq,
                    turn.role.as_str(),
                    content
                ],
            )
            .map_err(|error| ChatError::store(format!("failed to append turn row: {error}")))?;

            Ok(())
        })
    }
}

fn role_from_str(value: &str) -> Result<Role, ChatError> {
    match value {
        "user" => Ok(Role::User),
        "assistant" => Ok(Role::Assistant),
        _ => Err(ChatError::store(format!(
            "unknown turn role value '{value}'"
        ))),
    }
}
