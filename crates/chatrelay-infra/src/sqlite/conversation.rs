//! SQLite conversation store implementation.
//!
//! Implements `ConversationStore` from `chatrelay-core` using sqlx with split
//! read/write pools: raw queries, a private Row struct, reads on the reader
//! pool and writes on the single-connection writer pool.

use chatrelay_core::chat::repository::ConversationStore;
use chatrelay_types::chat::{NewTurn, Role, SessionId, Turn};
use chatrelay_types::error::StoreError;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqliteConnection};

use super::pool::DatabasePool;

/// Inserts one turn with the next sequence number for its session.
///
/// The sequence is computed inside the statement, so with the single writer
/// connection two appends can never observe the same `MAX(sequence)`.
const INSERT_TURN: &str = r#"INSERT INTO conversation_turns (session_id, sequence, role, content, created_at)
    VALUES (?, (SELECT COALESCE(MAX(sequence), 0) + 1 FROM conversation_turns WHERE session_id = ?), ?, ?, ?)
    RETURNING sequence"#;

/// Records the session on its first turn; later turns leave the row untouched.
const RECORD_SESSION: &str = "INSERT OR IGNORE INTO sessions (id, created_at) VALUES (?, ?)";

/// SQLite-backed implementation of `ConversationStore`.
pub struct SqliteConversationStore {
    pool: DatabasePool,
}

impl SqliteConversationStore {
    /// Create a new store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row type for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct TurnRow {
    session_id: String,
    sequence: i64,
    role: String,
    content: String,
    created_at: String,
}

impl TurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            sequence: row.try_get("sequence")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_turn(self) -> Result<Turn, StoreError> {
        let session_id = SessionId::parse(&self.session_id)
            .map_err(|e| StoreError::Corrupt(format!("invalid session_id: {e}")))?;
        let role: Role = self.role.parse().map_err(StoreError::Corrupt)?;
        let sequence = u64::try_from(self.sequence)
            .map_err(|_| StoreError::Corrupt(format!("negative sequence {}", self.sequence)))?;

        Ok(Turn {
            session_id,
            sequence,
            role,
            content: self.content,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Corrupt(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn unavailable(e: sqlx::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Record the session and insert one turn on an open connection.
///
/// Callers run this inside a transaction so the session row and the turn
/// land together.
async fn insert_turn(
    conn: &mut SqliteConnection,
    session_id: &SessionId,
    turn: &NewTurn,
) -> Result<Turn, StoreError> {
    let created_at = Utc::now();

    sqlx::query(RECORD_SESSION)
        .bind(session_id.as_str())
        .bind(format_datetime(&created_at))
        .execute(&mut *conn)
        .await
        .map_err(unavailable)?;

    let row = sqlx::query(INSERT_TURN)
        .bind(session_id.as_str())
        .bind(session_id.as_str())
        .bind(turn.role().to_string())
        .bind(turn.content())
        .bind(format_datetime(&created_at))
        .fetch_one(&mut *conn)
        .await
        .map_err(unavailable)?;

    let sequence: i64 = row.try_get("sequence").map_err(unavailable)?;

    Ok(Turn {
        session_id: session_id.clone(),
        sequence: sequence as u64,
        role: turn.role(),
        content: turn.content().to_string(),
        created_at,
    })
}

// ---------------------------------------------------------------------------
// ConversationStore implementation
// ---------------------------------------------------------------------------

impl ConversationStore for SqliteConversationStore {
    async fn append(&self, session_id: &SessionId, turn: &NewTurn) -> Result<Turn, StoreError> {
        let mut tx = self.pool.writer.begin().await.map_err(unavailable)?;
        let stored = insert_turn(&mut tx, session_id, turn).await?;
        tx.commit().await.map_err(unavailable)?;
        Ok(stored)
    }

    async fn load(&self, session_id: &SessionId) -> Result<Vec<Turn>, StoreError> {
        let rows = sqlx::query(
            "SELECT session_id, sequence, role, content, created_at FROM conversation_turns WHERE session_id = ? ORDER BY sequence ASC",
        )
        .bind(session_id.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(unavailable)?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = TurnRow::from_row(row).map_err(|e| StoreError::Corrupt(e.to_string()))?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }

    async fn append_exchange(
        &self,
        session_id: &SessionId,
        turns: &[NewTurn],
    ) -> Result<Vec<Turn>, StoreError> {
        // One transaction: either the whole block lands contiguously or nothing does.
        let mut tx = self.pool.writer.begin().await.map_err(unavailable)?;

        let mut stored = Vec::with_capacity(turns.len());
        for turn in turns {
            stored.push(insert_turn(&mut tx, session_id, turn).await?);
        }

        tx.commit().await.map_err(unavailable)?;
        Ok(stored)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool.reader)
            .await
            .map_err(unavailable)?;
        Ok(())
    }
}
