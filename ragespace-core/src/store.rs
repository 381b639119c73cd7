//! The session store.
//!
//! Durable persistence is a single key-value table inside a WAL-mode
//! SQLite file; the entire ordered session history is one JSON array under
//! [`SESSIONS_KEY`]. The history is read once at startup and rewritten
//! after each completed session. An absent key means an empty history; a
//! blob that fails to parse is logged and also treated as empty, never as
//! a fatal error.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::types::SessionRecord;

/// The single key under which the serialized history lives.
pub const SESSIONS_KEY: &str = "sessions";

/// Opens (or creates) the store at `path`, configures WAL mode, and
/// applies schema migrations via the `schema_version` table.
///
/// This function is the single entry point for all store connections.
/// It sets `busy_timeout` via the `Connection` method (not a PRAGMA
/// string) so the setting takes effect regardless of pragma caching.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if the file cannot be opened, WAL
/// configuration fails, or schema DDL fails.
pub async fn open_store(path: &str) -> Result<Connection, tokio_rusqlite::Error> {
    let conn = Connection::open(path).await?;

    // Step 1: WAL pragmas — connection-level settings re-applied on every open.
    conn.call(|db| {
        db.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;",
        )?;
        db.busy_timeout(Duration::from_secs(5))?;
        Ok(())
    })
    .await?;

    // Step 2: Checkpoint any leftover WAL from a previous run.
    conn.call(|db| {
        db.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    })
    .await?;

    // Step 3: Apply schema migrations via the schema_version versioning system.
    conn.call(|db| {
        crate::schema::migrate(db)?;
        Ok(())
    })
    .await?;

    Ok(conn)
}

/// Returns the current Unix timestamp in seconds.
pub fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

/// Loads the full session history, oldest first.
///
/// An absent key yields an empty history. A present-but-unparsable blob
/// also yields an empty history (with a warning); corrupt data must never
/// prevent startup.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` only if the query itself fails.
pub async fn load_history(conn: &Connection) -> Result<Vec<SessionRecord>, tokio_rusqlite::Error> {
    let blob: Option<String> = conn
        .call(|db| {
            let value = db
                .query_row(
                    "SELECT value FROM kv WHERE key = ?1",
                    rusqlite::params![SESSIONS_KEY],
                    |r| r.get(0),
                )
                .optional()?;
            Ok(value)
        })
        .await?;

    let Some(blob) = blob else {
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<SessionRecord>>(&blob) {
        Ok(history) => Ok(history),
        Err(e) => {
            tracing::warn!("session history blob is unreadable, starting empty: {e}");
            Ok(Vec::new())
        }
    }
}

/// Persists the full session history, replacing the previous blob.
///
/// The caller appends the new record to its in-memory history first and
/// hands the whole list here; the write is an upsert of the single key
/// inside `BEGIN IMMEDIATE`.
///
/// # Errors
///
/// Returns `tokio_rusqlite::Error` if serialization or the write
/// transaction fails.
pub async fn save_history(
    conn: &Connection,
    history: &[SessionRecord],
) -> Result<(), tokio_rusqlite::Error> {
    let blob = serde_json::to_string(history)
        .map_err(|e| {
            tokio_rusqlite::Error::Error(rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
        })?;

    conn.call(move |db| {
        let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![SESSIONS_KEY, &blob],
        )?;
        tx.commit()?;
        Ok(())
    })
    .await
}
