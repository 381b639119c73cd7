//! Integration test for the session-store lifecycle.
//!
//! Exercises: open_store, migrate, load_history on a fresh store,
//! save/load round trips, corruption tolerance, and persistence across
//! connections.

use ragespace_core::catalog::{EmotionRating, StressorType};
use ragespace_core::store;
use ragespace_core::types::SessionRecord;

fn temp_db_path() -> String {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.keep().join("sessions.db");
    path.to_string_lossy().to_string()
}

fn record(stressor: StressorType, before: u8, after: u8, hits: u32, at: i64) -> SessionRecord {
    SessionRecord {
        id: uuid::Uuid::new_v4().to_string(),
        stressor,
        emotion_before: EmotionRating::new(before).unwrap(),
        emotion_after: EmotionRating::new(after).unwrap(),
        hit_count: hits,
        intensity_reached: 60,
        recorded_at: at,
    }
}

#[tokio::test]
async fn full_store_lifecycle() {
    let path = temp_db_path();
    let conn = store::open_store(&path).await.unwrap();

    // Verify schema_version = 1
    let version: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(db.query_row(
                "SELECT MAX(version) FROM schema_version",
                [],
                |r| r.get(0),
            )?)
        })
        .await
        .unwrap();
    assert_eq!(version, 1, "schema_version should be 1");

    // Verify WAL mode
    let journal: String = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("PRAGMA journal_mode", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(journal, "wal", "journal_mode should be wal");

    // A fresh store has no history and that is not an error.
    let history = store::load_history(&conn).await.unwrap();
    assert!(history.is_empty(), "fresh store should be empty");

    // Save a two-record history and read it back in order.
    let records = vec![
        record(StressorType::Academic, 2, 4, 30, 1_700_000_000),
        record(StressorType::Social, 3, 3, 12, 1_700_000_100),
    ];
    store::save_history(&conn, &records).await.unwrap();

    let loaded = store::load_history(&conn).await.unwrap();
    assert_eq!(loaded, records, "round trip should preserve records and order");

    // Appending rewrites the single key; order stays chronological.
    let mut grown = records.clone();
    grown.push(record(StressorType::Academic, 1, 5, 44, 1_700_000_200));
    store::save_history(&conn, &grown).await.unwrap();

    let loaded = store::load_history(&conn).await.unwrap();
    assert_eq!(loaded.len(), 3);
    assert_eq!(loaded, grown);

    // Only the one kv row exists no matter how often we save.
    let rows: i64 = conn
        .call(|db| {
            Ok::<_, rusqlite::Error>(
                db.query_row("SELECT COUNT(*) FROM kv", [], |r| r.get(0))?,
            )
        })
        .await
        .unwrap();
    assert_eq!(rows, 1, "history lives under a single key");

    // Verify persistence: open a second connection to the same file.
    let conn2 = store::open_store(&path).await.unwrap();
    let loaded2 = store::load_history(&conn2).await.unwrap();
    assert_eq!(loaded2, grown, "history should persist across connections");
}

#[tokio::test]
async fn malformed_blob_reads_as_empty_history() {
    let path = temp_db_path();
    let conn = store::open_store(&path).await.unwrap();

    // Sabotage the blob directly.
    conn.call(|db| {
        db.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            rusqlite::params![store::SESSIONS_KEY, "{not json"],
        )?;
        Ok::<_, rusqlite::Error>(())
    })
    .await
    .unwrap();

    // Corrupt data degrades to an empty history, never an error.
    let history = store::load_history(&conn).await.unwrap();
    assert!(history.is_empty());

    // The store is still writable afterwards.
    let records = vec![record(StressorType::Future, 2, 5, 9, 1_700_000_000)];
    store::save_history(&conn, &records).await.unwrap();
    let loaded = store::load_history(&conn).await.unwrap();
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn open_is_idempotent_on_existing_store() {
    let path = temp_db_path();

    {
        let conn = store::open_store(&path).await.unwrap();
        let records = vec![record(StressorType::General, 1, 4, 20, 1_700_000_000)];
        store::save_history(&conn, &records).await.unwrap();
    }

    // Re-running open (pragmas + checkpoint + migrate) must not disturb data.
    let conn = store::open_store(&path).await.unwrap();
    drop(conn);
    let conn = store::open_store(&path).await.unwrap();
    let loaded = store::load_history(&conn).await.unwrap();
    assert_eq!(loaded.len(), 1);
}
