//! SQLite bootstrap: open the database file and run every subsystem's
//! idempotent migrations, retrying while the storage is not ready yet.

use std::time::Duration;

use planner_core::{PlannerError, Result};
use rusqlite::Connection;
use tracing::{info, warn};

/// Open `path` with the pragmas every subsystem connection expects.
pub fn connect(path: &str) -> Result<Connection> {
    ensure_parent_dir(path)?;
    let conn = Connection::open(path).map_err(db_err)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
        .map_err(db_err)?;
    Ok(conn)
}

/// Create all tables (CREATE IF NOT EXISTS, safe on every startup).
pub fn migrate(conn: &Connection) -> Result<()> {
    planner_users::db::init_db(conn).map_err(db_err)?;
    planner_schedule::db::init_db(conn).map_err(|e| PlannerError::Database(e.to_string()))?;
    Ok(())
}

/// Connect and migrate, retrying up to `attempts` times with `delay` between
/// tries. The error of the last attempt is returned.
pub async fn init_with_retry(path: &str, attempts: u32, delay: Duration) -> Result<()> {
    let attempts = attempts.max(1);
    let mut attempt = 1;
    loop {
        match connect(path).and_then(|conn| migrate(&conn)) {
            Ok(()) => {
                info!(path, "database initialized");
                return Ok(());
            }
            Err(e) if attempt < attempts => {
                warn!(
                    attempt,
                    max_attempts = attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "database not ready; retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

fn ensure_parent_dir(path: &str) -> Result<()> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn db_err(e: rusqlite::Error) -> PlannerError {
    PlannerError::Database(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_directories_and_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/data/teamplanner.db");
        let path = path.to_str().unwrap();

        init_with_retry(path, 1, Duration::from_millis(1)).await.unwrap();

        let conn = connect(path).unwrap();
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'table' AND name IN ('users', 'schedule_entries')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("teamplanner.db");
        let path = path.to_str().unwrap();

        init_with_retry(path, 1, Duration::from_millis(1)).await.unwrap();
        init_with_retry(path, 1, Duration::from_millis(1)).await.unwrap();
    }

    #[tokio::test]
    async fn gives_up_after_last_attempt() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("teamplanner.db");

        let err = init_with_retry(path.to_str().unwrap(), 3, Duration::from_millis(1))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Io(_)));
    }
}
