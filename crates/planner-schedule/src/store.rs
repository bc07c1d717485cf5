use std::sync::{Arc, Mutex};

use chrono::{Datelike, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, ScheduleError};
use crate::types::{ScheduleEntry, ScheduleStatus};

/// Persistence contract the engine is written against.
///
/// Each call is its own unit of work. Nothing here is atomic across calls;
/// the engine owns the read-then-write sequence.
pub trait EntryStore: Send + Sync {
    /// At most one match, by the (user_id, day) uniqueness constraint.
    fn find_by_user_and_day(&self, user_id: i64, day: NaiveDate)
        -> Result<Option<ScheduleEntry>>;

    /// Every entry with `start <= day <= end`, across all users.
    fn find_by_day_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleEntry>>;

    /// Fails with `ConstraintViolation` if a row for (user_id, day) exists.
    fn insert(&self, user_id: i64, day: NaiveDate, status: ScheduleStatus)
        -> Result<ScheduleEntry>;

    /// Overwrites the status of `entry.id`. Fails with `NotFound` if it is gone.
    fn update(&self, entry: &ScheduleEntry) -> Result<()>;

    /// Removes `entry.id`. Fails with `NotFound` if it is already gone.
    fn delete(&self, entry: &ScheduleEntry) -> Result<()>;
}

const ENTRY_SELECT_SQL: &str = "SELECT id, user_id, day, status FROM schedule_entries";

/// SQLite-backed [`EntryStore`] over the `schedule_entries` table.
pub struct SqliteEntryStore {
    db: Arc<Mutex<Connection>>,
}

impl SqliteEntryStore {
    /// Wrap an already-open (and `init_db`-initialised) connection.
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }
}

/// Days are stored as `num_days_from_ce`: integer order is calendar order for
/// every year chrono can represent, including years past 9999 and before 1.
fn day_to_sql(day: NaiveDate) -> i32 {
    day.num_days_from_ce()
}

fn day_from_sql(idx: usize, days: i32) -> rusqlite::Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("day number out of range: {days}").into(),
        )
    })
}

fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScheduleEntry> {
    let status_str: String = row.get(3)?;
    let status = status_str.parse::<ScheduleStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
    })?;
    Ok(ScheduleEntry {
        id: row.get(0)?,
        user_id: row.get(1)?,
        day: day_from_sql(2, row.get(2)?)?,
        status,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

impl EntryStore for SqliteEntryStore {
    fn find_by_user_and_day(
        &self,
        user_id: i64,
        day: NaiveDate,
    ) -> Result<Option<ScheduleEntry>> {
        let conn = self.db.lock().unwrap();
        let entry = conn
            .query_row(
                &format!("{ENTRY_SELECT_SQL} WHERE user_id = ?1 AND day = ?2"),
                params![user_id, day_to_sql(day)],
                row_to_entry,
            )
            .optional()?;
        Ok(entry)
    }

    fn find_by_day_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn.prepare_cached(&format!(
            "{ENTRY_SELECT_SQL} WHERE day >= ?1 AND day <= ?2 ORDER BY day, user_id"
        ))?;
        let entries = stmt
            .query_map(params![day_to_sql(start), day_to_sql(end)], row_to_entry)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn insert(
        &self,
        user_id: i64,
        day: NaiveDate,
        status: ScheduleStatus,
    ) -> Result<ScheduleEntry> {
        let conn = self.db.lock().unwrap();
        match conn.execute(
            "INSERT INTO schedule_entries (user_id, day, status) VALUES (?1, ?2, ?3)",
            params![user_id, day_to_sql(day), status.to_string()],
        ) {
            Ok(_) => Ok(ScheduleEntry {
                id: conn.last_insert_rowid(),
                user_id,
                day,
                status,
            }),
            Err(e) if is_unique_violation(&e) => {
                Err(ScheduleError::ConstraintViolation { user_id, day })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, entry: &ScheduleEntry) -> Result<()> {
        let conn = self.db.lock().unwrap();
        let n = conn.execute(
            "UPDATE schedule_entries SET status = ?1 WHERE id = ?2",
            params![entry.status.to_string(), entry.id],
        )?;
        if n == 0 {
            return Err(ScheduleError::NotFound { id: entry.id });
        }
        Ok(())
    }

    fn delete(&self, entry: &ScheduleEntry) -> Result<()> {
        let conn = self.db.lock().unwrap();
        let n = conn.execute("DELETE FROM schedule_entries WHERE id = ?1", [entry.id])?;
        if n == 0 {
            return Err(ScheduleError::NotFound { id: entry.id });
        }
        Ok(())
    }
}
