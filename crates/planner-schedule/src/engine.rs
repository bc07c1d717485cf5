use std::sync::Mutex;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, ScheduleError};
use crate::store::{EntryStore, SqliteEntryStore};
use crate::types::{ScheduleEntry, ScheduleStatus};

/// Applies status assignments to the entry store and answers range reads.
///
/// Holds no schedule state of its own: every call re-reads the current row.
/// Writes inside this process are serialised by `write_lock`, so two
/// concurrent assignments for the same cell cannot both observe "no entry".
/// A writer in another process can still win the insert; that case is
/// recovered by re-reading and updating.
pub struct ScheduleEngine<S: EntryStore = SqliteEntryStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: EntryStore> ScheduleEngine<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Assign `status` to `user_id` on `day`.
    ///
    /// - `Office` clears any stored entry and returns `None`, whether or not
    ///   one existed.
    /// - Any other status updates the existing entry in place, or creates
    ///   one, and returns it.
    #[instrument(skip(self))]
    pub fn upsert(
        &self,
        user_id: i64,
        day: NaiveDate,
        status: ScheduleStatus,
    ) -> Result<Option<ScheduleEntry>> {
        let _guard = self.write_lock.lock().unwrap();
        let existing = self.store.find_by_user_and_day(user_id, day)?;

        if status == ScheduleStatus::Office {
            if let Some(entry) = existing {
                self.clear(&entry)?;
            }
            return Ok(None);
        }

        let entry = match existing {
            Some(entry) => self.update_existing(entry, status)?,
            None => self.create(user_id, day, status)?,
        };
        Ok(Some(entry))
    }

    /// Every stored entry with `start <= day <= end`, across all users.
    ///
    /// An inverted range yields an empty list; callers that want to reject
    /// it use [`crate::types::validate_range`] first.
    #[instrument(skip(self))]
    pub fn range_query(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<ScheduleEntry>> {
        if start > end {
            return Ok(Vec::new());
        }
        self.store.find_by_day_range(start, end)
    }

    // --- private helpers ---------------------------------------------------

    fn clear(&self, entry: &ScheduleEntry) -> Result<()> {
        match self.store.delete(entry) {
            Ok(()) => {
                info!(user_id = entry.user_id, day = %entry.day, "cleared schedule");
                Ok(())
            }
            // Someone else cleared it first; the outcome is the same.
            Err(ScheduleError::NotFound { id }) => {
                debug!(entry_id = id, "schedule entry already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn update_existing(
        &self,
        mut entry: ScheduleEntry,
        status: ScheduleStatus,
    ) -> Result<ScheduleEntry> {
        entry.status = status;
        match self.store.update(&entry) {
            Ok(()) => {
                info!(user_id = entry.user_id, day = %entry.day, %status, "updated schedule");
                Ok(entry)
            }
            Err(ScheduleError::NotFound { id }) => {
                warn!(entry_id = id, "schedule entry vanished before update; recreating");
                let created = self.store.insert(entry.user_id, entry.day, status)?;
                info!(user_id = created.user_id, day = %created.day, %status, "created schedule");
                Ok(created)
            }
            Err(e) => Err(e),
        }
    }

    fn create(&self, user_id: i64, day: NaiveDate, status: ScheduleStatus) -> Result<ScheduleEntry> {
        match self.store.insert(user_id, day, status) {
            Ok(entry) => {
                info!(user_id, %day, %status, "created schedule");
                Ok(entry)
            }
            Err(ScheduleError::ConstraintViolation { .. }) => {
                warn!(user_id, %day, "concurrent insert detected; updating the winning row");
                let mut entry = self
                    .store
                    .find_by_user_and_day(user_id, day)?
                    .ok_or(ScheduleError::ConstraintViolation { user_id, day })?;
                entry.status = status;
                match self.store.update(&entry) {
                    Ok(()) => {
                        info!(user_id, %day, %status, "updated schedule");
                        Ok(entry)
                    }
                    // The winning row was cleared in turn; one more insert, and
                    // a further collision surfaces as ConstraintViolation.
                    Err(ScheduleError::NotFound { id }) => {
                        warn!(entry_id = id, "winning entry vanished before update; recreating");
                        let created = self.store.insert(user_id, day, status)?;
                        info!(user_id, %day, %status, "created schedule");
                        Ok(created)
                    }
                    Err(e) => Err(e),
                }
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    use rusqlite::Connection;

    use super::*;
    use crate::db::init_db;

    fn sqlite_store() -> SqliteEntryStore {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        SqliteEntryStore::new(Arc::new(Mutex::new(conn)))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    /// Simulates a second writer acting between the engine's read and write.
    struct RacingStore {
        inner: SqliteEntryStore,
        /// Remove the row right before the engine's delete/update lands.
        steal_row: AtomicBool,
        /// Insert a competing row right before the engine's next insert lands.
        win_insert: Mutex<Option<ScheduleStatus>>,
    }

    impl RacingStore {
        fn new() -> Self {
            Self {
                inner: sqlite_store(),
                steal_row: AtomicBool::new(false),
                win_insert: Mutex::new(None),
            }
        }
    }

    impl EntryStore for RacingStore {
        fn find_by_user_and_day(
            &self,
            user_id: i64,
            day: NaiveDate,
        ) -> Result<Option<ScheduleEntry>> {
            self.inner.find_by_user_and_day(user_id, day)
        }

        fn find_by_day_range(
            &self,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<ScheduleEntry>> {
            self.inner.find_by_day_range(start, end)
        }

        fn insert(
            &self,
            user_id: i64,
            day: NaiveDate,
            status: ScheduleStatus,
        ) -> Result<ScheduleEntry> {
            let competing = self.win_insert.lock().unwrap().take();
            if let Some(other) = competing {
                if self.inner.find_by_user_and_day(user_id, day)?.is_none() {
                    self.inner.insert(user_id, day, other)?;
                }
            }
            self.inner.insert(user_id, day, status)
        }

        fn update(&self, entry: &ScheduleEntry) -> Result<()> {
            if self.steal_row.swap(false, Ordering::SeqCst) {
                self.inner.delete(entry)?;
            }
            self.inner.update(entry)
        }

        fn delete(&self, entry: &ScheduleEntry) -> Result<()> {
            if self.steal_row.swap(false, Ordering::SeqCst) {
                self.inner.delete(entry)?;
            }
            self.inner.delete(entry)
        }
    }

    #[test]
    fn office_on_empty_cell_is_a_no_op() {
        let engine = ScheduleEngine::new(sqlite_store());
        assert_eq!(engine.upsert(1, day(20), ScheduleStatus::Office).unwrap(), None);
        assert!(engine.range_query(day(1), day(31)).unwrap().is_empty());
    }

    #[test]
    fn lifecycle_create_update_clear() {
        let engine = ScheduleEngine::new(sqlite_store());

        let created = engine
            .upsert(1, day(20), ScheduleStatus::SmartWorking)
            .unwrap()
            .unwrap();
        assert_eq!(created.status, ScheduleStatus::SmartWorking);

        let updated = engine.upsert(1, day(20), ScheduleStatus::Away).unwrap().unwrap();
        assert_eq!(updated.id, created.id, "update must be in place");
        assert_eq!(updated.status, ScheduleStatus::Away);

        assert_eq!(engine.upsert(1, day(20), ScheduleStatus::Office).unwrap(), None);
        assert!(engine.range_query(day(20), day(20)).unwrap().is_empty());
    }

    #[test]
    fn repeated_identical_assignment_keeps_one_entry() {
        let engine = ScheduleEngine::new(sqlite_store());
        let first = engine.upsert(3, day(6), ScheduleStatus::Away).unwrap();
        let second = engine.upsert(3, day(6), ScheduleStatus::Away).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.range_query(day(6), day(6)).unwrap().len(), 1);
    }

    #[test]
    fn inverted_range_is_empty() {
        let engine = ScheduleEngine::new(sqlite_store());
        engine.upsert(1, day(20), ScheduleStatus::Away).unwrap();
        assert!(engine.range_query(day(21), day(19)).unwrap().is_empty());
    }

    #[test]
    fn clear_tolerates_row_deleted_underneath() {
        let store = RacingStore::new();
        store.inner.insert(5, day(10), ScheduleStatus::Away).unwrap();
        store.steal_row.store(true, Ordering::SeqCst);

        let engine = ScheduleEngine::new(store);
        assert_eq!(engine.upsert(5, day(10), ScheduleStatus::Office).unwrap(), None);
        assert!(engine.range_query(day(10), day(10)).unwrap().is_empty());
    }

    #[test]
    fn update_recreates_row_deleted_underneath() {
        let store = RacingStore::new();
        store.inner.insert(5, day(10), ScheduleStatus::Away).unwrap();
        store.steal_row.store(true, Ordering::SeqCst);

        let engine = ScheduleEngine::new(store);
        let entry = engine
            .upsert(5, day(10), ScheduleStatus::SmartWorking)
            .unwrap()
            .unwrap();
        assert_eq!(entry.status, ScheduleStatus::SmartWorking);
        assert_eq!(engine.range_query(day(10), day(10)).unwrap(), vec![entry]);
    }

    #[test]
    fn lost_insert_race_updates_the_winner() {
        let store = RacingStore::new();
        *store.win_insert.lock().unwrap() = Some(ScheduleStatus::Away);

        let engine = ScheduleEngine::new(store);
        let entry = engine
            .upsert(9, day(15), ScheduleStatus::SmartWorking)
            .unwrap()
            .unwrap();
        assert_eq!(entry.status, ScheduleStatus::SmartWorking);

        let stored = engine.range_query(day(15), day(15)).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].status, ScheduleStatus::SmartWorking);
    }

    #[test]
    fn winner_cleared_before_update_is_recreated() {
        let store = RacingStore::new();
        *store.win_insert.lock().unwrap() = Some(ScheduleStatus::Away);
        store.steal_row.store(true, Ordering::SeqCst);

        let engine = ScheduleEngine::new(store);
        let entry = engine
            .upsert(9, day(16), ScheduleStatus::SmartWorking)
            .unwrap()
            .unwrap();
        assert_eq!(entry.status, ScheduleStatus::SmartWorking);

        let stored = engine.range_query(day(16), day(16)).unwrap();
        assert_eq!(stored, vec![entry]);
    }
}
