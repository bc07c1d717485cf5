use rusqlite::Connection;

use crate::error::Result;

/// Initialise the schedule schema in `conn`.
///
/// `UNIQUE(user_id, day)` is what keeps at most one status per user per
/// day. `user_id` carries no foreign key.
pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schedule_entries (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id  INTEGER NOT NULL,
            day      INTEGER NOT NULL,   -- num_days_from_ce (0001-01-01 = 1)
            status   TEXT    NOT NULL,   -- 'smart' | 'away'
            CONSTRAINT uq_schedule_user_day UNIQUE (user_id, day)
        );

        CREATE INDEX IF NOT EXISTS idx_schedule_user_id ON schedule_entries (user_id);
        -- Range reads: WHERE day >= ? AND day <= ?
        CREATE INDEX IF NOT EXISTS idx_schedule_day ON schedule_entries (day);
        ",
    )?;
    Ok(())
}
