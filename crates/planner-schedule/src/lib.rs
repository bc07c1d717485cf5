//! `planner-schedule` — per-user, per-day work-location schedule.
//!
//! # Overview
//!
//! A team member's status for a day is one of three values. Only the
//! exceptions are stored: a missing row *is* the office default.
//!
//! | Status          | Wire value | Stored?                        |
//! |-----------------|------------|--------------------------------|
//! | `Office`        | `office`   | never; assigning it clears the row |
//! | `SmartWorking`  | `smart`    | one row per (user, day)        |
//! | `Away`          | `away`     | one row per (user, day)        |
//!
//! [`store::SqliteEntryStore`] persists rows in `schedule_entries` with a
//! `UNIQUE(user_id, day)` constraint. [`engine::ScheduleEngine`] applies the
//! create / update / clear rule on top of any [`store::EntryStore`] and
//! answers inclusive day-range reads.

pub mod db;
pub mod engine;
pub mod error;
pub mod store;
pub mod types;

pub use engine::ScheduleEngine;
pub use error::{Result, ScheduleError};
pub use store::{EntryStore, SqliteEntryStore};
pub use types::{validate_range, ScheduleEntry, ScheduleStatus};
