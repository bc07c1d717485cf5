//! `planner-users` — the team member directory.
//!
//! Users are plain `(id, name, email)` records kept in the SQLite `users`
//! table. Schedule entries reference them by integer id only; nothing here
//! cascades into the schedule.

pub mod db;
pub mod directory;
pub mod error;
pub mod types;

pub use directory::UserDirectory;
pub use error::{Result, UserError};
pub use types::{NewUser, User};
