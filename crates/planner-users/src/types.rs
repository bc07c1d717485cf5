use serde::{Deserialize, Serialize};

/// A team member as stored in SQLite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// AUTOINCREMENT rowid; schedule entries point at this.
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Registration payload. Both fields are trimmed before they are stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
