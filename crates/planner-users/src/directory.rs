use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection};
use tracing::info;

use crate::db::{row_to_user, USER_SELECT_SQL};
use crate::error::{Result, UserError};
use crate::types::User;

/// Registry of team members.
///
/// Wraps a shared SQLite connection in a `Mutex`; every call takes the lock
/// for the duration of one statement.
pub struct UserDirectory {
    db: Arc<Mutex<Connection>>,
}

impl UserDirectory {
    pub fn new(db: Arc<Mutex<Connection>>) -> Self {
        Self { db }
    }

    /// All users, ordered by name.
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} ORDER BY name"))?;
        let users = stmt
            .query_map([], row_to_user)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    /// Register a new user. Name and email are trimmed and must not be blank.
    pub fn create_user(&self, name: &str, email: &str) -> Result<User> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(UserError::InvalidInput(
                "Name and email are required".to_string(),
            ));
        }

        let conn = self.db.lock().unwrap();
        conn.execute(
            "INSERT INTO users (name, email) VALUES (?1, ?2)",
            params![name, email],
        )?;
        let user = User {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            email: email.to_string(),
        };
        info!(user_id = user.id, email = %user.email, "created user");
        Ok(user)
    }

    /// Load a user by primary key. Returns None instead of an error when absent
    /// so callers decide whether missing is exceptional in their context.
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.db.lock().unwrap();
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1"))?;
        match stmt.query_row(params![id], row_to_user) {
            Ok(u) => Ok(Some(u)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::DatabaseError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;

    fn directory() -> UserDirectory {
        let conn = Connection::open_in_memory().unwrap();
        init_db(&conn).unwrap();
        UserDirectory::new(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn create_trims_and_assigns_ids() {
        let dir = directory();
        let a = dir.create_user("  Alex Doe ", " alex@example.com").unwrap();
        let b = dir.create_user("Sam Lee", "sam@example.com").unwrap();
        assert_eq!(a.name, "Alex Doe");
        assert_eq!(a.email, "alex@example.com");
        assert!(b.id > a.id);
    }

    #[test]
    fn blank_fields_are_rejected() {
        let dir = directory();
        assert!(matches!(
            dir.create_user("   ", "x@example.com"),
            Err(UserError::InvalidInput(_))
        ));
        assert!(matches!(
            dir.create_user("Name", ""),
            Err(UserError::InvalidInput(_))
        ));
        assert!(dir.list_users().unwrap().is_empty());
    }

    #[test]
    fn list_is_ordered_by_name() {
        let dir = directory();
        dir.create_user("Zoe", "zoe@example.com").unwrap();
        dir.create_user("Alex", "alex@example.com").unwrap();
        dir.create_user("Mia", "mia@example.com").unwrap();

        let names: Vec<_> = dir.list_users().unwrap().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Alex", "Mia", "Zoe"]);
    }

    #[test]
    fn get_user_returns_none_when_absent() {
        let dir = directory();
        let created = dir.create_user("Alex", "alex@example.com").unwrap();
        assert_eq!(dir.get_user(created.id).unwrap(), Some(created));
        assert_eq!(dir.get_user(999).unwrap(), None);
    }
}
