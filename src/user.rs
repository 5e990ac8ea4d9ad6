//! Code for creating the user table and managing anonymous users.

use std::fmt::Display;

use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::Error;

/// A newtype wrapper for integer user IDs.
///
/// This helps disambiguate user IDs from other types of IDs, leading to better compile time
/// errors, and more flexible generics that can have distinct implementations for multiple ID types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
pub struct UserId(i64);

impl UserId {
    /// Create a new user ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the user ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An anonymous user of the application.
///
/// Users have no credentials, they are identified only by the ID stored in
/// their browser's cookie.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// The user's ID in the application database.
    pub id: UserId,
    /// When the user first visited the application.
    pub created_at: OffsetDateTime,
}

/// Create the user table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_user_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS user (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                created_at TEXT NOT NULL
                )",
        (),
    )?;

    Ok(())
}

/// Create and insert a new anonymous user into the database.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn create_anonymous_user(connection: &Connection) -> Result<User, Error> {
    let user = connection
        .prepare("INSERT INTO user (created_at) VALUES (?1) RETURNING id, created_at")?
        .query_row((OffsetDateTime::now_utc(),), |row| {
            Ok(User {
                id: UserId::new(row.get(0)?),
                created_at: row.get(1)?,
            })
        })?;

    Ok(user)
}

/// Get the user with `user_id`, or `None` if there is no such user.
///
/// # Errors
///
/// Returns a [Error::SqlError] if an SQL related error occurred.
pub fn get_user_by_id(user_id: UserId, connection: &Connection) -> Result<Option<User>, Error> {
    connection
        .prepare("SELECT id, created_at FROM user WHERE id = :id")?
        .query_row(&[(":id", &user_id.as_i64())], |row| {
            Ok(User {
                id: UserId::new(row.get(0)?),
                created_at: row.get(1)?,
            })
        })
        .optional()
        .map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use super::{UserId, create_anonymous_user, create_user_table, get_user_by_id};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        create_user_table(&connection).unwrap();
        connection
    }

    #[test]
    fn creates_distinct_users() {
        let connection = get_test_connection();

        let first = create_anonymous_user(&connection).unwrap();
        let second = create_anonymous_user(&connection).unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn gets_created_user() {
        let connection = get_test_connection();
        let user = create_anonymous_user(&connection).unwrap();

        let got = get_user_by_id(user.id, &connection).unwrap();

        assert_eq!(got.map(|got| got.id), Some(user.id));
    }

    #[test]
    fn missing_user_is_none() {
        let connection = get_test_connection();

        let got = get_user_by_id(UserId::new(42), &connection).unwrap();

        assert_eq!(got, None);
    }
}
