//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    auth::DEFAULT_COOKIE_DURATION,
    db::initialize,
    stores::{SQLiteTransactionStore, TransactionStore},
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which the user ID cookie is valid.
    pub cookie_duration: Duration,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store for transactions and their live snapshots.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, cookie_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let transaction_store = SQLiteTransactionStore::new(connection.clone());

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: connection,
            transaction_store: Arc::new(transaction_store),
        })
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{AppState, app_state::create_cookie_key, user::create_anonymous_user};

    #[test]
    fn new_initializes_database() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "foobar").unwrap();

        let connection = state.db_connection.lock().unwrap();
        assert!(create_anonymous_user(&connection).is_ok());
    }

    #[test]
    fn same_secret_gives_same_key() {
        assert_eq!(
            create_cookie_key("foobar").master(),
            create_cookie_key("foobar").master()
        );
        assert_ne!(
            create_cookie_key("foobar").master(),
            create_cookie_key("barfoo").master()
        );
    }
}
