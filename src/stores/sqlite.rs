//! Implements a SQLite backed transaction store.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use rusqlite::Connection;
use tokio::sync::watch;

use crate::{
    Error,
    stores::{Snapshot, Subscription, TransactionStore},
    transaction::{
        TransactionDraft, TransactionId, delete_transaction, get_transactions_for_user,
        insert_transaction,
    },
    user::UserId,
};

/// Stores transactions in a SQLite database and publishes a new snapshot to
/// subscribers after every change.
///
/// The user and transaction tables must be set up in the database, see
/// [crate::initialize_db].
#[derive(Debug)]
pub struct SQLiteTransactionStore {
    connection: Arc<Mutex<Connection>>,
    channels: Mutex<HashMap<UserId, watch::Sender<Snapshot>>>,
}

impl SQLiteTransactionStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self {
            connection,
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn lock_connection(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    fn lock_channels(
        &self,
    ) -> Result<MutexGuard<'_, HashMap<UserId, watch::Sender<Snapshot>>>, Error> {
        self.channels
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire channel lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }

    /// Send the current list of `user_id`'s transactions to their subscribers.
    ///
    /// Must be called while holding the connection lock so that snapshots are
    /// published in the same order as the writes.
    fn publish(&self, user_id: UserId, connection: &Connection) -> Result<(), Error> {
        let mut channels = self.lock_channels()?;
        channels.retain(|_, sender| sender.receiver_count() > 0);

        let Some(sender) = channels.get(&user_id) else {
            return Ok(());
        };

        let snapshot = read_snapshot(user_id, connection)?;
        tracing::debug!(
            "publishing snapshot of {} transactions to {} subscriber(s) of user {user_id}",
            snapshot.len(),
            sender.receiver_count()
        );
        sender.send_replace(snapshot);

        Ok(())
    }

    /// Publish the change to `user_id`'s transactions after a committed write.
    ///
    /// The write has already succeeded, so a failure here is logged and not
    /// reported to the caller.
    fn publish_after_write(&self, user_id: UserId, connection: &Connection) {
        if let Err(error) = self.publish(user_id, connection) {
            tracing::error!("could not publish transactions of user {user_id}: {error}");
        }
    }
}

impl TransactionStore for SQLiteTransactionStore {
    fn snapshot(&self, user_id: UserId) -> Result<Snapshot, Error> {
        let connection = self.lock_connection()?;

        read_snapshot(user_id, &connection)
    }

    fn subscribe(&self, user_id: UserId) -> Result<Subscription, Error> {
        // Holding the connection lock means no write can slip in between
        // reading the snapshot and registering the receiver.
        let connection = self.lock_connection()?;
        let mut channels = self.lock_channels()?;

        let receiver = match channels.get(&user_id) {
            Some(sender) => sender.subscribe(),
            None => {
                let snapshot = read_snapshot(user_id, &connection)?;
                let (sender, receiver) = watch::channel(snapshot);
                channels.insert(user_id, sender);
                receiver
            }
        };

        Ok(Subscription::new(receiver))
    }

    fn create(&self, user_id: UserId, draft: TransactionDraft) -> Result<TransactionId, Error> {
        let connection = self.lock_connection()?;

        let transaction = insert_transaction(user_id, &draft, &connection)
            .inspect_err(|error| tracing::error!("could not create transaction: {error}"))?;
        self.publish_after_write(user_id, &connection);

        Ok(transaction.id)
    }

    fn delete(&self, user_id: UserId, id: TransactionId) -> Result<(), Error> {
        let connection = self.lock_connection()?;

        if delete_transaction(user_id, id, &connection)? == 0 {
            tracing::debug!("transaction {id} of user {user_id} was already deleted");
        } else {
            self.publish_after_write(user_id, &connection);
        }

        Ok(())
    }
}

fn read_snapshot(user_id: UserId, connection: &Connection) -> Result<Snapshot, Error> {
    get_transactions_for_user(user_id, connection).map(Snapshot::from)
}
