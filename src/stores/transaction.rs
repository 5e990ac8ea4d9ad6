//! Defines the transaction store trait and live subscriptions.

use std::{fmt::Debug, sync::Arc};

use futures_util::{Stream, stream};
use tokio::sync::watch;

use crate::{
    Error,
    transaction::{Transaction, TransactionDraft, TransactionId},
    user::UserId,
};

/// The complete list of a user's transactions at one point in time.
///
/// Snapshots are immutable and cheap to clone.
pub type Snapshot = Arc<[Transaction]>;

/// Handles the creation, deletion and live retrieval of a user's transactions.
pub trait TransactionStore: Send + Sync + Debug {
    /// Get the current list of transactions for `user_id`.
    fn snapshot(&self, user_id: UserId) -> Result<Snapshot, Error>;

    /// Subscribe to the transactions of `user_id`.
    ///
    /// The subscription starts with the current list and receives the full
    /// list again after every create or delete for that user. Dropping the
    /// subscription unsubscribes.
    fn subscribe(&self, user_id: UserId) -> Result<Subscription, Error>;

    /// Store a new transaction for `user_id` and return its ID.
    fn create(&self, user_id: UserId, draft: TransactionDraft) -> Result<TransactionId, Error>;

    /// Delete the transaction `id` of `user_id`.
    ///
    /// Deleting a transaction that does not exist succeeds without changes.
    fn delete(&self, user_id: UserId, id: TransactionId) -> Result<(), Error>;
}

/// A live feed of [Snapshot]s for one user.
///
/// Only the newest snapshot is kept, so a slow reader skips straight to the
/// latest list.
#[derive(Debug)]
pub struct Subscription {
    receiver: watch::Receiver<Snapshot>,
}

impl Subscription {
    /// Wrap the receiving end of a snapshot channel.
    pub fn new(receiver: watch::Receiver<Snapshot>) -> Self {
        Self { receiver }
    }

    /// The newest snapshot, which is then marked as seen.
    pub fn current(&mut self) -> Snapshot {
        self.receiver.borrow_and_update().clone()
    }

    /// Wait for a snapshot newer than the last one seen.
    ///
    /// Returns `None` once the store has closed the channel.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.receiver.changed().await.ok()?;

        Some(self.current())
    }

    /// Turn the subscription into a stream that yields the current snapshot
    /// followed by every newer one.
    pub fn into_stream(self) -> impl Stream<Item = Snapshot> + Send + 'static {
        stream::unfold((self, true), |(mut subscription, is_first)| async move {
            let snapshot = if is_first {
                Some(subscription.current())
            } else {
                subscription.next().await
            };

            snapshot.map(|snapshot| (snapshot, (subscription, false)))
        })
    }
}
