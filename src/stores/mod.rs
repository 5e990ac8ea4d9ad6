//! Storage for transactions with live snapshots.
//!
//! The rest of the application only talks to the [TransactionStore] trait,
//! which is injected through [crate::AppState].

mod sqlite;
mod transaction;

pub use sqlite::SQLiteTransactionStore;
pub use transaction::{Snapshot, Subscription, TransactionStore};
