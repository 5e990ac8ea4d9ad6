//! Defines the core data models and database queries for transactions.

use std::{fmt::Display, str::FromStr};

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, category::Category, user::UserId};

// ============================================================================
// MODELS
// ============================================================================

/// A newtype wrapper for integer transaction IDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransactionId(i64);

impl TransactionId {
    /// Create a new transaction ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Cast the transaction ID to a 64 bit integer.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The label stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        if label.eq_ignore_ascii_case("income") {
            Ok(TransactionType::Income)
        } else if label.eq_ignore_ascii_case("expense") {
            Ok(TransactionType::Expense)
        } else {
            Err(())
        }
    }
}

/// A validated transaction submitted by a user that has not been stored yet.
///
/// The store assigns the ID and creation time, see [Transaction].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    description: String,
    amount: f64,
    category: Category,
    transaction_type: TransactionType,
}

impl TransactionDraft {
    /// Create a new transaction draft.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::EmptyDescription] if `description` is empty or only whitespace,
    /// - or [Error::InvalidAmount] if `amount` is not a finite number greater than zero.
    pub fn new(
        description: &str,
        amount: f64,
        category: Category,
        transaction_type: TransactionType,
    ) -> Result<Self, Error> {
        let description = description.trim();

        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        if !amount.is_finite() || amount <= 0.0 {
            return Err(Error::InvalidAmount(amount));
        }

        Ok(Self {
            description: description.to_owned(),
            amount,
            category,
            transaction_type,
        })
    }

    /// The trimmed, non-empty description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The positive amount of money.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// The category the transaction is filed under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Whether the transaction is income or an expense.
    pub fn transaction_type(&self) -> TransactionType {
        self.transaction_type
    }
}

/// An expense or income as it is held by the store.
///
/// Stored records are not trusted to be well formed, so the category and
/// type are kept as the stored text and the amount may be missing. Use
/// [Transaction::kind] to interpret the type.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned, as an unsigned magnitude.
    pub amount: Option<f64>,
    /// The category label, e.g. "Food".
    pub category: String,
    /// The type label, "Income" or "Expense".
    pub transaction_type: String,
    /// When the store recorded the transaction.
    pub created_at: OffsetDateTime,
}

impl Transaction {
    /// The type of the transaction, or `None` if the stored label is not recognised.
    pub fn kind(&self) -> Option<TransactionType> {
        self.transaction_type.parse().ok()
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a new transaction for `user_id` into the database.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error,
/// for example when `user_id` does not refer to an existing user.
pub fn insert_transaction(
    user_id: UserId,
    draft: &TransactionDraft,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, description, amount, category, type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING id, description, amount, category, type, created_at",
        )?
        .query_row(
            (
                user_id.as_i64(),
                draft.description(),
                draft.amount(),
                draft.category().as_str(),
                draft.transaction_type().as_str(),
                OffsetDateTime::now_utc(),
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// The number of rows removed by a delete query.
pub type RowsAffected = usize;

/// Delete the transaction `id` if it belongs to `user_id`.
///
/// Returns zero if there was no such transaction for the user.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn delete_transaction(
    user_id: UserId,
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "DELETE FROM \"transaction\" WHERE id = :id AND user_id = :user_id",
            &[(":id", &id.as_i64()), (":user_id", &user_id.as_i64())],
        )
        .map_err(|error| error.into())
}

/// Get all of the transactions for `user_id`, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is an SQL error.
pub fn get_transactions_for_user(
    user_id: UserId,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, description, amount, category, type, created_at
             FROM \"transaction\"
             WHERE user_id = :user_id
             ORDER BY created_at DESC, id DESC",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Create the transaction table in the database.
///
/// The user table must exist before calling this function.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                amount REAL,
                category TEXT NOT NULL,
                type TEXT NOT NULL,
                created_at TEXT NOT NULL,
                FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                )",
        (),
    )?;

    // Snapshots are read per user, newest first.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_user_created_at
         ON \"transaction\"(user_id, created_at);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = TransactionId::new(row.get(0)?);
    let description = row.get(1)?;
    let amount = row.get(2)?;
    let category = row.get(3)?;
    let transaction_type = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Transaction {
        id,
        description,
        amount,
        category,
        transaction_type,
        created_at,
    })
}

// ============================================================================
// TESTS
// ============================================================================
