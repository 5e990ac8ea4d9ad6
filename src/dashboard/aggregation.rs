//! Derives the summary totals and the expense breakdown from a snapshot of
//! transactions.
//!
//! Amounts are accumulated as [Decimal]s so that sums of cents do not drift
//! the way repeated `f64` addition does.

use std::collections::BTreeMap;

use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};

use crate::transaction::{Transaction, TransactionId, TransactionType};

/// The label used for expenses stored without a category.
pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";

/// The figures shown on the dashboard.
///
/// The default value is the result for an empty list of transactions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregateResult {
    /// Sum of the amounts of all income.
    pub total_income: Decimal,
    /// Sum of the amounts of all expenses.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`, may be negative.
    pub balance: Decimal,
    /// Summed expense amounts keyed by category label.
    ///
    /// Only categories with at least one expense have an entry.
    pub expense_by_category: BTreeMap<String, Decimal>,
    /// Transactions left out of the figures because they could not be read.
    pub skipped: Vec<MalformedRecord>,
}

impl AggregateResult {
    /// The expense breakdown as `(category, amount)` pairs for charting.
    pub fn expense_chart_data(&self) -> Vec<(String, f64)> {
        self.expense_by_category
            .iter()
            .map(|(category, amount)| (category.clone(), amount.to_f64().unwrap_or_default()))
            .collect()
    }
}

/// A stored transaction that was left out of an [AggregateResult].
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedRecord {
    /// The ID of the transaction that was skipped.
    pub id: TransactionId,
    /// What was wrong with it.
    pub reason: MalformedReason,
}

/// Why a transaction could not be included in the totals.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MalformedReason {
    /// The transaction has no amount.
    #[error("the amount is missing")]
    MissingAmount,

    /// The amount is infinite or NaN.
    #[error("the amount {0} is not a finite number")]
    NonFiniteAmount(f64),

    /// The amount is too large to be added to the totals.
    #[error("the amount {0} is too large to add to the totals")]
    AmountOutOfRange(f64),

    /// The type is neither income nor expense.
    #[error("\"{0}\" is not a recognised transaction type")]
    UnrecognizedType(String),
}

/// Calculate the totals, balance and expense breakdown for `transactions`.
///
/// The order of `transactions` does not affect the result. Transactions
/// that cannot be read are skipped, logged and listed in
/// [AggregateResult::skipped] instead of failing the whole calculation.
pub fn aggregate(transactions: &[Transaction]) -> AggregateResult {
    let mut result = AggregateResult::default();

    for transaction in transactions {
        if let Err(reason) = add_transaction(&mut result, transaction) {
            tracing::warn!("skipping transaction {}: {reason}", transaction.id);
            result.skipped.push(MalformedRecord {
                id: transaction.id,
                reason,
            });
        }
    }

    result.balance = result.total_income - result.total_expenses;

    result
}

/// Add `transaction` to the running totals in `result`.
///
/// `result` is left untouched if an error is returned.
fn add_transaction(
    result: &mut AggregateResult,
    transaction: &Transaction,
) -> Result<(), MalformedReason> {
    let kind = transaction
        .kind()
        .ok_or_else(|| MalformedReason::UnrecognizedType(transaction.transaction_type.clone()))?;
    let amount = parse_amount(transaction.amount)?;

    match kind {
        TransactionType::Income => {
            let total_income =
                exact_add(result.total_income, amount).ok_or_else(|| out_of_range(transaction))?;
            exact_add(total_income, -result.total_expenses)
                .ok_or_else(|| out_of_range(transaction))?;

            result.total_income = total_income;
        }
        TransactionType::Expense => {
            let label = category_label(&transaction.category);
            let category_total = result
                .expense_by_category
                .get(&label)
                .copied()
                .unwrap_or_default();

            let total_expenses = exact_add(result.total_expenses, amount)
                .ok_or_else(|| out_of_range(transaction))?;
            let category_total =
                exact_add(category_total, amount).ok_or_else(|| out_of_range(transaction))?;
            exact_add(result.total_income, -total_expenses)
                .ok_or_else(|| out_of_range(transaction))?;

            result.total_expenses = total_expenses;
            result.expense_by_category.insert(label, category_total);
        }
    }

    Ok(())
}

/// Add `lhs` and `rhs` without rounding.
///
/// Returns `None` on overflow, and also when the sum needs more digits than
/// a [Decimal] holds, since [Decimal] rounds such sums instead of failing.
fn exact_add(lhs: Decimal, rhs: Decimal) -> Option<Decimal> {
    let sum = lhs.checked_add(rhs)?;

    (sum.checked_sub(lhs) == Some(rhs) && sum.checked_sub(rhs) == Some(lhs)).then_some(sum)
}

/// Convert a stored amount to an unsigned magnitude.
fn parse_amount(amount: Option<f64>) -> Result<Decimal, MalformedReason> {
    let amount = amount.ok_or(MalformedReason::MissingAmount)?;

    if !amount.is_finite() {
        return Err(MalformedReason::NonFiniteAmount(amount));
    }

    Decimal::from_f64(amount.abs()).ok_or(MalformedReason::AmountOutOfRange(amount))
}

fn out_of_range(transaction: &Transaction) -> MalformedReason {
    MalformedReason::AmountOutOfRange(transaction.amount.unwrap_or_default())
}

fn category_label(category: &str) -> String {
    let category = category.trim();

    if category.is_empty() {
        UNCATEGORIZED_LABEL.to_owned()
    } else {
        category.to_owned()
    }
}
