//! Defines the endpoint for deleting a transaction.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{AppState, stores::TransactionStore, transaction::TransactionId, user::UserId};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The store that deletes transactions and notifies the dashboard.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// A route handler for deleting a transaction.
///
/// Deleting a transaction that is already gone also succeeds, so a double
/// click does not show an error.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Extension(user_id): Extension<UserId>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    match state.transaction_store.delete(user_id, transaction_id) {
        // The status code has to be 200 OK or HTMX will treat it as an error.
        Ok(()) => StatusCode::OK.into_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}
