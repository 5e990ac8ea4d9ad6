//! Defines the endpoint for creating a new transaction.
use std::sync::Arc;

use axum::{
    Extension,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::Category,
    stores::TransactionStore,
    transaction::{TransactionDraft, TransactionType, form::transaction_form_view},
    user::UserId,
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The store that saves transactions and notifies the dashboard.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// The form data for creating a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// Text detailing the transaction.
    pub description: String,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The category label, e.g. "Food".
    pub category: String,
    /// Whether the transaction is income or an expense.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// A route handler for creating a new transaction.
///
/// Responds with a fresh form on success. The dashboard picks up the new
/// transaction from the store's subscription, not from this response.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(user_id): Extension<UserId>,
    Form(form): Form<TransactionForm>,
) -> Response {
    match create_transaction(&state, user_id, &form) {
        Ok(category) => (
            StatusCode::CREATED,
            transaction_form_view(category, form.transaction_type),
        )
            .into_response(),
        Err(error) => {
            tracing::debug!("could not create transaction for user {user_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn create_transaction(
    state: &CreateTransactionState,
    user_id: UserId,
    form: &TransactionForm,
) -> Result<Category, Error> {
    let category: Category = form.category.parse()?;
    let draft = TransactionDraft::new(
        &form.description,
        form.amount,
        category,
        form.transaction_type,
    )?;

    let transaction_id = state.transaction_store.create(user_id, draft)?;
    tracing::info!("user {user_id} created transaction {transaction_id}");

    Ok(category)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, extract::State, http::StatusCode};
    use axum_extra::extract::Form;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        stores::SQLiteTransactionStore,
        test_utils::{assert_form_input, must_get_form, parse_html_fragment},
        transaction::{
            TransactionType,
            create_endpoint::{CreateTransactionState, TransactionForm, create_transaction_endpoint},
        },
        user::{UserId, create_anonymous_user},
    };

    fn get_test_state() -> (CreateTransactionState, UserId) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = create_anonymous_user(&connection).unwrap();
        let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(connection)));

        (
            CreateTransactionState {
                transaction_store: Arc::new(store),
            },
            user.id,
        )
    }

    fn form(description: &str, amount: f64, category: &str) -> TransactionForm {
        TransactionForm {
            description: description.to_owned(),
            amount,
            category: category.to_owned(),
            transaction_type: TransactionType::Expense,
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, user_id) = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("Lunch", 12.3, "Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_input(&form, "description", "text");

        let snapshot = state.transaction_store.snapshot(user_id).unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].description, "Lunch");
        assert_eq!(snapshot[0].amount, Some(12.3));
        assert_eq!(snapshot[0].category, "Food");
        assert_eq!(snapshot[0].transaction_type, "Expense");
    }

    #[tokio::test]
    async fn rejects_blank_description() {
        let (state, user_id) = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("  ", 12.3, "Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.transaction_store.snapshot(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (state, user_id) = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("Lunch", 0.0, "Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.transaction_store.snapshot(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_category() {
        let (state, user_id) = get_test_state();

        let response = create_transaction_endpoint(
            State(state.clone()),
            Extension(user_id),
            Form(form("Lunch", 12.3, "Pets")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.transaction_store.snapshot(user_id).unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_user_is_a_server_error() {
        let (state, _) = get_test_state();

        let response = create_transaction_endpoint(
            State(state),
            Extension(UserId::new(999)),
            Form(form("Lunch", 12.3, "Food")),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
