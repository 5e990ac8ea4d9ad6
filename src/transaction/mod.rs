//! Transactions: the data model, database queries, the add form, the list
//! view and the create and delete endpoints.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod form;
mod view;

pub use core::{
    Transaction, TransactionDraft, TransactionId, TransactionType, create_transaction_table,
    delete_transaction, get_transactions_for_user, insert_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use form::transaction_form_view;
pub use view::transaction_list_view;
