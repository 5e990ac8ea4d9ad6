//! HTML rendering for the list of recent transactions.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_DELETE_STYLE, CARD_STYLE, format_currency},
    transaction::{Transaction, TransactionType},
};

/// The text shown in place of the list when there are no transactions.
pub const NO_TRANSACTIONS_MESSAGE: &str = "No transactions yet";

/// Format the amount of `transaction` with a sign for its type, e.g. "+$12.30".
fn signed_amount(transaction: &Transaction) -> String {
    let Some(amount) = transaction.amount else {
        return "Missing amount".to_owned();
    };

    let sign = match transaction.kind() {
        Some(TransactionType::Income) => "+",
        Some(TransactionType::Expense) => "-",
        None => "",
    };

    format!("{sign}{}", format_currency(amount.abs()))
}

fn amount_class(transaction: &Transaction) -> &'static str {
    match transaction.kind() {
        Some(TransactionType::Income) => "text-green-600 dark:text-green-400",
        Some(TransactionType::Expense) => "text-red-600 dark:text-red-400",
        None => "text-gray-500 dark:text-gray-400",
    }
}

/// Render `transactions` in the order given, each with a delete button.
pub fn transaction_list_view(transactions: &[Transaction]) -> Markup {
    html! {
        section id="transaction-list" class={ (CARD_STYLE) " space-y-3" }
        {
            h2 class="text-xl font-semibold" { "Recent Transactions" }

            @if transactions.is_empty() {
                p class="text-center text-gray-500 dark:text-gray-400" { (NO_TRANSACTIONS_MESSAGE) }
            } @else {
                ul class="space-y-3 max-h-[400px] overflow-y-auto pr-2"
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::TRANSACTION, transaction.id.as_i64());
    let confirm_message = format!("Are you sure you want to delete '{}'?", transaction.description);

    html! {
        li
            data-transaction-id=(transaction.id)
            class="flex items-center justify-between p-3 rounded-lg border
                bg-gray-50 dark:bg-gray-700 border-gray-200 dark:border-gray-600"
        {
            div
            {
                p class="font-semibold" { (transaction.description) }
                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (transaction.category) " · " (transaction.created_at.date())
                }
            }

            div class="flex items-center gap-3"
            {
                span class={ "font-bold " (amount_class(transaction)) } { (signed_amount(transaction)) }

                // The list is re-rendered from the event stream after the
                // delete, so the response is not swapped in.
                button
                    type="button"
                    aria-label="Delete transaction"
                    hx-delete=(delete_url)
                    hx-confirm=(confirm_message)
                    hx-swap="none"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    svg
                        xmlns="http://www.w3.org/2000/svg"
                        class="h-5 w-5"
                        fill="none"
                        viewBox="0 0 24 24"
                        stroke="currentColor"
                    {
                        path
                            stroke-linecap="round"
                            stroke-linejoin="round"
                            stroke-width="2"
                            d="M6 18L18 6M6 6l12 12" {}
                    }
                }
            }
        }
    }
}
