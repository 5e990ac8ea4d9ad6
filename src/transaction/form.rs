//! The form for adding a transaction.

use maud::{Markup, html};

use crate::{
    category::Category,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_RADIO_GROUP_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner,
    },
    transaction::TransactionType,
};

/// The element ID of the add transaction form.
pub const TRANSACTION_FORM_ID: &str = "transaction-form";

/// Render an empty add transaction form with `category` and
/// `transaction_type` selected.
///
/// The form replaces itself with the response of a successful submission,
/// which clears the description and amount but keeps the selections.
pub fn transaction_form_view(category: Category, transaction_type: TransactionType) -> Markup {
    let spinner = loading_spinner();
    let type_options = [TransactionType::Income, TransactionType::Expense];

    html! {
        form
            id=(TRANSACTION_FORM_ID)
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target="this"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class={ (CARD_STYLE) " space-y-4" }
        {
            h2 class="text-xl font-semibold" { "Add New Transaction" }

            fieldset
            {
                legend class=(FORM_LABEL_STYLE) { "Transaction Type" }

                div class=(FORM_RADIO_GROUP_STYLE)
                {
                    @for choice in type_options {
                        @let value = choice.as_str().to_lowercase();
                        @let id = format!("type-{value}");

                        div class="flex-1"
                        {
                            input
                                type="radio"
                                name="type"
                                id=(id)
                                value=(value)
                                checked[choice == transaction_type]
                                required
                                class=(FORM_RADIO_INPUT_STYLE);

                            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (choice) }
                        }
                    }
                }
            }

            div
            {
                label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="Description"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        min="0.01"
                        placeholder="0.00"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                select name="category" id="category" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for choice in Category::ALL {
                        option value=(choice) selected[choice == category] { (choice) }
                    }
                }
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                span id="indicator" class="inline htmx-indicator" { (spinner) }
                " Add Transaction"
            }
        }
    }
}
