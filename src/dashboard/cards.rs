//! The summary card with total income, total expenses and the balance.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    dashboard::aggregation::AggregateResult,
    html::{CARD_STYLE, format_decimal_currency},
};

fn balance_class(balance: Decimal) -> &'static str {
    if balance < Decimal::ZERO {
        "text-red-600 dark:text-red-400"
    } else {
        "text-blue-600 dark:text-blue-400"
    }
}

/// Renders the totals from `result`.
///
/// Income is prefixed with "+" and expenses with "-". A note is shown when
/// some transactions were left out of the totals.
pub(super) fn summary_card_view(result: &AggregateResult) -> Markup {
    let skipped_count = result.skipped.len();

    html! {
        section id="summary" class={ (CARD_STYLE) " space-y-2" }
        {
            h2 class="text-xl font-semibold" { "Summary" }

            dl class="space-y-2"
            {
                div class="flex justify-between"
                {
                    dt { "Total Income" }
                    dd id="total-income" class="font-bold text-green-600 dark:text-green-400"
                    {
                        "+" (format_decimal_currency(result.total_income))
                    }
                }

                div class="flex justify-between"
                {
                    dt { "Total Expenses" }
                    dd id="total-expenses" class="font-bold text-red-600 dark:text-red-400"
                    {
                        "-" (format_decimal_currency(result.total_expenses))
                    }
                }

                div class="flex justify-between pt-2 border-t border-gray-200 dark:border-gray-700"
                {
                    dt class="font-semibold" { "Balance" }
                    dd id="balance" class={ "font-bold " (balance_class(result.balance)) }
                    {
                        (format_decimal_currency(result.balance))
                    }
                }
            }

            @if skipped_count > 0 {
                p id="skipped-note" class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (skipped_count)
                    @if skipped_count == 1 { " transaction" } @else { " transactions" }
                    " could not be read and "
                    @if skipped_count == 1 { "was" } @else { "were" }
                    " left out of the totals."
                }
            }
        }
    }
}
