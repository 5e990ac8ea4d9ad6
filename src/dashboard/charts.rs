//! The expense breakdown pie chart.
//!
//! The chart is generated as an ECharts configuration and initialised by an
//! inline script, so that it is redrawn whenever the dashboard content is
//! swapped in from the event stream.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{Color, JsFunction, Tooltip, Trigger},
    series::Pie,
};
use maud::{Markup, PreEscaped, html};

use crate::{dashboard::aggregation::AggregateResult, html::CARD_STYLE};

/// The HTML element ID of the expense chart.
pub(super) const EXPENSE_CHART_ID: &str = "expense-chart";

/// The text shown in place of the chart when there are no expenses.
pub(super) const NO_EXPENSES_MESSAGE: &str = "No expenses to show";

/// Slice colours, reused in order when there are more categories.
const CHART_COLOURS: [&str; 7] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#AF19FF", "#FF1943", "#19D4FF",
];

/// Build the pie chart of expenses grouped by category.
pub(super) fn expense_pie_chart(result: &AggregateResult) -> Chart {
    let chart_data = result.expense_chart_data();
    let data: Vec<(f64, &str)> = chart_data
        .iter()
        .map(|(category, amount)| (*amount, category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by Category").left("center"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("0%"))
        .color(CHART_COLOURS.into_iter().map(Color::from).collect())
        .series(Pie::new().name("Expenses").radius("60%").data(data))
}

/// Render the expense chart panel, or an empty state if there are no
/// expenses.
pub(super) fn expense_chart_view(result: &AggregateResult) -> Markup {
    html! {
        section id="expense-chart-panel" class=(CARD_STYLE)
        {
            @if result.expense_by_category.is_empty() {
                h2 class="text-xl font-semibold" { "Expenses by Category" }
                p class="py-8 text-center text-gray-500 dark:text-gray-400" { (NO_EXPENSES_MESSAGE) }
            } @else {
                div id=(EXPENSE_CHART_ID) class="min-h-[380px] rounded dark:bg-gray-100" {}
                (chart_script(EXPENSE_CHART_ID, &expense_pie_chart(result)))
            }
        }
    }
}

/// Generates the script that draws `chart` into the element `id`.
///
/// The chart is disposed when htmx removes the element so that swapped out
/// charts do not keep listening for resize events.
fn chart_script(id: &str, chart: &Chart) -> Markup {
    // Category labels come from stored data and must not close the script tag.
    let options = chart.to_string().replace("</", "<\\/");

    let script = format!(
        r#"(function() {{
            const chartDom = document.getElementById("{id}");
            if (!chartDom) return;
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            const resize = () => chart.resize();
            window.addEventListener('resize', resize);

            const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
            const updateTheme = () => {{
                const isDarkMode = darkModeMediaQuery.matches;
                chart.setTheme(isDarkMode ? 'dark' : 'default');
            }};
            darkModeMediaQuery.addEventListener('change', updateTheme);
            updateTheme();

            chartDom.addEventListener('htmx:beforeCleanupElement', () => {{
                window.removeEventListener('resize', resize);
                darkModeMediaQuery.removeEventListener('change', updateTheme);
                chart.dispose();
            }});
        }})();"#
    );

    html! {
        script { (PreEscaped(script)) }
    }
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use rust_decimal::Decimal;
    use scraper::{Html, Selector};

    use crate::{
        dashboard::{
            aggregation::AggregateResult,
            charts::{
                EXPENSE_CHART_ID, NO_EXPENSES_MESSAGE, expense_chart_view, expense_pie_chart,
            },
        },
        test_utils::text_of,
    };

    fn result_with_expenses(expenses: &[(&str, i64)]) -> AggregateResult {
        let expense_by_category: BTreeMap<String, Decimal> = expenses
            .iter()
            .map(|(category, amount)| (category.to_string(), Decimal::from(*amount)))
            .collect();

        AggregateResult {
            total_expenses: expense_by_category.values().sum(),
            expense_by_category,
            ..Default::default()
        }
    }

    #[test]
    fn shows_empty_state_without_expenses() {
        let view = expense_chart_view(&AggregateResult::default()).into_string();
        let html = Html::parse_fragment(&view);

        let chart = Selector::parse(&format!("#{EXPENSE_CHART_ID}")).unwrap();
        assert!(html.select(&chart).next().is_none());
        assert_eq!(text_of(&html, "#expense-chart-panel p"), NO_EXPENSES_MESSAGE);
    }

    #[test]
    fn renders_chart_with_script() {
        let result = result_with_expenses(&[("Food", 50), ("Transport", 5)]);

        let view = expense_chart_view(&result).into_string();
        let html = Html::parse_fragment(&view);

        let chart = Selector::parse(&format!("#{EXPENSE_CHART_ID}")).unwrap();
        let script = Selector::parse("script").unwrap();
        assert!(html.select(&chart).next().is_some());
        let script = html.select(&script).next().unwrap().inner_html();
        assert!(script.contains("echarts.init"));
        assert!(script.contains("Transport"));
        assert!(!view.contains(NO_EXPENSES_MESSAGE));
    }

    #[test]
    fn options_contain_every_category_and_the_palette() {
        let result = result_with_expenses(&[("Food", 50), ("Bills", 20), ("Pets", 5)]);

        let options = expense_pie_chart(&result).to_string();

        for category in ["Food", "Bills", "Pets"] {
            assert!(options.contains(category), "missing {category} in {options}");
        }
        assert!(options.contains("#0088FE"));
        assert!(options.contains("\"pie\""));
    }

    #[test]
    fn category_labels_cannot_close_the_script() {
        let result = result_with_expenses(&[("</script><b>", 5)]);

        let view = expense_chart_view(&result).into_string();

        assert!(!view.contains("</script><b>"));
    }
}
