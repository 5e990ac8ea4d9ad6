//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for the dashboard page
//! - The Server-Sent Events handler that pushes re-rendered content on every change
//! - The view functions shared by both

use std::{convert::Infallible, sync::Arc};

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
};
use futures_util::{Stream, StreamExt};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    category::Category,
    dashboard::{aggregation::aggregate, cards::summary_card_view, charts::expense_chart_view},
    endpoints,
    html::{
        ECHARTS_URL, HTMX_SSE_URL, HeadElement, PAGE_CONTAINER_STYLE, base, dollar_input_styles,
    },
    stores::TransactionStore,
    transaction::{Transaction, TransactionType, transaction_form_view, transaction_list_view},
    user::UserId,
};

/// The name of the event that carries re-rendered dashboard content.
pub const DASHBOARD_EVENT: &str = "dashboard";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The store that provides the user's transactions.
    pub transaction_store: Arc<dyn TransactionStore>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            transaction_store: state.transaction_store.clone(),
        }
    }
}

/// Display a page with an overview of the user's data.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Response, Error> {
    let transactions = state
        .transaction_store
        .snapshot(user_id)
        .inspect_err(|error| tracing::error!("could not get transactions for {user_id}: {error}"))?;

    Ok(dashboard_view(&transactions).into_response())
}

/// Stream the dashboard content to the client, starting with the current
/// content and again after every change to the user's transactions.
pub async fn get_dashboard_events(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserId>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, Error> {
    let subscription = state
        .transaction_store
        .subscribe(user_id)
        .inspect_err(|error| tracing::error!("could not subscribe {user_id}: {error}"))?;
    tracing::debug!("user {user_id} subscribed to dashboard updates");

    let stream = subscription
        .into_stream()
        .map(|transactions| Ok(dashboard_event(&transactions)));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn dashboard_event(transactions: &[Transaction]) -> Event {
    // Event data may not contain carriage returns.
    let content = dashboard_content_view(transactions)
        .into_string()
        .replace('\r', "");

    Event::default().event(DASHBOARD_EVENT).data(content)
}

/// Renders the parts of the dashboard that are derived from the transactions.
fn dashboard_content_view(transactions: &[Transaction]) -> Markup {
    let result = aggregate(transactions);

    html! {
        (summary_card_view(&result))
        (expense_chart_view(&result))
        (transaction_list_view(transactions))
    }
}

fn dashboard_view(transactions: &[Transaction]) -> Markup {
    let content = html! {
        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="w-full max-w-6xl mb-6"
            {
                h1 class="text-3xl font-bold" { "Tally" }
                p class="text-gray-600 dark:text-gray-400" { "Track your income and expenses." }
            }

            div class="grid w-full max-w-6xl grid-cols-1 gap-6 lg:grid-cols-3"
            {
                div class="lg:col-span-1"
                {
                    (transaction_form_view(Category::Food, TransactionType::Expense))
                }

                div
                    id="dashboard-content"
                    class="space-y-6 lg:col-span-2"
                    hx-ext="sse"
                    sse-connect=(endpoints::DASHBOARD_EVENTS)
                    sse-swap=(DASHBOARD_EVENT)
                    hx-swap="innerHTML"
                {
                    (dashboard_content_view(transactions))
                }
            }
        }
    };

    base(
        "Dashboard",
        &[
            HeadElement::ScriptLink(HTMX_SSE_URL.to_owned()),
            HeadElement::ScriptLink(ECHARTS_URL.to_owned()),
            dollar_input_styles(),
        ],
        &content,
    )
}
