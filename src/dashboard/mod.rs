//! The dashboard: a summary of the user's totals, a pie chart of expenses by
//! category and the list of transactions, kept up to date over Server-Sent
//! Events.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use handlers::{get_dashboard_events, get_dashboard_page};
