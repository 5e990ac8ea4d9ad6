//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    middleware,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{delete, get, post},
};

use crate::{
    AppState,
    auth::anonymous_identity,
    dashboard::{get_dashboard_events, get_dashboard_page},
    endpoints,
    not_found::get_404_not_found,
    transaction::{create_transaction_endpoint, delete_transaction_endpoint},
};

/// Return a router with all the app's routes.
///
/// Every route except the coffee route and the 404 fallback is behind the
/// anonymous identity middleware.
pub fn build_router(state: AppState) -> Router {
    let identified_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::DASHBOARD_EVENTS, get(get_dashboard_events))
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(endpoints::TRANSACTION, delete(delete_transaction_endpoint))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            anonymous_identity,
        ));

    identified_routes
        .route(endpoints::COFFEE, get(get_coffee))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};

    use crate::{AppState, build_router, endpoints};

    const COOKIE_NAME: &str = "user_id";

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "42").unwrap();
        let app = build_router(state);

        TestServer::try_new(app).expect("Could not create test server.")
    }

    fn list_descriptions(html: &str) -> Vec<String> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("#transaction-list li p.font-semibold").unwrap();

        document
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), endpoints::DASHBOARD_VIEW);
    }

    #[tokio::test]
    async fn first_visit_sets_user_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        assert!(response.maybe_cookie(COOKIE_NAME).is_some());
    }

    #[tokio::test]
    async fn created_transaction_appears_on_dashboard() {
        let server = get_test_server();
        let cookie = server.get(endpoints::DASHBOARD_VIEW).await.cookie(COOKIE_NAME);

        server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookie(cookie.clone())
            .form(&[
                ("description", "Groceries"),
                ("amount", "42.5"),
                ("category", "Food"),
                ("type", "expense"),
            ])
            .await
            .assert_status(StatusCode::CREATED);

        let response = server
            .get(endpoints::DASHBOARD_VIEW)
            .add_cookie(cookie)
            .await;
        assert_eq!(list_descriptions(&response.text()), ["Groceries"]);
    }

    #[tokio::test]
    async fn users_do_not_see_each_others_transactions() {
        let server = get_test_server();
        let cookie = server.get(endpoints::DASHBOARD_VIEW).await.cookie(COOKIE_NAME);
        server
            .post(endpoints::TRANSACTIONS_API)
            .add_cookie(cookie)
            .form(&[
                ("description", "Rent"),
                ("amount", "900"),
                ("category", "Bills"),
                ("type", "expense"),
            ])
            .await
            .assert_status(StatusCode::CREATED);

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        assert!(list_descriptions(&response.text()).is_empty());
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let server = get_test_server();

        server
            .get("/does-not-exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn coffee_is_a_teapot() {
        let server = get_test_server();

        server
            .get(endpoints::COFFEE)
            .await
            .assert_status(StatusCode::IM_A_TEAPOT);
    }
}
