//! The page shown when a request fails for a reason the user cannot fix.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// A 500 error page with a short description and a suggested fix.
pub struct InternalServerError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Sorry, something went wrong.",
            fix: "Your transactions are safe. Reload the page or try again later.",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let page = error_view("Internal Server Error", "500", self.description, self.fix);

        (StatusCode::INTERNAL_SERVER_ERROR, Html(page.into_string())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{
        internal_server_error::InternalServerError,
        test_utils::{assert_valid_html, parse_html_document, text_of},
    };

    #[tokio::test]
    async fn renders_500_page() {
        let response = InternalServerError::default().into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(text_of(&html, "h1"), "500");
    }
}
