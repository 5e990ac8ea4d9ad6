//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transaction was submitted with a blank description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// A transaction was submitted with an amount that is zero, negative,
    /// infinite or NaN.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A transaction was submitted with a category that is not offered in
    /// the form.
    #[error("\"{0}\" is not a valid category")]
    InvalidCategory(String),

    /// The user ID cookie is missing from the cookie jar in the request.
    #[error("no user ID cookie in the cookie jar")]
    CookieMissing,

    /// The user ID cookie could not be read as a user ID.
    #[error("could not read the user ID cookie \"{0}\"")]
    InvalidCookie(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::EmptyDescription => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert {
                    message: "Invalid description".to_owned(),
                    details: "Enter a description for the transaction.".to_owned(),
                },
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert {
                    message: "Invalid amount".to_owned(),
                    details: format!(
                        "{amount} is not a valid amount. Enter an amount greater than zero."
                    ),
                },
            ),
            Error::InvalidCategory(category) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert {
                    message: "Invalid category".to_owned(),
                    details: format!(
                        "\"{category}\" is not a valid category. Choose one of the listed categories."
                    ),
                },
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert {
                    message: "Not found".to_owned(),
                    details: "Try refreshing the page to get the latest data.".to_owned(),
                },
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert {
                        message: "Something went wrong".to_owned(),
                        details:
                            "An unexpected error occurred, check the server logs for more details."
                                .to_owned(),
                    },
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn no_rows_becomes_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn validation_errors_are_unprocessable() {
        for error in [
            Error::EmptyDescription,
            Error::InvalidAmount(-1.0),
            Error::InvalidCategory("Pets".to_owned()),
        ] {
            let response = error.into_alert_response();

            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        }
    }

    #[test]
    fn lock_error_is_internal_server_error() {
        assert_eq!(
            Error::DatabaseLockError.into_alert_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            Error::DatabaseLockError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_page_has_404_status() {
        assert_eq!(Error::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }
}
