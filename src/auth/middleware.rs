//! Middleware that gives every visitor an anonymous identity.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::header::SET_COOKIE,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use rusqlite::Connection;
use time::Duration;

use crate::{
    AppState, Error,
    auth::cookie::{get_user_id_from_cookie, set_user_id_cookie},
    internal_server_error::InternalServerError,
    user::{UserId, create_anonymous_user, get_user_by_id},
};

/// The state needed for the identity middleware.
#[derive(Debug, Clone)]
pub struct IdentityState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which the user ID cookie is valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up and creating users.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for IdentityState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<IdentityState> for Key {
    fn from_ref(state: &IdentityState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that identifies the user making the request.
///
/// The user is read from the private user ID cookie. If the cookie is
/// missing, cannot be decrypted or refers to an unknown user, a new
/// anonymous user is created. The cookie is refreshed on every response.
///
/// **Note**: Route handlers can use the function argument `Extension(user_id): Extension<UserId>` to receive the user ID.
pub async fn anonymous_identity(
    State(state): State<IdentityState>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}");
            return InternalServerError::default().into_response();
        }
    };

    let user_id = match resolve_user(&jar, &state.db_connection) {
        Ok(user_id) => user_id,
        Err(error) => {
            tracing::error!("Could not identify user: {error}");
            return error.into_response();
        }
    };

    parts.extensions.insert(user_id);
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = set_user_id_cookie(jar, user_id, state.cookie_duration);
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Get the user from the cookie in `jar`, or create a new anonymous user.
fn resolve_user(
    jar: &PrivateCookieJar,
    db_connection: &Arc<Mutex<Connection>>,
) -> Result<UserId, Error> {
    let connection = db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    match get_user_id_from_cookie(jar) {
        Ok(user_id) => {
            if get_user_by_id(user_id, &connection)?.is_some() {
                return Ok(user_id);
            }

            tracing::debug!("user {user_id} from cookie does not exist");
        }
        Err(Error::CookieMissing) => {}
        Err(error) => tracing::debug!("ignoring user ID cookie: {error}"),
    }

    let user = create_anonymous_user(&connection)?;
    tracing::info!("created anonymous user {} at {}", user.id, user.created_at);

    Ok(user.id)
}

#[cfg(test)]
mod anonymous_identity_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Extension, Router, middleware, routing::get};
    use axum_extra::extract::cookie::Key;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use sha2::{Digest, Sha512};

    use crate::{
        auth::{
            DEFAULT_COOKIE_DURATION,
            cookie::COOKIE_USER_ID,
            middleware::{IdentityState, anonymous_identity},
        },
        db::initialize,
        user::UserId,
    };

    async fn echo_user_id(Extension(user_id): Extension<UserId>) -> String {
        user_id.to_string()
    }

    fn get_test_server() -> (TestServer, Arc<Mutex<Connection>>) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let db_connection = Arc::new(Mutex::new(connection));

        let state = IdentityState {
            cookie_key: Key::from(&Sha512::digest(b"foobar")),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: db_connection.clone(),
        };

        let app = Router::new()
            .route("/", get(echo_user_id))
            .layer(middleware::from_fn_with_state(state.clone(), anonymous_identity))
            .with_state(state);

        (
            TestServer::try_new(app).expect("Could not create test server."),
            db_connection,
        )
    }

    fn count_users(db_connection: &Arc<Mutex<Connection>>) -> i64 {
        db_connection
            .lock()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM user", (), |row| row.get(0))
            .unwrap()
    }

    #[tokio::test]
    async fn creates_user_for_new_visitor() {
        let (server, db_connection) = get_test_server();

        let response = server.get("/").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "1");
        assert_eq!(count_users(&db_connection), 1);
        let cookie = response.cookie(COOKIE_USER_ID);
        assert_ne!(cookie.value(), "1", "cookie value should be encrypted");
    }

    #[tokio::test]
    async fn returning_visitor_keeps_identity() {
        let (server, db_connection) = get_test_server();
        let first = server.get("/").await;
        let cookie = first.cookie(COOKIE_USER_ID);

        let second = server.get("/").add_cookie(cookie).await;

        assert_eq!(second.text(), first.text());
        assert_eq!(count_users(&db_connection), 1);
    }

    #[tokio::test]
    async fn tampered_cookie_gets_new_identity() {
        let (server, db_connection) = get_test_server();
        server.get("/").await;

        let response = server
            .get("/")
            .add_cookie(axum_extra::extract::cookie::Cookie::new(COOKIE_USER_ID, "1"))
            .await;

        assert_eq!(response.text(), "2");
        assert_eq!(count_users(&db_connection), 2);
    }
}
