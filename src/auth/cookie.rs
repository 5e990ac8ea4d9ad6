//! Defines functions for identifying anonymous users with a private cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, user::UserId};

pub(crate) const COOKIE_USER_ID: &str = "user_id";
/// The default duration for which the user ID cookie is valid.
pub const DEFAULT_COOKIE_DURATION: Duration = Duration::days(365);

/// Add the user ID cookie to the cookie jar.
///
/// Sets the expiry of the cookie to `duration` from the current time, so
/// calling this again for the same user extends the cookie.
///
/// Returns the cookie jar with the cookie added.
pub(crate) fn set_user_id_cookie(
    jar: PrivateCookieJar,
    user_id: UserId,
    duration: Duration,
) -> PrivateCookieJar {
    let expiry = OffsetDateTime::now_utc() + duration;

    jar.add(
        Cookie::build((COOKIE_USER_ID, user_id.as_i64().to_string()))
            .expires(expiry)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Read the user ID from the cookie jar.
///
/// # Errors
///
/// Returns:
/// - [Error::CookieMissing] if there is no user ID cookie in the jar,
/// - [Error::InvalidCookie] if the cookie does not hold a user ID.
pub(crate) fn get_user_id_from_cookie(jar: &PrivateCookieJar) -> Result<UserId, Error> {
    let cookie = jar.get(COOKIE_USER_ID).ok_or(Error::CookieMissing)?;
    let value = cookie.value_trimmed();

    value
        .parse()
        .map(UserId::new)
        .map_err(|_| Error::InvalidCookie(value.to_owned()))
}
