//! Anonymous identity: every visitor gets a user ID that is stored in a
//! private cookie.

mod cookie;
mod middleware;

pub use cookie::DEFAULT_COOKIE_DURATION;
pub use middleware::anonymous_identity;
