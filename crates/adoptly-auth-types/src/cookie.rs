//! Session cookie builders.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::TOKEN_TTL_SECS;

/// Cookie name carrying the session JWT.
pub const TOKEN_COOKIE: &str = "token";

fn base_cookie(value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((TOKEN_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use adoptly_auth_types::cookie::{set_token_cookie, TOKEN_COOKIE};
///
/// let jar = set_token_cookie(CookieJar::new(), "jwt".to_string(), false);
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "jwt");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(!cookie.secure().unwrap_or(false));
/// ```
pub fn set_token_cookie(jar: CookieJar, value: String, secure: bool) -> CookieJar {
    jar.add(base_cookie(
        value,
        Duration::seconds(TOKEN_TTL_SECS as i64),
        secure,
    ))
}

/// Expire the session cookie.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use adoptly_auth_types::cookie::{clear_token_cookie, set_token_cookie, TOKEN_COOKIE};
///
/// let jar = set_token_cookie(CookieJar::new(), "jwt".to_string(), true);
/// let jar = clear_token_cookie(jar, true);
/// let cookie = jar.get(TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn clear_token_cookie(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(base_cookie(String::new(), Duration::ZERO, secure))
}
