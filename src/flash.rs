//! One-shot flash messages carried in a cookie across a redirect.
//!
//! The jar percent-encodes cookie values, so any text is safe here.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

const FLASH_COOKIE: &str = "flash";

/// Queue a message for the next rendered page.
pub fn set(jar: CookieJar, message: &str) -> CookieJar {
    jar.add(
        Cookie::build((FLASH_COOKIE, message.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Take the pending message, if any, and clear the cookie.
pub fn take(jar: CookieJar) -> (CookieJar, Option<String>) {
    let message = jar
        .get(FLASH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|m| !m.is_empty());

    match message {
        Some(message) => (
            jar.remove(Cookie::build(FLASH_COOKIE).path("/")),
            Some(message),
        ),
        None => (jar, None),
    }
}
