// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Session cookie names and builders.
//!
//! Both session cookies are HTTP-only and scoped to the whole site. They are
//! session cookies on the client side; validity is governed entirely by the
//! expiry embedded in the signed token, so a stale cookie is harmless.

use axum_extra::extract::cookie::{Cookie, SameSite};

/// Cookie holding the short-lived access token.
pub const ACCESS_COOKIE: &str = "accessToken";

/// Cookie holding the long-lived refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build the access-token cookie.
pub fn access_cookie(token: String) -> Cookie<'static> {
    session_cookie(ACCESS_COOKIE, token)
}

/// Build the refresh-token cookie.
pub fn refresh_cookie(token: String) -> Cookie<'static> {
    session_cookie(REFRESH_COOKIE, token)
}

/// Build a removal cookie matching the scope of the session cookies.
///
/// Passing this to `CookieJar::remove` clears the cookie on the client.
pub fn removal(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}

fn session_cookie(name: &'static str, token: String) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
