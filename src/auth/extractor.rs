// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Axum extractor for authenticated users.
//!
//! Use the `Auth` extractor in handlers to require authentication:
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user is AuthenticatedUser
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;

use super::cookies::ACCESS_COOKIE;
use super::middleware::AuthenticatedUser;
use super::tokens::TokenKind;
use super::AuthError;
use crate::state::AppState;

/// Extractor requiring an authenticated user.
///
/// Reads the identity attached by the session guard middleware. When the
/// guard did not authenticate the request (or is absent, as in handler
/// tests), the extractor verifies the `accessToken` cookie itself; the
/// refresh path is the middleware's job only, since an extractor cannot
/// write response cookies.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // First check if the session guard already set the user.
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Auth(user));
        }

        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar
            .get(ACCESS_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AuthError::MissingToken)?;

        let claims = state.tokens.verify(&token, TokenKind::Access)?;
        Ok(Auth(AuthenticatedUser::from_claims(&claims)))
    }
}
