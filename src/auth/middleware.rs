// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Session guard middleware.
//!
//! Layered over the whole router. For every request it reads the
//! `accessToken` and `refreshToken` cookies and resolves one of three
//! outcomes:
//!
//! - access token verifies: the authenticated identity is attached to the
//!   request extensions and the request proceeds;
//! - access token missing or invalid but refresh token verifies: a fresh
//!   access token is minted, the identity is attached, and the new
//!   `accessToken` cookie is set on the response;
//! - neither verifies: the request proceeds without an identity, and any
//!   handler requiring [`Auth`](super::Auth) rejects it with 401 before
//!   domain logic runs. Cookies are left untouched on this path.

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;

use super::cookies::{self, ACCESS_COOKIE, REFRESH_COOKIE};
use super::tokens::{Claims, TokenKind, TokenService};
use super::AuthError;
use crate::state::AppState;

/// Authenticated identity derived from a verified session token.
///
/// This is the only identity source handlers may consult; client-supplied
/// ids in paths or bodies are never trusted.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The user id from the token's `sub` claim.
    pub user_id: String,
    /// Expiry of the verified token (Unix seconds).
    pub expires_at: i64,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: &Claims) -> Self {
        Self {
            user_id: claims.sub.clone(),
            expires_at: claims.exp,
        }
    }
}

/// Outcome of a successful cookie authentication.
#[derive(Debug)]
struct Session {
    user: AuthenticatedUser,
    /// New access token to set on the response, when the refresh path ran.
    renewed: Option<String>,
}

/// Session guard middleware function.
///
/// Attach with `axum::middleware::from_fn_with_state(state, session_guard)`.
pub async fn session_guard(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let access = jar.get(ACCESS_COOKIE).map(|c| c.value().to_string());
    let refresh = jar.get(REFRESH_COOKIE).map(|c| c.value().to_string());

    let session = match authenticate(&state.tokens, access.as_deref(), refresh.as_deref()) {
        Ok(session) => session,
        // Unauthenticated; protected handlers reject through the Auth
        // extractor, public handlers are unaffected.
        Err(_) => return next.run(request).await,
    };

    // Build the renewed cookie header before the handler runs so a failure
    // here rejects the request instead of losing the cookie write.
    let renewed_cookie = match session.renewed {
        Some(token) => {
            tracing::debug!(user_id = %session.user.user_id, "access token renewed from refresh token");
            match HeaderValue::from_str(&cookies::access_cookie(token).to_string()) {
                Ok(value) => Some(value),
                Err(e) => {
                    return AuthError::InternalError(format!("invalid cookie header: {e}"))
                        .into_response()
                }
            }
        }
        None => None,
    };

    request.extensions_mut().insert(session.user);
    let mut response = next.run(request).await;

    // A handler that writes the access cookie itself (signin, signout,
    // account deletion) wins over the transparent refresh.
    if let Some(value) = renewed_cookie {
        if !sets_access_cookie(&response) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    response
}

fn sets_access_cookie(response: &Response) -> bool {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .any(|value| {
            value
                .to_str()
                .map(|s| {
                    s.trim_start()
                        .split_once('=')
                        .is_some_and(|(name, _)| name == ACCESS_COOKIE)
                })
                .unwrap_or(false)
        })
}

/// Resolve the session state machine for a pair of optional cookie values.
fn authenticate(
    tokens: &TokenService,
    access: Option<&str>,
    refresh: Option<&str>,
) -> Result<Session, AuthError> {
    let access_failure = match access {
        Some(token) => match tokens.verify(token, TokenKind::Access) {
            Ok(claims) => {
                return Ok(Session {
                    user: AuthenticatedUser::from_claims(&claims),
                    renewed: None,
                })
            }
            Err(e) => e,
        },
        None => AuthError::MissingToken,
    };

    let Some(token) = refresh else {
        return Err(access_failure);
    };

    let claims = tokens.verify(token, TokenKind::Refresh)?;
    let renewed = tokens.issue(&claims.sub, TokenKind::Access)?;

    Ok(Session {
        user: AuthenticatedUser::from_claims(&claims),
        renewed: Some(renewed),
    })
}
