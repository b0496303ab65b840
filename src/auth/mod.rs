// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! # Authentication Module
//!
//! Stateless cookie-bound session handling for the Tastebook API.
//!
//! ## Session Flow
//!
//! 1. `POST /users/signin` verifies credentials and sets two HTTP-only
//!    cookies: `accessToken` (short-lived) and `refreshToken` (long-lived).
//! 2. Every protected request passes through the session guard middleware,
//!    which reads both cookies:
//!    - access token verifies → request proceeds as that user;
//!    - access token missing/expired but refresh token verifies → a new
//!      access token is minted and set on the response cookie, and the
//!      request proceeds as that user;
//!    - both invalid → the request is rejected before any handler runs.
//! 3. Handlers receive the authenticated identity through the [`Auth`]
//!    extractor; the identity is always re-derived from a verified token,
//!    never from request parameters.
//!
//! ## Security
//!
//! - Tokens are HS256-signed against a process-wide secret fixed at startup.
//! - Expiry is validated with zero clock-skew leeway.
//! - A refresh token is never accepted where an access token is required:
//!   the embedded token type is checked alongside the signature.
//! - No session state is persisted server-side.

pub mod cookies;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod tokens;

pub use error::AuthError;
pub use extractor::Auth;
pub use middleware::{session_guard, AuthenticatedUser};
pub use tokens::{Claims, TokenKind, TokenService};
