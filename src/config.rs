// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup into an
//! immutable [`Config`]. Nothing re-reads the environment afterwards; in
//! particular the token-signing secret is fixed for the lifetime of the
//! process.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TOKEN_SECRET` | HMAC secret for signing session tokens | Required |
//! | `ACCESS_TOKEN_TTL_SECS` | Access token lifetime in seconds | `3600` (1 hour) |
//! | `REFRESH_TOKEN_TTL_SECS` | Refresh token lifetime in seconds | `1209600` (14 days) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::env;

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the token-signing secret.
///
/// The secret must be set before startup. It is read exactly once and never
/// exposed through any API surface.
pub const TOKEN_SECRET_ENV: &str = "TOKEN_SECRET";

/// Environment variable name for the access token lifetime (seconds).
pub const ACCESS_TOKEN_TTL_ENV: &str = "ACCESS_TOKEN_TTL_SECS";

/// Environment variable name for the refresh token lifetime (seconds).
pub const REFRESH_TOKEN_TTL_ENV: &str = "REFRESH_TOKEN_TTL_SECS";

/// Environment variable name for the logging format (`json` or `pretty`).
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default access token lifetime: 1 hour.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 3600;

/// Default refresh token lifetime: 14 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 14 * 24 * 3600;

/// Immutable runtime configuration, loaded from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Token-signing secret.
    pub token_secret: String,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: i64,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: i64,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Returns an error message if `TOKEN_SECRET` is missing or a numeric
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let token_secret =
            env::var(TOKEN_SECRET_ENV).map_err(|_| format!("{TOKEN_SECRET_ENV} must be set"))?;

        if token_secret.is_empty() {
            return Err(format!("{TOKEN_SECRET_ENV} must not be empty"));
        }

        let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_env(PORT_ENV, 8080)?;
        let access_ttl_secs = parse_env(ACCESS_TOKEN_TTL_ENV, DEFAULT_ACCESS_TTL_SECS)?;
        let refresh_ttl_secs = parse_env(REFRESH_TOKEN_TTL_ENV, DEFAULT_REFRESH_TTL_SECS)?;

        Ok(Self {
            host,
            port,
            token_secret,
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("{name} is not a valid number: {raw}")),
        Err(_) => Ok(default),
    }
}
