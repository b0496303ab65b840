// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Token codec: issuance and verification of signed session tokens.
//!
//! Tokens are HS256 JWTs carrying the user id, issue time, expiry and a
//! `token_type` discriminator. Access tokens authorize individual requests;
//! refresh tokens are accepted only to mint a new access token. Neither is
//! persisted server-side.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// The two kinds of session token, distinguished by lifetime and purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Short-lived; authorizes a single request window.
    Access,
    /// Long-lived; used solely to reissue an access token.
    Refresh,
}

impl TokenKind {
    /// Wire value of the `token_type` claim.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Claims embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id.
    pub sub: String,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Token kind discriminator ("access" or "refresh").
    pub token_type: String,
}

/// Issues and verifies signed session tokens.
///
/// The signing keys are derived once from the configured secret and are
/// read-only for the lifetime of the process.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: i64, refresh_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl_secs,
            refresh_ttl_secs,
        }
    }

    /// Issue a signed token of the given kind for `user_id`.
    pub fn issue(&self, user_id: &str, kind: TokenKind) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl_secs,
            TokenKind::Refresh => self.refresh_ttl_secs,
        };
        self.issue_with_ttl(user_id, kind, ttl)
    }

    fn issue_with_ttl(
        &self,
        user_id: &str,
        kind: TokenKind,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(ttl_secs)).timestamp(),
            token_type: kind.as_str().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InternalError(format!("failed to sign token: {e}")))
    }

    /// Verify a token and return its claims.
    ///
    /// Fails with a typed [`AuthError`] if the signature does not match, the
    /// token is malformed, the expiry has passed, or the embedded kind does
    /// not match `kind`. Never panics on hostile input.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact: a token one second past its expiry is rejected.
        validation.leeway = 0;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        if data.claims.token_type != kind.as_str() {
            return Err(AuthError::WrongTokenType);
        }

        Ok(data.claims)
    }

    /// Issue a token expiring `ttl_secs` from now; negative values produce
    /// an already-expired token.
    #[cfg(test)]
    pub(crate) fn issue_expiring_in(
        &self,
        user_id: &str,
        kind: TokenKind,
        ttl_secs: i64,
    ) -> Result<String, AuthError> {
        self.issue_with_ttl(user_id, kind, ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", 3600, 86400)
    }

    #[test]
    fn verify_returns_subject_after_issuance() {
        let tokens = service();
        let token = tokens.issue("user-1", TokenKind::Access).unwrap();
        let claims = tokens.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.token_type, "access");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let tokens = service();
        let refresh = tokens.issue("user-1", TokenKind::Refresh).unwrap();
        let err = tokens.verify(&refresh, TokenKind::Access).unwrap_err();
        assert_eq!(err, AuthError::WrongTokenType);

        // The inverse holds too.
        let access = tokens.issue("user-1", TokenKind::Access).unwrap();
        let err = tokens.verify(&access, TokenKind::Refresh).unwrap_err();
        assert_eq!(err, AuthError::WrongTokenType);
    }

    #[test]
    fn expired_token_fails() {
        let tokens = service();
        let token = tokens
            .issue_expiring_in("user-1", TokenKind::Access, -120)
            .unwrap();
        let err = tokens.verify(&token, TokenKind::Access).unwrap_err();
        assert_eq!(err, AuthError::TokenExpired);
    }

    #[test]
    fn wrong_secret_fails_signature_check() {
        let tokens = service();
        let other = TokenService::new("another-secret", 3600, 86400);
        let token = other.issue("user-1", TokenKind::Access).unwrap();
        let err = tokens.verify(&token, TokenKind::Access).unwrap_err();
        assert_eq!(err, AuthError::InvalidSignature);
    }

    #[test]
    fn garbage_input_is_malformed_not_a_panic() {
        let tokens = service();
        for garbage in ["", "not-a-token", "a.b", "a.b.c.d", "머리.몸통.꼬리"] {
            let err = tokens.verify(garbage, TokenKind::Access).unwrap_err();
            assert_eq!(err, AuthError::MalformedToken, "input: {garbage}");
        }
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let tokens = service();
        let token = tokens.issue("user-1", TokenKind::Access).unwrap();
        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        let payload = parts[1].clone();
        parts[1] = if payload.starts_with('A') {
            format!("B{}", &payload[1..])
        } else {
            format!("A{}", &payload[1..])
        };
        let tampered = parts.join(".");
        assert!(tokens.verify(&tampered, TokenKind::Access).is_err());
    }
}
