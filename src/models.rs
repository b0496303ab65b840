// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! # API Data Models
//!
//! Request and response structures used by the REST API, plus the format
//! validators applied to them before any store access. All wire types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Validation here covers *format* only. Uniqueness of email and nickname is
//! a storage concern and is re-checked inside the store's write lock at
//! commit time, so racing a concurrent signup cannot create duplicates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Generic Responses
// =============================================================================

/// Minimal JSON response; every endpoint returns at least this shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    /// Human-readable outcome description.
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// Identity Models
// =============================================================================

/// Request to create a new account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Email address; must be unique across all accounts.
    pub email: String,
    /// Display name; must be unique across all accounts.
    pub nickname: String,
    /// Plaintext password; stored only as an argon2 hash.
    pub password: String,
}

/// Request to sign in with existing credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Request to update the authenticated user's profile.
///
/// Both fields are optional; at least one must be present.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateProfileRequest {
    /// New nickname (validated and uniqueness-checked).
    #[serde(default)]
    pub nickname: Option<String>,
    /// New password (policy-checked and re-hashed).
    #[serde(default)]
    pub password: Option<String>,
}

/// Public profile view of a user. Never includes email or password data.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ProfileResponse {
    /// The user's nickname.
    pub nickname: String,
    /// Nicknames of users following this user.
    pub subscribers: Vec<String>,
    /// Nicknames of users this user follows.
    pub subscriptions: Vec<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Request body for the nickname availability probe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NicknameAvailabilityRequest {
    pub nickname: String,
}

/// Request body for the email availability probe.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailAvailabilityRequest {
    pub email: String,
}

// =============================================================================
// Recipe Models
// =============================================================================

/// Request to publish a new recipe post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateRecipeRequest {
    /// Recipe title.
    pub title: String,
    /// Recipe body (ingredients, steps, notes).
    pub body: String,
}

/// Public view of a recipe post.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RecipeResponse {
    /// Unique recipe identifier.
    pub id: String,
    /// Nickname of the author; absent if the account has since been deleted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Format Validation
// =============================================================================

/// Validate an email address structurally.
///
/// Accepts `local@domain` where the domain contains at least one dot and
/// neither part is empty or contains whitespace.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() || email.len() > 254 {
        return Err("Invalid email format.".to_string());
    }
    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format.".to_string());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format.".to_string());
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err("Invalid email format.".to_string());
    }

    let valid_domain = domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
        && !domain.starts_with('.')
        && !domain.ends_with('.');

    if !valid_domain {
        return Err("Invalid email format.".to_string());
    }

    Ok(())
}

/// Validate a nickname: 2-20 characters, letters (any script), digits,
/// underscore or hyphen.
pub fn validate_nickname(nickname: &str) -> Result<(), String> {
    let length = nickname.chars().count();
    if !(2..=20).contains(&length) {
        return Err("Nickname must be 2 to 20 characters long.".to_string());
    }

    if !nickname
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Err("Nickname may only contain letters, digits, '_' and '-'.".to_string());
    }

    Ok(())
}

/// Validate a password against the account policy: at least 8 characters,
/// composed of ASCII lowercase letters and digits.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters long.".to_string());
    }

    if !password
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err("Password may only contain lowercase letters and digits.".to_string());
    }

    Ok(())
}
