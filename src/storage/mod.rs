// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! # Storage Module
//!
//! In-memory stores for users and recipes, held behind `Arc<RwLock<...>>` in
//! the application state. Every mutation runs under the write lock, so
//! multi-record updates (the dual-write subscription sets, the relation
//! pruning on account deletion, check-then-delete on recipes) are atomic
//! with respect to concurrent requests.
//!
//! The stores never cache records across requests; every authorization
//! check reads current state.

pub mod ownership;
pub mod recipes;
pub mod users;

use thiserror::Error;

pub use ownership::{OwnedResource, OwnershipCheck};
pub use recipes::{RecipeStore, StoredRecipe};
pub use users::{StoredUser, UserStore};

/// Error type for store operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Entity not found
    #[error("{0} not found")]
    NotFound(String),
    /// Entity already exists
    #[error("{0} already exists")]
    AlreadyExists(String),
    /// Email is already registered to another account
    #[error("email is already in use")]
    EmailTaken,
    /// Nickname is already registered to another account
    #[error("nickname is already in use")]
    NicknameTaken,
    /// A user attempted to subscribe to themselves
    #[error("cannot subscribe to yourself")]
    SelfSubscribe,
    /// Ownership check failed
    #[error("user {user_id} does not own this {resource}")]
    PermissionDenied { user_id: String, resource: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
