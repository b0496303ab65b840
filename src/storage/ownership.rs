// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Ownership enforcement for content mutations.
//!
//! Content may only be mutated by its author. The check always runs against
//! an identity derived from a verified session token, strictly after the
//! session guard has authenticated the request.

use crate::auth::AuthenticatedUser;

use super::{StoreError, StoreResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user id.
    fn owner_user_id(&self) -> &str;

    /// Short resource name used in error messages ("recipe", ...).
    fn kind(&self) -> &'static str;

    /// Verify that `user` owns this resource.
    ///
    /// # Errors
    /// Returns `StoreError::PermissionDenied` if the user is not the owner.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StoreResult<()> {
        if self.owner_user_id() == user.user_id {
            Ok(())
        } else {
            Err(StoreError::PermissionDenied {
                user_id: user.user_id.clone(),
                resource: self.kind().to_string(),
            })
        }
    }
}

/// Extension trait running the ownership check on a lookup result.
pub trait OwnershipCheck<T> {
    /// Verify ownership and return the resource if authorized.
    fn verify_owner(self, user: &AuthenticatedUser) -> StoreResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn verify_owner(self, user: &AuthenticatedUser) -> StoreResult<T> {
        match self {
            Some(resource) => {
                resource.verify_ownership(user)?;
                Ok(resource)
            }
            None => Err(StoreError::NotFound("resource".to_string())),
        }
    }
}
