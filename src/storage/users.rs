// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! User store.
//!
//! Holds every registered account plus unique indexes over email and
//! nickname. The subscriber/subscription relation is kept as two adjacency
//! sets per user with the invariant that A appears in B's `subscribers`
//! exactly when B appears in A's `subscriptions`; all dual writes happen
//! inside a single `&mut self` call so the invariant cannot be observed
//! broken.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult};

/// A registered account as held by the store.
///
/// Deliberately not serializable: the password hash must never travel
/// through a response body. API-facing views are built in `models`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUser {
    /// Unique user identifier (UUID).
    pub id: String,
    /// Unique email address.
    pub email: String,
    /// Unique display name.
    pub nickname: String,
    /// Argon2 hash of the password, PHC string format.
    pub password_hash: String,
    /// Ids of users following this user.
    pub subscribers: BTreeSet<String>,
    /// Ids of users this user follows.
    pub subscriptions: BTreeSet<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl StoredUser {
    pub fn new(
        email: impl Into<String>,
        nickname: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            nickname: nickname.into(),
            password_hash: password_hash.into(),
            subscribers: BTreeSet::new(),
            subscriptions: BTreeSet::new(),
            created_at: Utc::now(),
        }
    }
}

/// In-memory user store with unique email/nickname indexes.
#[derive(Default)]
pub struct UserStore {
    users: HashMap<String, StoredUser>,
    email_index: HashMap<String, String>,
    nickname_index: HashMap<String, String>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a new user.
    ///
    /// Uniqueness of email and nickname is enforced here, under the same
    /// write lock the caller already holds, so a racing signup cannot slip
    /// past an earlier availability probe.
    pub fn create(&mut self, user: StoredUser) -> StoreResult<()> {
        if self.email_index.contains_key(&user.email) {
            return Err(StoreError::EmailTaken);
        }
        if self.nickname_index.contains_key(&user.nickname) {
            return Err(StoreError::NicknameTaken);
        }

        self.email_index.insert(user.email.clone(), user.id.clone());
        self.nickname_index
            .insert(user.nickname.clone(), user.id.clone());
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn find_by_id(&self, id: &str) -> Option<StoredUser> {
        self.users.get(id).cloned()
    }

    pub fn find_by_nickname(&self, nickname: &str) -> Option<StoredUser> {
        self.nickname_index
            .get(nickname)
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<StoredUser> {
        self.email_index
            .get(email)
            .and_then(|id| self.users.get(id))
            .cloned()
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.email_index.contains_key(email)
    }

    pub fn nickname_taken(&self, nickname: &str) -> bool {
        self.nickname_index.contains_key(nickname)
    }

    /// Update nickname and/or password hash for an existing user.
    pub fn update_profile(
        &mut self,
        id: &str,
        nickname: Option<String>,
        password_hash: Option<String>,
    ) -> StoreResult<()> {
        if !self.users.contains_key(id) {
            return Err(StoreError::NotFound("user".to_string()));
        }

        if let Some(new_nickname) = nickname {
            match self.nickname_index.get(&new_nickname) {
                Some(owner) if owner != id => return Err(StoreError::NicknameTaken),
                _ => {}
            }

            if let Some(user) = self.users.get_mut(id) {
                self.nickname_index.remove(&user.nickname);
                self.nickname_index
                    .insert(new_nickname.clone(), id.to_string());
                user.nickname = new_nickname;
            }
        }

        if let Some(new_hash) = password_hash {
            if let Some(user) = self.users.get_mut(id) {
                user.password_hash = new_hash;
            }
        }

        Ok(())
    }

    /// Delete a user and prune its id from every other user's relation sets.
    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        let Some(removed) = self.users.remove(id) else {
            return Err(StoreError::NotFound("user".to_string()));
        };

        self.email_index.remove(&removed.email);
        self.nickname_index.remove(&removed.nickname);

        for user in self.users.values_mut() {
            user.subscribers.remove(id);
            user.subscriptions.remove(id);
        }

        Ok(())
    }

    /// Add a follow relation from `self_id` to the user named `target_nickname`.
    ///
    /// Both sides of the relation are written in this single call.
    /// Re-subscribing is a no-op success.
    pub fn subscribe(&mut self, self_id: &str, target_nickname: &str) -> StoreResult<()> {
        let target_id = self
            .nickname_index
            .get(target_nickname)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))?;

        if target_id == self_id {
            return Err(StoreError::SelfSubscribe);
        }

        if !self.users.contains_key(self_id) {
            return Err(StoreError::NotFound("user".to_string()));
        }

        // Both users verified present; the dual write cannot partially fail.
        if let Some(me) = self.users.get_mut(self_id) {
            me.subscriptions.insert(target_id.clone());
        }
        if let Some(target) = self.users.get_mut(&target_id) {
            target.subscribers.insert(self_id.to_string());
        }

        Ok(())
    }

    /// Remove the follow relation from `self_id` to `target_nickname`.
    ///
    /// Removing a relation that does not exist is a no-op success.
    pub fn unsubscribe(&mut self, self_id: &str, target_nickname: &str) -> StoreResult<()> {
        let target_id = self
            .nickname_index
            .get(target_nickname)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("user".to_string()))?;

        if !self.users.contains_key(self_id) {
            return Err(StoreError::NotFound("user".to_string()));
        }

        if let Some(me) = self.users.get_mut(self_id) {
            me.subscriptions.remove(&target_id);
        }
        if let Some(target) = self.users.get_mut(&target_id) {
            target.subscribers.remove(self_id);
        }

        Ok(())
    }

    /// Resolve a set of user ids to their current nicknames.
    ///
    /// Ids without a live account are skipped.
    pub fn nicknames(&self, ids: &BTreeSet<String>) -> Vec<String> {
        ids.iter()
            .filter_map(|id| self.users.get(id))
            .map(|user| user.nickname.clone())
            .collect()
    }
}
