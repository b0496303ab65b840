// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Recipe store.
//!
//! Each recipe carries an immutable owner reference set at creation; the
//! delete path checks it through the [`OwnedResource`] machinery before any
//! mutation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ownership::OwnedResource;
use super::{StoreError, StoreResult};

/// A recipe post as held by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecipe {
    /// Unique recipe identifier (UUID).
    pub id: String,
    /// Id of the authoring user. Immutable after creation.
    pub owner_user_id: String,
    /// Recipe title.
    pub title: String,
    /// Recipe body.
    pub body: String,
    /// When the recipe was published.
    pub created_at: DateTime<Utc>,
}

impl StoredRecipe {
    pub fn new(
        owner_user_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            owner_user_id: owner_user_id.into(),
            title: title.into(),
            body: body.into(),
            created_at: Utc::now(),
        }
    }
}

impl OwnedResource for StoredRecipe {
    fn owner_user_id(&self) -> &str {
        &self.owner_user_id
    }

    fn kind(&self) -> &'static str {
        "recipe"
    }
}

/// In-memory recipe store.
#[derive(Default)]
pub struct RecipeStore {
    recipes: HashMap<String, StoredRecipe>,
}

impl RecipeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, recipe: StoredRecipe) -> StoreResult<()> {
        if self.recipes.contains_key(&recipe.id) {
            return Err(StoreError::AlreadyExists(format!("recipe {}", recipe.id)));
        }
        self.recipes.insert(recipe.id.clone(), recipe);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<StoredRecipe> {
        self.recipes.get(id).cloned()
    }

    pub fn delete(&mut self, id: &str) -> StoreResult<()> {
        if self.recipes.remove(id).is_some() {
            Ok(())
        } else {
            Err(StoreError::NotFound("recipe".to_string()))
        }
    }
}
