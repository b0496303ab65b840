// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::auth::TokenService;
use crate::config::{Config, DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS};
use crate::storage::{RecipeStore, UserStore};

/// Shared application state.
///
/// The token service is read-only after construction; the stores are the
/// only shared mutable resources and sit behind their own locks.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<RwLock<UserStore>>,
    pub recipes: Arc<RwLock<RecipeStore>>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            users: Arc::new(RwLock::new(UserStore::new())),
            recipes: Arc::new(RwLock::new(RecipeStore::new())),
            tokens: Arc::new(tokens),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(TokenService::new(
            &config.token_secret,
            config.access_ttl_secs,
            config.refresh_ttl_secs,
        ))
    }
}

impl Default for AppState {
    /// State with a throwaway signing secret; for tests and local tinkering.
    fn default() -> Self {
        Self::new(TokenService::new(
            "insecure-dev-secret",
            DEFAULT_ACCESS_TTL_SECS,
            DEFAULT_REFRESH_TTL_SECS,
        ))
    }
}
