// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

//! Recipe endpoints.
//!
//! Deletion is the guarded path: it runs strictly after the session guard
//! and re-checks ownership against the store before touching anything.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    auth::Auth,
    error::ApiError,
    models::{CreateRecipeRequest, MessageResponse, RecipeResponse},
    state::AppState,
    storage::{OwnershipCheck, StoreError, StoredRecipe},
};

/// Publish a new recipe owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/recipes",
    request_body = CreateRecipeRequest,
    tag = "Recipes",
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Missing title or body", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = MessageResponse),
    )
)]
pub async fn create_recipe(
    Auth(user): Auth,
    State(state): State<AppState>,
    Json(request): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), ApiError> {
    if request.title.trim().is_empty() {
        return Err(ApiError::bad_request("Recipe title is required."));
    }
    if request.body.trim().is_empty() {
        return Err(ApiError::bad_request("Recipe body is required."));
    }

    let recipe = StoredRecipe::new(user.user_id, request.title, request.body);
    let author = state
        .users
        .read()
        .await
        .find_by_id(&recipe.owner_user_id)
        .map(|u| u.nickname);

    let response = RecipeResponse {
        id: recipe.id.clone(),
        author,
        title: recipe.title.clone(),
        body: recipe.body.clone(),
        created_at: recipe.created_at,
    };

    state.recipes.write().await.create(recipe).map_err(|e| {
        tracing::error!(error = %e, "recipe creation failed");
        ApiError::internal("Internal server error.")
    })?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Fetch a single recipe.
#[utoipa::path(
    get,
    path = "/recipes/{id}",
    params(("id" = String, Path, description = "Recipe identifier")),
    tag = "Recipes",
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "No such recipe", body = MessageResponse),
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, ApiError> {
    let recipe = state
        .recipes
        .read()
        .await
        .get(&id)
        .ok_or_else(|| ApiError::not_found("Recipe not found."))?;

    let author = state
        .users
        .read()
        .await
        .find_by_id(&recipe.owner_user_id)
        .map(|u| u.nickname);

    Ok(Json(RecipeResponse {
        id: recipe.id,
        author,
        title: recipe.title,
        body: recipe.body,
        created_at: recipe.created_at,
    }))
}

/// Delete a recipe. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/recipes/{id}",
    params(("id" = String, Path, description = "Recipe identifier")),
    tag = "Recipes",
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 400, description = "Invalid id or not the author", body = MessageResponse),
        (status = 404, description = "No such recipe", body = MessageResponse),
        (status = 500, description = "Storage failure", body = MessageResponse),
    )
)]
pub async fn delete_recipe(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    if Uuid::parse_str(&id).is_err() {
        return Err(ApiError::bad_request("Invalid recipe id."));
    }

    // Hold the write lock across check and delete so the ownership decision
    // cannot go stale.
    let mut recipes = state.recipes.write().await;

    recipes.get(&id).verify_owner(&user).map_err(|e| match e {
        StoreError::NotFound(_) => ApiError::not_found("Recipe not found."),
        StoreError::PermissionDenied { .. } => {
            ApiError::bad_request("Only the author may delete this recipe.")
        }
        other => {
            tracing::error!(error = %other, "ownership check failed");
            ApiError::internal("Internal server error.")
        }
    })?;

    recipes.delete(&id).map_err(|e| {
        tracing::error!(error = %e, "recipe deletion failed");
        ApiError::internal("Internal server error.")
    })?;

    tracing::info!(recipe_id = %id, user_id = %user.user_id, "recipe deleted");
    Ok(Json(MessageResponse::new("recipe deleted")))
}
