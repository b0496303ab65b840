// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::session_guard,
    models::{
        CreateRecipeRequest, EmailAvailabilityRequest, MessageResponse,
        NicknameAvailabilityRequest, ProfileResponse, RecipeResponse, SigninRequest,
        SignupRequest, UpdateProfileRequest,
    },
    state::AppState,
};

pub mod health;
pub mod recipes;
pub mod users;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/users/signup", post(users::signup))
        .route("/users/signin", post(users::signin))
        .route("/users/signout", post(users::signout))
        .route(
            "/users",
            delete(users::delete_account).patch(users::update_profile),
        )
        .route("/users/nickname", post(users::nickname_availability))
        .route("/users/email", post(users::email_availability))
        .route("/users/subscribe/{nickname}", post(users::subscribe))
        .route("/users/unsubscribe/{nickname}", post(users::unsubscribe))
        .route("/users/{nickname}", get(users::get_profile))
        .route("/recipes", post(recipes::create_recipe))
        .route(
            "/recipes/{id}",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
        .route("/health", get(health::health))
        .layer(middleware::from_fn_with_state(state.clone(), session_guard))
        .with_state(state);

    routes
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::signup,
        users::signin,
        users::signout,
        users::delete_account,
        users::get_profile,
        users::update_profile,
        users::subscribe,
        users::unsubscribe,
        users::nickname_availability,
        users::email_availability,
        recipes::create_recipe,
        recipes::get_recipe,
        recipes::delete_recipe,
        health::health
    ),
    components(
        schemas(
            MessageResponse,
            SignupRequest,
            SigninRequest,
            UpdateProfileRequest,
            ProfileResponse,
            NicknameAvailabilityRequest,
            EmailAvailabilityRequest,
            CreateRecipeRequest,
            RecipeResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "Accounts, sessions and subscriptions"),
        (name = "Recipes", description = "Recipe posts"),
        (name = "Health", description = "Service health")
    )
)]
struct ApiDoc;
