// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Tastebook

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

/// Health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Health check endpoint handler.
///
/// The service has no external dependencies beyond its own process, so a
/// running process is a healthy one.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is healthy", body = HealthResponse))
)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
