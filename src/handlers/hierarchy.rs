// src/handlers/hierarchy.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{Administrador, RequireRole},
    models::hierarchy::DirectEdgesReport,
};

// POST /api/hierarchy/direct-edges
#[utoipa::path(
    post,
    path = "/api/hierarchy/direct-edges",
    tag = "Hierarchy",
    responses(
        (status = 200, description = "Arestas diretas gerente → supervisor criadas", body = DirectEdgesReport),
        (status = 403, description = "Apenas administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn materialize_direct_edges(
    State(app_state): State<AppState>,
    _: RequireRole<Administrador>,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.hierarchy_service.materialize_direct_edges().await?;

    Ok((StatusCode::OK, Json(report)))
}
