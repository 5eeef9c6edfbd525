// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Administrador, RequireRole},
    },
    models::hierarchy::UserSummary,
};

// GET /api/users/me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Usuário autenticado", body = UserSummary),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserSummary> {
    Json(user.summary())
}

// GET /api/users/{id}/subordinates
#[utoipa::path(
    get,
    path = "/api/users/{id}/subordinates",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Subordinados diretos", body = Vec<UserSummary>),
        (status = 403, description = "Usuário fora da hierarquia do chamador")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_subordinates(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let subordinados = app_state.hierarchy_service
        .visible_subordinates(user.id, user.role(), id)
        .await?;

    Ok(Json(subordinados))
}

// GET /api/users/{id}/supervisors
#[utoipa::path(
    get,
    path = "/api/users/{id}/supervisors",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do gerente ou coordenador")
    ),
    responses(
        (status = 200, description = "Supervisores sob o usuário (diretos ou via coordenador)", body = Vec<UserSummary>),
        (status = 403, description = "Usuário fora da hierarquia ou sem supervisores vinculados")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_supervisors(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let supervisores = app_state.hierarchy_service
        .visible_supervisors(user.id, user.role(), id)
        .await?;

    Ok(Json(supervisores))
}

// GET /api/users/all
#[utoipa::path(
    get,
    path = "/api/users/all",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários", body = Vec<UserSummary>),
        (status = 403, description = "Apenas administradores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_all_users(
    State(app_state): State<AppState>,
    _: RequireRole<Administrador>,
) -> Result<Json<Vec<UserSummary>>, AppError> {
    let users = app_state.hierarchy_service.all_users().await?;
    Ok(Json(users))
}

// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Dados do usuário", body = UserSummary),
        (status = 403, description = "Usuário fora da hierarquia do chamador"),
        (status = 404, description = "Usuário não encontrado (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, AppError> {
    let alvo = app_state.hierarchy_service
        .visible_user(user.id, user.role(), id)
        .await?;

    Ok(Json(alvo))
}

// GET /api/users/{id}/superior
#[utoipa::path(
    get,
    path = "/api/users/{id}/superior",
    tag = "Users",
    params(
        ("id" = Uuid, Path, description = "ID do usuário")
    ),
    responses(
        (status = 200, description = "Superior imediato", body = UserSummary),
        (status = 403, description = "Usuário fora da hierarquia do chamador"),
        (status = 404, description = "Usuário sem superior")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_superior(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserSummary>, AppError> {
    let superior = app_state.hierarchy_service
        .visible_superior(user.id, user.role(), id)
        .await?;

    Ok(Json(superior))
}
