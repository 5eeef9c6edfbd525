// src/handlers/auth.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{AuthResponse, LoginUserPayload},
        hierarchy::UserSummary,
    },
};

// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login realizado", body = AuthResponse),
        (status = 400, description = "Campos inválidos"),
        (status = 401, description = "Funcional ou senha incorretos")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate()?;

    let response = app_state.auth_service
        .login_user(&payload.funcional, &payload.password)
        .await?;

    Ok(Json(response))
}

// GET /api/auth/validate
#[utoipa::path(
    get,
    path = "/api/auth/validate",
    tag = "Auth",
    responses(
        (status = 200, description = "Token válido; devolve o usuário atual", body = UserSummary),
        (status = 401, description = "Token inválido ou ausente")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn validate(AuthenticatedUser(user): AuthenticatedUser) -> Json<UserSummary> {
    Json(user.summary())
}
