// src/handlers/acoes.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::acoes::{AcaoDiaria, AcoesQuery, UpdateAcaoPayload},
};

// GET /api/acoes-diarias
#[utoipa::path(
    get,
    path = "/api/acoes-diarias",
    tag = "Ações Diárias",
    params(AcoesQuery),
    responses(
        (status = 200, description = "Ações do usuário, por prioridade e prazo", body = Vec<AcaoDiaria>),
        (status = 403, description = "Usuário fora da hierarquia do chamador")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_acoes(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<AcoesQuery>,
) -> Result<Json<Vec<AcaoDiaria>>, AppError> {
    let acoes = app_state.acoes_service.list(&user, query.user_id).await?;
    Ok(Json(acoes))
}

// GET /api/acoes-diarias/equipe
#[utoipa::path(
    get,
    path = "/api/acoes-diarias/equipe",
    tag = "Ações Diárias",
    responses(
        (status = 200, description = "Ações dos subordinados do usuário", body = Vec<AcaoDiaria>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_acoes_equipe(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<AcaoDiaria>>, AppError> {
    let acoes = app_state.acoes_service.equipe(&user).await?;
    Ok(Json(acoes))
}

// PATCH /api/acoes-diarias/{id}
#[utoipa::path(
    patch,
    path = "/api/acoes-diarias/{id}",
    tag = "Ações Diárias",
    request_body = UpdateAcaoPayload,
    params(
        ("id" = Uuid, Path, description = "ID da ação")
    ),
    responses(
        (status = 200, description = "Ação atualizada"),
        (status = 400, description = "Nenhum campo informado"),
        (status = 403, description = "Ação fora do escopo do usuário"),
        (status = 404, description = "Ação não encontrada (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_acao(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateAcaoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.acoes_service.update(&user, id, payload).await?;

    Ok(Json(json!({ "message": "Ação atualizada com sucesso" })))
}
