// src/handlers/hotlist.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
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
    models::hotlist::{
        CreateTratativaPayload, HotlistItem, HotlistSummary, TratativaHotlist, UpdateHotlistPayload,
    },
};

// GET /api/hotlist
#[utoipa::path(
    get,
    path = "/api/hotlist",
    tag = "Hotlist",
    responses(
        (status = 200, description = "Leads no escopo do usuário", body = Vec<HotlistItem>),
        (status = 401, description = "Não autorizado")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_hotlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<HotlistItem>>, AppError> {
    let items = app_state.hotlist_service.list(&user).await?;
    Ok(Json(items))
}

// GET /api/hotlist/summary
#[utoipa::path(
    get,
    path = "/api/hotlist/summary",
    tag = "Hotlist",
    responses(
        (status = 200, description = "Total de leads e pendentes", body = HotlistSummary)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_summary(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<HotlistSummary>, AppError> {
    let summary = app_state.hotlist_service.summary(&user).await?;
    Ok(Json(summary))
}

// PATCH /api/hotlist/{id}
#[utoipa::path(
    patch,
    path = "/api/hotlist/{id}",
    tag = "Hotlist",
    request_body = UpdateHotlistPayload,
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    ),
    responses(
        (status = 200, description = "Situação atualizada"),
        (status = 403, description = "Lead fora do escopo do usuário"),
        (status = 404, description = "Lead não encontrado (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_hotlist(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateHotlistPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.hotlist_service
        .update_situacao(&user, id, payload.situacao)
        .await?;

    Ok(Json(json!({ "message": "Item atualizado com sucesso" })))
}

// POST /api/hotlist/tratativa
#[utoipa::path(
    post,
    path = "/api/hotlist/tratativa",
    tag = "Hotlist",
    request_body = CreateTratativaPayload,
    responses(
        (status = 201, description = "Tratativa registrada e lead atualizado", body = TratativaHotlist),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Lead fora do escopo do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_tratativa(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTratativaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tratativa = app_state.hotlist_service
        .registrar_tratativa(&user, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(tratativa)))
}

// GET /api/hotlist/{id}/tratativas
#[utoipa::path(
    get,
    path = "/api/hotlist/{id}/tratativas",
    tag = "Hotlist",
    params(
        ("id" = Uuid, Path, description = "ID do lead")
    ),
    responses(
        (status = 200, description = "Histórico de tratativas, mais recente primeiro", body = Vec<TratativaHotlist>),
        (status = 403, description = "Lead fora do escopo do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_tratativas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<TratativaHotlist>>, AppError> {
    let tratativas = app_state.hotlist_service.list_tratativas(&user, id).await?;
    Ok(Json(tratativas))
}
