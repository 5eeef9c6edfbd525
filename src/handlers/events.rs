// src/handlers/events.rs

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
    models::events::{EventoPayload, Evento, EventoCriado, FeedbackPayload},
};

// GET /api/events
#[utoipa::path(
    get,
    path = "/api/events",
    tag = "Eventos",
    responses(
        (status = 200, description = "Eventos no escopo do usuário, mais recentes primeiro", body = Vec<Evento>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_events(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Evento>>, AppError> {
    let eventos = app_state.events_service.list(&user).await?;
    Ok(Json(eventos))
}

// POST /api/events
#[utoipa::path(
    post,
    path = "/api/events",
    tag = "Eventos",
    request_body = EventoPayload,
    responses(
        (status = 201, description = "Evento criado", body = EventoCriado),
        (status = 400, description = "Campos ou período inválidos"),
        (status = 403, description = "Supervisor fora da hierarquia do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<EventoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let criado = app_state.events_service.create(&user, &payload).await?;

    Ok((StatusCode::CREATED, Json(criado)))
}

// GET /api/events/{id}
#[utoipa::path(
    get,
    path = "/api/events/{id}",
    tag = "Eventos",
    params(
        ("id" = Uuid, Path, description = "ID do evento")
    ),
    responses(
        (status = 200, description = "Evento", body = Evento),
        (status = 403, description = "Evento fora do escopo do usuário"),
        (status = 404, description = "Evento não encontrado (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Evento>, AppError> {
    let evento = app_state.events_service.get(&user, id).await?;
    Ok(Json(evento))
}

// PUT /api/events/{id}
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    tag = "Eventos",
    request_body = EventoPayload,
    params(
        ("id" = Uuid, Path, description = "ID do evento")
    ),
    responses(
        (status = 200, description = "Evento atualizado"),
        (status = 400, description = "Campos ou período inválidos"),
        (status = 403, description = "Evento ou novo supervisor fora da hierarquia do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    app_state.events_service.update(&user, id, &payload).await?;

    Ok(Json(json!({ "message": "Evento atualizado com sucesso" })))
}

// PATCH /api/events/{id}/feedback
#[utoipa::path(
    patch,
    path = "/api/events/{id}/feedback",
    tag = "Eventos",
    request_body = FeedbackPayload,
    params(
        ("id" = Uuid, Path, description = "ID do evento")
    ),
    responses(
        (status = 200, description = "Tratativa do evento atualizada"),
        (status = 403, description = "Evento fora do escopo do usuário"),
        (status = 404, description = "Evento não encontrado (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn update_feedback(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<impl IntoResponse, AppError> {
    app_state.events_service
        .update_feedback(&user, id, &payload.tratativa)
        .await?;

    Ok(Json(json!({ "message": "Tratativa atualizada com sucesso" })))
}

// DELETE /api/events/{id}
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    tag = "Eventos",
    params(
        ("id" = Uuid, Path, description = "ID do evento")
    ),
    responses(
        (status = 204, description = "Evento removido"),
        (status = 403, description = "Evento fora do escopo do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn delete_event(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.events_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
