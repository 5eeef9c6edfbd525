// src/handlers/pontos_ativos.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::pontos_ativos::{CreateTratativaPontoPayload, TratativaPontoAtivo, TratativaPontoFiltro},
};

// POST /api/tratativas-pontos-ativos
#[utoipa::path(
    post,
    path = "/api/tratativas-pontos-ativos",
    tag = "Pontos Ativos",
    request_body = CreateTratativaPontoPayload,
    responses(
        (status = 201, description = "Tratativa registrada", body = TratativaPontoAtivo),
        (status = 400, description = "Campos inválidos"),
        (status = 403, description = "Loja fora do escopo do usuário")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn create_tratativa_ponto(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateTratativaPontoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tratativa = app_state.tratativas_pontos_service.registrar(&user, &payload).await?;

    Ok((StatusCode::CREATED, Json(tratativa)))
}

// GET /api/tratativas-pontos-ativos
#[utoipa::path(
    get,
    path = "/api/tratativas-pontos-ativos",
    tag = "Pontos Ativos",
    params(TratativaPontoFiltro),
    responses(
        (status = 200, description = "Tratativas das lojas no escopo, mais recentes primeiro", body = Vec<TratativaPontoAtivo>)
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_tratativas_pontos(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filtro): Query<TratativaPontoFiltro>,
) -> Result<Json<Vec<TratativaPontoAtivo>>, AppError> {
    let tratativas = app_state.tratativas_pontos_service.list(&user, &filtro).await?;
    Ok(Json(tratativas))
}

// GET /api/tratativas-pontos-ativos/{chave_loja}
#[utoipa::path(
    get,
    path = "/api/tratativas-pontos-ativos/{chave_loja}",
    tag = "Pontos Ativos",
    params(
        ("chave_loja" = i64, Path, description = "Chave da loja")
    ),
    responses(
        (status = 200, description = "Histórico de tratativas da loja", body = Vec<TratativaPontoAtivo>),
        (status = 403, description = "Loja fora do escopo do usuário"),
        (status = 404, description = "Loja não encontrada (apenas admin)")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn list_tratativas_da_loja(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(chave_loja): Path<i64>,
) -> Result<Json<Vec<TratativaPontoAtivo>>, AppError> {
    let tratativas = app_state.tratativas_pontos_service.historico(&user, chave_loja).await?;
    Ok(Json(tratativas))
}
