// src/handlers/estrategia.rs

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Gestor, RequireRole},
    },
    models::estrategia::{
        CascataPontosAtivos, EstrategiaResponse, MetricasGerenciaisResponse, MetricasResponse, Produto,
    },
};

// GET /api/estrategia/{produto}
#[utoipa::path(
    get,
    path = "/api/estrategia/{produto}",
    tag = "Estratégia",
    params(
        ("produto" = String, Path, description = "credito | abertura-conta | seguro | pontos-ativos | pontos-realizando-negocio | pontos-bloqueados")
    ),
    responses(
        (status = 200, description = "Lojas do escopo com contagens mensais e tendência", body = EstrategiaResponse),
        (status = 400, description = "Produto não reconhecido"),
        (status = 403, description = "Usuário sem escopo hierárquico")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_estrategia(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(produto): Path<String>,
) -> Result<Json<EstrategiaResponse>, AppError> {
    let produto = Produto::from_slug(&produto)?;
    let response = app_state.estrategia_service.get_estrategia(&user, produto).await?;

    Ok(Json(response))
}

// GET /api/estrategia/{produto}/metricas
#[utoipa::path(
    get,
    path = "/api/estrategia/{produto}/metricas",
    tag = "Estratégia",
    params(
        ("produto" = String, Path, description = "Produto com contagens mensais (credito, abertura-conta, seguro, pontos-ativos)")
    ),
    responses(
        (status = 200, description = "Métricas agregadas do escopo", body = MetricasResponse),
        (status = 400, description = "Produto sem métricas"),
        (status = 403, description = "Usuário sem escopo hierárquico")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_metricas(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(produto): Path<String>,
) -> Result<Json<MetricasResponse>, AppError> {
    let produto = Produto::from_slug(&produto)?;
    let response = app_state.estrategia_service.get_metricas(&user, produto).await?;

    Ok(Json(response))
}

// GET /api/estrategia/{produto}/metricas-gerenciais
#[utoipa::path(
    get,
    path = "/api/estrategia/{produto}/metricas-gerenciais",
    tag = "Estratégia",
    params(
        ("produto" = String, Path, description = "Produto com contagens mensais")
    ),
    responses(
        (status = 200, description = "Roll-up por supervisão", body = MetricasGerenciaisResponse),
        (status = 403, description = "Apenas gerentes e coordenadores")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_metricas_gerenciais(
    State(app_state): State<AppState>,
    _: RequireRole<Gestor>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(produto): Path<String>,
) -> Result<Json<MetricasGerenciaisResponse>, AppError> {
    let produto = Produto::from_slug(&produto)?;
    let response = app_state.estrategia_service
        .get_metricas_gerenciais(&user, produto)
        .await?;

    Ok(Json(response))
}

// GET /api/pontos-ativos/cascata
#[utoipa::path(
    get,
    path = "/api/pontos-ativos/cascata",
    tag = "Estratégia",
    responses(
        (status = 200, description = "Cascata de pontos ativos (perdas, ganhos e manutenção)", body = CascataPontosAtivos),
        (status = 403, description = "Usuário sem escopo hierárquico")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_cascata(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<CascataPontosAtivos>, AppError> {
    let response = app_state.estrategia_service.get_cascata(&user).await?;

    Ok(Json(response))
}
