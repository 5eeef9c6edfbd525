// src/models/events.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Evento {
    pub id: Uuid,
    pub titulo: String,
    pub descricao: String,
    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,
    pub tipo: String,
    pub location: String,
    pub municipio: String,
    pub uf: String,
    pub tratativa: String,
    pub supervisor_id: Uuid,
    pub supervisor_name: Option<String>,
    pub creator_id: Uuid,
    // Preenchido pelo serviço a partir do chamador
    #[sqlx(default)]
    pub is_owner: bool,
}

// Corpo da criação (POST) e da edição (PUT) de eventos
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventoPayload {
    #[validate(length(min = 1, max = 200, message = "O título é obrigatório (até 200 caracteres)."))]
    #[schema(example = "Visita ao correspondente")]
    pub titulo: String,

    #[serde(default)]
    pub descricao: String,

    pub data_inicio: DateTime<Utc>,
    pub data_fim: DateTime<Utc>,

    #[validate(length(min = 1, message = "O tipo do evento é obrigatório."))]
    #[schema(example = "visita")]
    pub tipo: String,

    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub municipio: String,

    #[validate(length(max = 2, message = "A UF deve ter 2 caracteres."))]
    #[serde(default)]
    pub uf: String,

    // Gestores podem agendar para um supervisor da sua hierarquia
    pub supervisor_id: Option<Uuid>,

    // Só na edição; ausente mantém a tratativa atual
    pub tratativa: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    #[serde(default)]
    pub tratativa: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventoCriado {
    pub id: Uuid,
    pub supervisor_id: Uuid,
}
