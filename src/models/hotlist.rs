// src/models/hotlist.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Lead da hotlist, sempre vinculado a um supervisor responsável
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotlistItem {
    pub id: Uuid,
    pub supervisor_id: Uuid,
    pub supervisor_name: Option<String>,
    pub cnpj: Option<String>,
    pub nome_loja: Option<String>,
    pub localizacao: Option<String>,
    pub agencia: Option<String>,
    pub mercado: Option<String>,
    #[schema(example = "pendente")]
    pub situacao: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HotlistSituacao {
    Pendente,
    Tratada,
}

impl HotlistSituacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            HotlistSituacao::Pendente => "pendente",
            HotlistSituacao::Tratada => "tratada",
        }
    }
}

// Resultado informado na tratativa (valores enviados pela tela de tratativa)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResultadoTratativa {
    Realizada,
    Pendente,
}

impl ResultadoTratativa {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultadoTratativa::Realizada => "realizada",
            ResultadoTratativa::Pendente => "pendente",
        }
    }

    /// Situação que o lead assume depois da tratativa.
    pub fn situacao_do_lead(&self) -> HotlistSituacao {
        match self {
            ResultadoTratativa::Realizada => HotlistSituacao::Tratada,
            ResultadoTratativa::Pendente => HotlistSituacao::Pendente,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotlistPayload {
    pub situacao: HotlistSituacao,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTratativaPayload {
    pub hotlist_id: Uuid,

    #[validate(length(min = 1, message = "A descrição da tratativa é obrigatória."))]
    #[schema(example = "Visita realizada, cliente interessado em abertura de conta")]
    pub descricao: String,

    pub situacao: ResultadoTratativa,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TratativaHotlist {
    pub id: Uuid,
    pub hotlist_id: Uuid,
    pub user_id: Uuid,
    pub user_name: Option<String>,
    pub descricao: String,
    pub situacao: String,
    pub data_tratativa: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HotlistSummary {
    pub total_leads: i64,
    pub leads_pendentes: i64,
}
