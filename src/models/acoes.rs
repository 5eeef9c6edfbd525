// src/models/acoes.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

// Ação diária de contato com uma loja, atribuída a um usuário
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AcaoDiaria {
    pub id: Uuid,
    #[schema(example = 123456)]
    pub chave_loja: i64,
    pub nome_loja: Option<String>,
    pub telefone: Option<String>,
    pub contato: Option<String>,
    pub user_id: Uuid,
    pub nome_usuario: Option<String>,
    pub qtd_contas_plataforma: Option<i32>,
    pub qtd_contas_legado: Option<i32>,
    pub agencia: Option<String>,
    #[schema(example = "em_andamento")]
    pub situacao: String,
    pub descricao_situacao: Option<String>,
    pub data_limite: Option<NaiveDate>,
    pub data_criacao: DateTime<Utc>,
    pub data_atualizacao: DateTime<Utc>,
    pub data_conclusao: Option<DateTime<Utc>>,
    pub observacoes: Option<String>,
    #[schema(example = "alta")]
    pub prioridade: String,
    pub tipo_acao: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AcaoSituacao {
    Pendente,
    EmAndamento,
    Concluido,
}

impl AcaoSituacao {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcaoSituacao::Pendente => "pendente",
            AcaoSituacao::EmAndamento => "em_andamento",
            AcaoSituacao::Concluido => "concluido",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAcaoPayload {
    pub situacao: Option<AcaoSituacao>,

    #[validate(length(max = 2000, message = "As observações devem ter até 2000 caracteres."))]
    pub observacoes: Option<String>,

    pub data_conclusao: Option<DateTime<Utc>>,
}

impl UpdateAcaoPayload {
    pub fn is_empty(&self) -> bool {
        self.situacao.is_none() && self.observacoes.is_none() && self.data_conclusao.is_none()
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AcoesQuery {
    // Ações de outro usuário da hierarquia; ausente é o próprio chamador
    pub user_id: Option<Uuid>,
}
