// src/models/pontos_ativos.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

pub const LIMITE_PADRAO: i64 = 100;
pub const LIMITE_MAXIMO: i64 = 500;

// Tratativa registrada para um ponto ativo (loja que parou de operar)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TratativaPontoAtivo {
    pub id: Uuid,
    pub chave_loja: i64,
    pub usuario_id: Uuid,
    pub nome_usuario: String,
    pub data_contato: NaiveDate,
    #[schema(example = "sim")]
    pub foi_tratado: String,
    pub descricao_tratativa: String,
    pub quando_volta_operar: NaiveDate,
    #[schema(example = "tratada")]
    pub situacao: String,
    pub tipo: String,
    pub data_registro: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FoiTratado {
    Sim,
    Nao,
}

impl FoiTratado {
    pub fn as_str(&self) -> &'static str {
        match self {
            FoiTratado::Sim => "sim",
            FoiTratado::Nao => "nao",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SituacaoTratativaPonto {
    #[default]
    Tratada,
    Pendente,
}

impl SituacaoTratativaPonto {
    pub fn as_str(&self) -> &'static str {
        match self {
            SituacaoTratativaPonto::Tratada => "tratada",
            SituacaoTratativaPonto::Pendente => "pendente",
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTratativaPontoPayload {
    #[schema(example = 123456)]
    pub chave_loja: i64,

    pub data_contato: NaiveDate,

    pub foi_tratado: FoiTratado,

    #[validate(length(min = 1, message = "A descrição da tratativa é obrigatória."))]
    pub descricao_tratativa: String,

    pub quando_volta_operar: NaiveDate,

    #[serde(default)]
    pub situacao: SituacaoTratativaPonto,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TratativaPontoFiltro {
    pub foi_tratado: Option<FoiTratado>,
    pub situacao: Option<SituacaoTratativaPonto>,
    pub data_inicio: Option<NaiveDate>,
    pub data_fim: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl TratativaPontoFiltro {
    /// Limite efetivo: padrão 100, entre 1 e 500.
    pub fn limite(&self) -> i64 {
        self.limit.unwrap_or(LIMITE_PADRAO).clamp(1, LIMITE_MAXIMO)
    }

    pub fn deslocamento(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_defaults_to_treated() {
        let payload: CreateTratativaPontoPayload = serde_json::from_str(
            r#"{"chaveLoja":1,"dataContato":"2025-03-10","foiTratado":"nao",
                "descricaoTratativa":"Sem sinal","quandoVoltaOperar":"2025-03-20"}"#,
        )
        .unwrap();

        assert_eq!(payload.situacao, SituacaoTratativaPonto::Tratada);
        assert_eq!(payload.foi_tratado, FoiTratado::Nao);
    }

    #[test]
    fn page_size_is_bounded() {
        assert_eq!(TratativaPontoFiltro::default().limite(), 100);
        let filtro = TratativaPontoFiltro { limit: Some(10_000), offset: Some(-3), ..Default::default() };
        assert_eq!(filtro.limite(), 500);
        assert_eq!(filtro.deslocamento(), 0);
    }
}
