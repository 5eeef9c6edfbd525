// src/models/estrategia.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::common::error::AppError;
#[cfg(test)]
use crate::models::hierarchy::LojaKeys;

// --- PRODUTOS ---

/// Produto (estratégia) acompanhado no painel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Produto {
    Credito,
    AberturaConta,
    Seguro,
    PontosAtivos,
    PontosRealizandoNegocio,
    PontosBloqueados,
}

/// De onde vêm as contagens mensais de cada produto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FonteMetrica {
    Contas,
    Ativo,
    SomenteLojas,
}

impl Produto {
    pub fn from_slug(slug: &str) -> Result<Self, AppError> {
        match slug {
            "credito" => Ok(Produto::Credito),
            "abertura-conta" => Ok(Produto::AberturaConta),
            "seguro" => Ok(Produto::Seguro),
            "pontos-ativos" => Ok(Produto::PontosAtivos),
            "pontos-realizando-negocio" => Ok(Produto::PontosRealizandoNegocio),
            "pontos-bloqueados" => Ok(Produto::PontosBloqueados),
            _ => Err(AppError::InvalidInput("Produto não reconhecido".into())),
        }
    }

    pub fn fonte(&self) -> FonteMetrica {
        match self {
            Produto::Credito | Produto::AberturaConta | Produto::Seguro => FonteMetrica::Contas,
            Produto::PontosAtivos => FonteMetrica::Ativo,
            Produto::PontosRealizandoNegocio | Produto::PontosBloqueados => FonteMetrica::SomenteLojas,
        }
    }

    /// Só produtos com tabela mensal própria têm métricas agregadas.
    pub fn tem_metricas(&self) -> bool {
        !matches!(self.fonte(), FonteMetrica::SomenteLojas)
    }
}

// --- CONTAGENS MENSAIS E TENDÊNCIA ---

/// Contagens de M3 (mais antigo) a M0 (mês atual). Ausente ou negativo vira 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthlyCounts {
    pub m3: u32,
    pub m2: u32,
    pub m1: u32,
    pub m0: u32,
}

impl MonthlyCounts {
    pub fn new(m3: u32, m2: u32, m1: u32, m0: u32) -> Self {
        Self { m3, m2, m1, m0 }
    }

    pub fn from_raw(m3: Option<i32>, m2: Option<i32>, m1: Option<i32>, m0: Option<i32>) -> Self {
        fn sanitize(value: Option<i32>) -> u32 {
            value.and_then(|v| u32::try_from(v).ok()).unwrap_or(0)
        }

        Self {
            m3: sanitize(m3),
            m2: sanitize(m2),
            m1: sanitize(m1),
            m0: sanitize(m0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TrendTag {
    Queda,
    Atencao,
    Comecando,
    Estavel,
}

// --- SITUAÇÃO DA LOJA ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LojaSituacao {
    Ativa,
    Bloqueada,
    Encerrando,
    Inativa,
}

impl LojaSituacao {
    pub fn from_db(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return LojaSituacao::Ativa;
        };
        let normalized = raw.trim().to_lowercase();

        if normalized.starts_with("bloque") {
            LojaSituacao::Bloqueada
        } else if normalized.starts_with("encerr") {
            LojaSituacao::Encerrando
        } else if normalized.starts_with("inativ")
            || normalized == "inoperante"
            || normalized == "equip_retirada"
        {
            LojaSituacao::Inativa
        } else {
            LojaSituacao::Ativa
        }
    }
}

// --- LINHA DO BANCO ---

/// Loja com as contagens do produto. Todas as consultas de estratégia
/// devolvem esse mesmo formato (colunas ausentes vêm nulas).
#[derive(Debug, Clone, Default, FromRow)]
pub struct LojaMetricRow {
    pub chave_loja: i64,
    pub cnpj: Option<String>,
    pub nome_loja: Option<String>,
    pub situacao: Option<String>,
    pub categoria: Option<String>,
    pub endereco: Option<String>,
    pub telefone_padrao: Option<String>,
    pub gte_resp_loja: Option<String>,
    pub dt_inauguracao: Option<NaiveDate>,
    pub dt_ult_transacao: Option<NaiveDate>,
    pub dt_ult_ab_conta: Option<NaiveDate>,
    pub dt_bloqueio: Option<NaiveDate>,
    pub motivo_bloqueio: Option<String>,
    pub dias_inoperantes: Option<i32>,
    pub municipio: Option<String>,
    pub uf: Option<String>,
    pub cod_ag_relacionamento: Option<String>,
    pub ag_relacionamento: Option<String>,
    pub dir_regional: Option<String>,
    pub ger_regional: Option<String>,
    pub chave_supervisao: Option<i64>,
    pub desc_supervisao: Option<String>,
    pub nome_supervisor: Option<String>,
    pub chave_coordenacao: Option<i64>,
    pub desc_coordenacao: Option<String>,
    pub chave_gerencia_area: Option<i64>,
    pub desc_gerencia_area: Option<String>,
    pub saldo_cx: Option<Decimal>,
    pub limite: Option<Decimal>,
    pub mes_m3: Option<i32>,
    pub mes_m2: Option<i32>,
    pub mes_m1: Option<i32>,
    pub mes_m0: Option<i32>,
}

impl LojaMetricRow {
    pub fn counts(&self) -> MonthlyCounts {
        MonthlyCounts::from_raw(self.mes_m3, self.mes_m2, self.mes_m1, self.mes_m0)
    }

    #[cfg(test)]
    pub fn keys(&self) -> LojaKeys {
        LojaKeys {
            chave_gerencia_area: self.chave_gerencia_area,
            chave_coordenacao: self.chave_coordenacao,
            chave_supervisao: self.chave_supervisao,
        }
    }
}

// --- RESPOSTAS ---

// Linha analítica exibida na tabela de drill-down
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LojaAnalitica {
    #[schema(example = "123456")]
    pub chave_loja: String,
    pub cnpj: String,
    pub nome_loja: String,
    pub mes_m3: u32,
    pub mes_m2: u32,
    pub mes_m1: u32,
    pub mes_m0: u32,
    pub tendencia: TrendTag,
    pub situacao: LojaSituacao,
    pub categoria: Option<String>,
    pub data_ult_trx_contabil: Option<NaiveDate>,
    pub data_ult_trx_negocio: Option<NaiveDate>,
    pub data_inauguracao: Option<NaiveDate>,
    pub data_bloqueio: Option<NaiveDate>,
    pub motivo_bloqueio: Option<String>,
    pub agencia: String,
    pub nome_agencia: String,
    pub telefone_loja: String,
    pub nome_contato: String,
    pub endereco: String,
    pub municipio: String,
    pub uf: String,
    pub diretoria_regional: String,
    pub gerencia_regional: String,
    pub gerente_area: String,
    pub coordenador: String,
    pub supervisor: String,
    pub saldo_cx: Option<Decimal>,
    pub limite: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EstrategiaResponse {
    pub produto: Produto,
    pub user_role: String,
    pub user_chave: Option<i64>,
    pub total_lojas: usize,
    pub dados_analiticos: Vec<LojaAnalitica>,
}

/// Quantidade de lojas em cada faixa de tendência.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendTally {
    pub comecando: u64,
    pub estavel: u64,
    pub atencao: u64,
    pub queda: u64,
}

impl TrendTally {
    pub fn record(&mut self, tag: TrendTag) {
        match tag {
            TrendTag::Queda => self.queda += 1,
            TrendTag::Atencao => self.atencao += 1,
            TrendTag::Comecando => self.comecando += 1,
            TrendTag::Estavel => self.estavel += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.comecando + self.estavel + self.atencao + self.queda
    }
}

// Métricas agregadas sobre as lojas do escopo
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub total_contas_m0: u64,
    pub total_contas_m1: u64,
    pub variacao_total: i64,

    pub total_lojas: u64,
    pub lojas_com_producao_m0: u64,
    pub lojas_com_producao_m1: u64,

    pub lojas_que_zeraram: u64,
    pub lojas_novas: u64,
    pub lojas_que_voltaram: u64,
    pub lojas_estaveis_ativas: u64,
    pub lojas_queda_producao: u64,
    pub lojas_sem_movimento: u64,

    pub crescimento_percentual: f64,
    pub produtividade_geral: f64,
    pub media_por_loja: u64,

    pub tendencias: TrendTally,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricasResponse {
    #[serde(flatten)]
    pub metricas: AggregateMetrics,
    pub produto: Produto,
    pub user_role: String,
    pub user_chave: Option<i64>,
}

// Roll-up por supervisão (visão gerencial): o mesmo agregado do escopo, mais a
// divisão simples de M0 contra M1
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorMetricas {
    #[serde(flatten)]
    pub agregado: AggregateMetrics,
    pub lojas_cresceram: u64,
    pub lojas_cairam: u64,
    pub lojas_estaveis: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorRollup {
    pub descricao: Option<String>,
    pub chave_supervisao: Option<i64>,
    pub nome_supervisor: Option<String>,
    pub metricas: SupervisorMetricas,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricasGerenciaisResponse {
    pub produto: Produto,
    pub user_role: String,
    pub user_chave: Option<i64>,
    pub metricas_gerenciais: Vec<SupervisorRollup>,
}

// --- CASCATA DE PONTOS ATIVOS ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Variacao {
    pub key: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct BloqueioMotivo {
    pub motivo: String,
    pub quantidade: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DiasInoperantes {
    pub dias: i32,
    pub quantidade: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CascataPontosAtivos {
    pub total_m1: u64,
    pub total_m0: u64,
    pub variacoes_negativas: Vec<Variacao>,
    pub variacoes_positivas: Vec<Variacao>,
    pub manteve: u64,
    pub dados_bloqueios: Vec<BloqueioMotivo>,
    pub dados_dias_inoperantes: Vec<DiasInoperantes>,
    pub total_lojas: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_default_missing_and_negative_to_zero() {
        let counts = MonthlyCounts::from_raw(None, Some(-4), Some(7), None);
        assert_eq!(counts, MonthlyCounts::new(0, 0, 7, 0));
    }

    #[test]
    fn produto_slugs_round_trip_through_serde() {
        let produto = Produto::from_slug("abertura-conta").unwrap();
        assert_eq!(produto, Produto::AberturaConta);
        assert_eq!(serde_json::to_value(produto).unwrap(), "abertura-conta");
        assert!(Produto::from_slug("consorcio").is_err());
        assert!(!Produto::PontosBloqueados.tem_metricas());
    }

    #[test]
    fn situacao_normalizes_known_labels() {
        assert_eq!(LojaSituacao::from_db(None), LojaSituacao::Ativa);
        assert_eq!(LojaSituacao::from_db(Some("BLOQUEADO")), LojaSituacao::Bloqueada);
        assert_eq!(LojaSituacao::from_db(Some("Encerrando")), LojaSituacao::Encerrando);
        assert_eq!(LojaSituacao::from_db(Some("INOPERANTE")), LojaSituacao::Inativa);
        assert_eq!(LojaSituacao::from_db(Some("MANTEVE")), LojaSituacao::Ativa);
        // Categorias de pontos ativos
        assert_eq!(LojaSituacao::from_db(Some("ENCERRADO")), LojaSituacao::Encerrando);
        assert_eq!(LojaSituacao::from_db(Some("EQUIP_RETIRADA")), LojaSituacao::Inativa);
    }
}
