// src/db/estrategia_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::{
        estrategia::{FonteMetrica, LojaMetricRow, Produto},
        hierarchy::LojaFilter,
    },
};

/// Leitura das lojas de uma estratégia, já restritas pelo filtro hierárquico.
#[async_trait]
pub trait EstrategiaStore: Send + Sync {
    /// Linhas guiadas pela tabela mensal do produto (lojas sem contagem ficam de fora).
    async fn fetch_lojas(&self, produto: Produto, filter: LojaFilter) -> Result<Vec<LojaMetricRow>, AppError>;

    /// Linhas guiadas pela tabela de lojas (lojas sem contagem entram com zero).
    async fn fetch_lojas_por_supervisao(
        &self,
        produto: Produto,
        filter: LojaFilter,
    ) -> Result<Vec<LojaMetricRow>, AppError>;
}

// Colunas comuns vindas da estrutura de lojas
const LOJA_COLUMNS: &str = r#"
    l.cnpj, l.nome_loja, l.endereco, l.telefone_padrao, l.gte_resp_loja,
    l.dt_inauguracao, l.dt_bloqueio, l.motivo_bloqueio, l.municipio, l.uf,
    l.cod_ag_relacionamento, l.ag_relacionamento, l.dir_regional, l.ger_regional,
    l.chave_supervisao, l.desc_supervisao,
    l.chave_coordenacao, l.desc_coordenacao,
    l.chave_gerencia_area, l.desc_gerencia_area,
    l.saldo_cx, l.limite,
    (
        SELECT u.name FROM users u
        WHERE u.chave = l.chave_supervisao AND LOWER(u.role) = 'supervisor'
        ORDER BY u.name
        LIMIT 1
    ) AS nome_supervisor
"#;

// Em pontos ativos a situação exibida é a categoria do ponto no mês
fn situacao_column(fonte: FonteMetrica) -> &'static str {
    match fonte {
        FonteMetrica::Ativo => "COALESCE(m.categoria, l.situacao)",
        FonteMetrica::Contas | FonteMetrica::SomenteLojas => "l.situacao",
    }
}

fn metric_driven_select(fonte: FonteMetrica) -> String {
    let situacao = situacao_column(fonte);

    match fonte {
        FonteMetrica::Contas => format!(
            r#"
            SELECT
                m.chave_loja, {situacao} AS situacao, NULL::text AS categoria,
                l.dt_ult_transacao,
                COALESCE(m.dt_ult_ab_conta, l.dt_ult_transacao) AS dt_ult_ab_conta,
                NULL::integer AS dias_inoperantes,
                m.mes_m3, m.mes_m2, m.mes_m1, m.mes_m0,
                {LOJA_COLUMNS}
            FROM estr_contas m
            LEFT JOIN lojas l ON l.chave_loja = m.chave_loja
            "#
        ),
        FonteMetrica::Ativo => format!(
            r#"
            SELECT
                m.chave_loja, {situacao} AS situacao, m.categoria,
                COALESCE(m.dt_ult_transacao, l.dt_ult_transacao) AS dt_ult_transacao,
                NULL::date AS dt_ult_ab_conta,
                m.dias_inoperantes,
                m.mes_m3, m.mes_m2, m.mes_m1, m.mes_m0,
                {LOJA_COLUMNS}
            FROM estr_ativo m
            LEFT JOIN lojas l ON l.chave_loja = m.chave_loja
            "#
        ),
        FonteMetrica::SomenteLojas => format!(
            r#"
            SELECT
                l.chave_loja, {situacao} AS situacao, NULL::text AS categoria,
                l.dt_ult_transacao,
                NULL::date AS dt_ult_ab_conta,
                NULL::integer AS dias_inoperantes,
                NULL::integer AS mes_m3, NULL::integer AS mes_m2,
                NULL::integer AS mes_m1, NULL::integer AS mes_m0,
                {LOJA_COLUMNS}
            FROM lojas l
            "#
        ),
    }
}

fn store_driven_select(fonte: FonteMetrica) -> Result<String, AppError> {
    let (tabela, categoria, dias) = match fonte {
        FonteMetrica::Contas => ("estr_contas", "NULL::text", "NULL::integer"),
        FonteMetrica::Ativo => ("estr_ativo", "m.categoria", "m.dias_inoperantes"),
        FonteMetrica::SomenteLojas => {
            return Err(AppError::InvalidInput(
                "Métricas gerenciais não disponíveis para este produto".into(),
            ));
        }
    };

    let situacao = situacao_column(fonte);

    Ok(format!(
        r#"
        SELECT
            l.chave_loja, {situacao} AS situacao, {categoria} AS categoria,
            l.dt_ult_transacao,
            NULL::date AS dt_ult_ab_conta,
            {dias} AS dias_inoperantes,
            m.mes_m3, m.mes_m2, m.mes_m1, m.mes_m0,
            {LOJA_COLUMNS}
        FROM lojas l
        LEFT JOIN {tabela} m ON m.chave_loja = l.chave_loja
        "#
    ))
}

// A chave do usuário é sempre enviada como parâmetro, nunca concatenada
pub(crate) fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: LojaFilter) {
    builder.push(" WHERE 1 = 1");
    match filter {
        LojaFilter::Todas => {}
        LojaFilter::Coluna(column, chave) => {
            builder
                .push(" AND ")
                .push(column.column_name())
                .push(" = ")
                .push_bind(chave);
        }
        LojaFilter::Nenhuma => {
            builder.push(" AND 1 = 0");
        }
    }
}

#[derive(Clone)]
pub struct EstrategiaRepository {
    pool: PgPool,
}

impl EstrategiaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EstrategiaStore for EstrategiaRepository {
    async fn fetch_lojas(&self, produto: Produto, filter: LojaFilter) -> Result<Vec<LojaMetricRow>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(metric_driven_select(produto.fonte()));
        push_filter(&mut builder, filter);

        match produto {
            Produto::PontosRealizandoNegocio => {
                builder.push(" AND l.dt_ult_transacao >= CURRENT_DATE - INTERVAL '3 months'");
                builder.push(" ORDER BY l.dt_ult_transacao DESC");
            }
            Produto::PontosBloqueados => {
                builder.push(" AND UPPER(l.situacao) = 'BLOQUEADO'");
                builder.push(" ORDER BY l.dt_bloqueio DESC NULLS LAST");
            }
            _ => {
                builder.push(" ORDER BY l.nome_loja");
            }
        }

        let rows = builder
            .build_query_as::<LojaMetricRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn fetch_lojas_por_supervisao(
        &self,
        produto: Produto,
        filter: LojaFilter,
    ) -> Result<Vec<LojaMetricRow>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(store_driven_select(produto.fonte())?);
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY l.desc_supervisao, l.nome_loja");

        let rows = builder
            .build_query_as::<LojaMetricRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
