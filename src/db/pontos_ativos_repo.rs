// src/db/pontos_ativos_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::estrategia_repo::push_filter,
    models::{
        hierarchy::LojaFilter,
        pontos_ativos::{CreateTratativaPontoPayload, TratativaPontoAtivo, TratativaPontoFiltro},
    },
};

/// Tratativas de pontos ativos. O escopo é o mesmo filtro de lojas das estratégias.
#[async_trait]
pub trait TratativasPontosStore: Send + Sync {
    async fn loja_no_escopo(&self, chave_loja: i64, filter: LojaFilter) -> Result<bool, AppError>;

    async fn insert(
        &self,
        payload: &CreateTratativaPontoPayload,
        usuario_id: Uuid,
        nome_usuario: &str,
    ) -> Result<TratativaPontoAtivo, AppError>;

    /// Histórico da loja, mais recente primeiro.
    async fn list_por_loja(&self, chave_loja: i64) -> Result<Vec<TratativaPontoAtivo>, AppError>;

    async fn list(
        &self,
        filter: LojaFilter,
        filtro: &TratativaPontoFiltro,
    ) -> Result<Vec<TratativaPontoAtivo>, AppError>;
}

const TRATATIVA_COLUMNS: &str = r#"
    t.id, t.chave_loja, t.usuario_id, t.nome_usuario, t.data_contato,
    t.foi_tratado, t.descricao_tratativa, t.quando_volta_operar,
    t.situacao, t.tipo, t.data_registro
"#;

#[derive(Clone)]
pub struct TratativasPontosRepository {
    pool: PgPool,
}

impl TratativasPontosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TratativasPontosStore for TratativasPontosRepository {
    async fn loja_no_escopo(&self, chave_loja: i64, filter: LojaFilter) -> Result<bool, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT EXISTS (SELECT 1 FROM lojas l");
        push_filter(&mut builder, filter);
        builder.push(" AND l.chave_loja = ").push_bind(chave_loja).push(")");

        let existe = builder
            .build_query_scalar::<bool>()
            .fetch_one(&self.pool)
            .await?;

        Ok(existe)
    }

    async fn insert(
        &self,
        payload: &CreateTratativaPontoPayload,
        usuario_id: Uuid,
        nome_usuario: &str,
    ) -> Result<TratativaPontoAtivo, AppError> {
        let sql = format!(
            r#"
            INSERT INTO tratativas_pontos_ativos AS t (
                chave_loja, usuario_id, nome_usuario, data_contato, foi_tratado,
                descricao_tratativa, quando_volta_operar, situacao
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TRATATIVA_COLUMNS}
            "#
        );

        let tratativa = sqlx::query_as::<_, TratativaPontoAtivo>(&sql)
            .bind(payload.chave_loja)
            .bind(usuario_id)
            .bind(nome_usuario)
            .bind(payload.data_contato)
            .bind(payload.foi_tratado.as_str())
            .bind(&payload.descricao_tratativa)
            .bind(payload.quando_volta_operar)
            .bind(payload.situacao.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(tratativa)
    }

    async fn list_por_loja(&self, chave_loja: i64) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        let sql = format!(
            r#"
            SELECT {TRATATIVA_COLUMNS}
            FROM tratativas_pontos_ativos t
            WHERE t.chave_loja = $1
            ORDER BY t.data_registro DESC
            "#
        );

        let tratativas = sqlx::query_as::<_, TratativaPontoAtivo>(&sql)
            .bind(chave_loja)
            .fetch_all(&self.pool)
            .await?;

        Ok(tratativas)
    }

    async fn list(
        &self,
        filter: LojaFilter,
        filtro: &TratativaPontoFiltro,
    ) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(format!(
            r#"
            SELECT {TRATATIVA_COLUMNS}
            FROM tratativas_pontos_ativos t
            JOIN lojas l ON l.chave_loja = t.chave_loja
            "#
        ));
        push_filter(&mut builder, filter);

        if let Some(foi_tratado) = filtro.foi_tratado {
            builder.push(" AND t.foi_tratado = ").push_bind(foi_tratado.as_str());
        }
        if let Some(situacao) = filtro.situacao {
            builder.push(" AND t.situacao = ").push_bind(situacao.as_str());
        }
        if let Some(inicio) = filtro.data_inicio {
            builder.push(" AND t.data_contato >= ").push_bind(inicio);
        }
        if let Some(fim) = filtro.data_fim {
            builder.push(" AND t.data_contato <= ").push_bind(fim);
        }

        builder
            .push(" ORDER BY t.data_registro DESC LIMIT ")
            .push_bind(filtro.limite())
            .push(" OFFSET ")
            .push_bind(filtro.deslocamento());

        let tratativas = builder
            .build_query_as::<TratativaPontoAtivo>()
            .fetch_all(&self.pool)
            .await?;

        Ok(tratativas)
    }
}
