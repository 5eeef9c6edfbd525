// src/db/acoes_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        acoes::{AcaoDiaria, UpdateAcaoPayload},
        hierarchy::UserScope,
    },
};

#[async_trait]
pub trait AcoesStore: Send + Sync {
    /// Ações dos usuários do escopo, por prioridade e depois prazo.
    async fn list(&self, scope: &UserScope) -> Result<Vec<AcaoDiaria>, AppError>;

    async fn find_owner(&self, acao_id: Uuid) -> Result<Option<Uuid>, AppError>;

    /// Campos ausentes no payload ficam como estão.
    async fn update(&self, acao_id: Uuid, payload: &UpdateAcaoPayload) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct AcoesRepository {
    pool: PgPool,
}

impl AcoesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AcoesStore for AcoesRepository {
    async fn list(&self, scope: &UserScope) -> Result<Vec<AcaoDiaria>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                a.id, a.chave_loja, a.nome_loja, a.telefone, a.contato,
                a.user_id, u.name AS nome_usuario,
                a.qtd_contas_plataforma, a.qtd_contas_legado, a.agencia,
                a.situacao, a.descricao_situacao, a.data_limite,
                a.data_criacao, a.data_atualizacao, a.data_conclusao,
                a.observacoes, a.prioridade, a.tipo_acao
            FROM acoes_diarias a
            LEFT JOIN users u ON u.id = a.user_id
            WHERE 1 = 1
            "#,
        );
        if let UserScope::Usuarios(ids) = scope {
            let ids: Vec<Uuid> = ids.iter().copied().collect();
            builder.push(" AND a.user_id = ANY(").push_bind(ids).push(")");
        }
        builder.push(
            r#"
            ORDER BY
                CASE a.prioridade WHEN 'alta' THEN 1 WHEN 'media' THEN 2 ELSE 3 END,
                a.data_limite ASC NULLS LAST
            "#,
        );

        let acoes = builder
            .build_query_as::<AcaoDiaria>()
            .fetch_all(&self.pool)
            .await?;

        Ok(acoes)
    }

    async fn find_owner(&self, acao_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT user_id FROM acoes_diarias WHERE id = $1")
            .bind(acao_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    async fn update(&self, acao_id: Uuid, payload: &UpdateAcaoPayload) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE acoes_diarias SET
                situacao = COALESCE($1, situacao),
                observacoes = COALESCE($2, observacoes),
                data_conclusao = COALESCE($3, data_conclusao),
                data_atualizacao = now()
            WHERE id = $4
            "#,
        )
            .bind(payload.situacao.map(|s| s.as_str()))
            .bind(payload.observacoes.as_deref())
            .bind(payload.data_conclusao)
            .bind(acao_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Ação diária"));
        }

        Ok(())
    }
}
