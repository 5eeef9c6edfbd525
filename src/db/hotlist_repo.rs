// src/db/hotlist_repo.rs

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        hierarchy::UserScope,
        hotlist::{HotlistItem, HotlistSituacao, HotlistSummary, ResultadoTratativa, TratativaHotlist},
    },
};

/// Leads da hotlist e seu histórico de tratativas.
#[async_trait]
pub trait HotlistStore: Send + Sync {
    async fn list(&self, scope: &UserScope) -> Result<Vec<HotlistItem>, AppError>;

    async fn summary(&self, scope: &UserScope) -> Result<HotlistSummary, AppError>;

    /// Supervisor dono do lead, se o lead existir.
    async fn find_owner(&self, item_id: Uuid) -> Result<Option<Uuid>, AppError>;

    async fn update_situacao(&self, item_id: Uuid, situacao: HotlistSituacao) -> Result<(), AppError>;

    /// Grava a tratativa e a nova situação do lead juntas: ou as duas ficam, ou nenhuma.
    async fn registrar_tratativa(
        &self,
        hotlist_id: Uuid,
        user_id: Uuid,
        descricao: &str,
        resultado: ResultadoTratativa,
    ) -> Result<TratativaHotlist, AppError>;

    /// Histórico do lead, mais recente primeiro.
    async fn list_tratativas(&self, hotlist_id: Uuid) -> Result<Vec<TratativaHotlist>, AppError>;
}

fn push_scope(builder: &mut QueryBuilder<'_, Postgres>, scope: &UserScope) {
    builder.push(" WHERE 1 = 1");
    if let UserScope::Usuarios(ids) = scope {
        let ids: Vec<Uuid> = ids.iter().copied().collect();
        builder.push(" AND h.supervisor_id = ANY(").push_bind(ids).push(")");
    }
}

#[derive(Clone)]
pub struct HotlistRepository {
    pool: PgPool,
}

impl HotlistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_situacao<'e, E>(executor: E, item_id: Uuid, situacao: HotlistSituacao) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("UPDATE hotlist SET situacao = $1 WHERE id = $2")
            .bind(situacao.as_str())
            .bind(item_id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item"));
        }

        Ok(())
    }

    async fn insert_tratativa<'e, E>(
        executor: E,
        hotlist_id: Uuid,
        user_id: Uuid,
        descricao: &str,
        resultado: ResultadoTratativa,
    ) -> Result<TratativaHotlist, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let tratativa = sqlx::query_as::<_, TratativaHotlist>(
            r#"
            WITH inserted AS (
                INSERT INTO tratadas_hotlist (hotlist_id, user_id, descricao, situacao)
                VALUES ($1, $2, $3, $4)
                RETURNING id, hotlist_id, user_id, descricao, situacao, data_tratativa
            )
            SELECT
                i.id, i.hotlist_id, i.user_id, u.name AS user_name,
                i.descricao, i.situacao, i.data_tratativa
            FROM inserted i
            LEFT JOIN users u ON u.id = i.user_id
            "#,
        )
            .bind(hotlist_id)
            .bind(user_id)
            .bind(descricao)
            .bind(resultado.as_str())
            .fetch_one(executor)
            .await?;

        Ok(tratativa)
    }
}

#[async_trait]
impl HotlistStore for HotlistRepository {
    // 1. Leads visíveis no escopo do usuário
    async fn list(&self, scope: &UserScope) -> Result<Vec<HotlistItem>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                h.id, h.supervisor_id, u.name AS supervisor_name,
                h.cnpj, h.nome_loja, h.localizacao, h.agencia, h.mercado, h.situacao
            FROM hotlist h
            LEFT JOIN users u ON u.id = h.supervisor_id
            "#,
        );
        push_scope(&mut builder, scope);
        builder.push(" ORDER BY h.nome_loja");

        let items = builder
            .build_query_as::<HotlistItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(items)
    }

    // 2. Resumo (total e pendentes)
    async fn summary(&self, scope: &UserScope) -> Result<HotlistSummary, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(
            r#"
            SELECT
                COUNT(*) AS total_leads,
                COUNT(*) FILTER (WHERE h.situacao = 'pendente') AS leads_pendentes
            FROM hotlist h
            "#,
        );
        push_scope(&mut builder, scope);

        let summary = builder
            .build_query_as::<HotlistSummary>()
            .fetch_one(&self.pool)
            .await?;

        Ok(summary)
    }

    // 3. Dono do lead (usado na checagem de permissão)
    async fn find_owner(&self, item_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT supervisor_id FROM hotlist WHERE id = $1")
            .bind(item_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    async fn update_situacao(&self, item_id: Uuid, situacao: HotlistSituacao) -> Result<(), AppError> {
        Self::set_situacao(&self.pool, item_id, situacao).await
    }

    async fn registrar_tratativa(
        &self,
        hotlist_id: Uuid,
        user_id: Uuid,
        descricao: &str,
        resultado: ResultadoTratativa,
    ) -> Result<TratativaHotlist, AppError> {
        let mut tx = self.pool.begin().await?;

        let tratativa = Self::insert_tratativa(&mut *tx, hotlist_id, user_id, descricao, resultado).await?;

        // Se falhar aqui, a tratativa acima é desfeita no drop da transação
        Self::set_situacao(&mut *tx, hotlist_id, resultado.situacao_do_lead()).await?;

        tx.commit().await?;

        Ok(tratativa)
    }

    // 4. Histórico de tratativas (mais recente primeiro)
    async fn list_tratativas(&self, hotlist_id: Uuid) -> Result<Vec<TratativaHotlist>, AppError> {
        let tratativas = sqlx::query_as::<_, TratativaHotlist>(
            r#"
            SELECT
                t.id, t.hotlist_id, t.user_id, u.name AS user_name,
                t.descricao, t.situacao, t.data_tratativa
            FROM tratadas_hotlist t
            LEFT JOIN users u ON u.id = t.user_id
            WHERE t.hotlist_id = $1
            ORDER BY t.data_tratativa DESC
            "#,
        )
            .bind(hotlist_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tratativas)
    }
}
