// src/db/hierarchy_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::hierarchy::{UserRole, UserSummary},
};

/// Acesso à relação de hierarquia (superior → subordinado) e aos usuários.
/// O resolvedor de escopo depende só deste trait.
#[async_trait]
pub trait HierarchyStore: Send + Sync {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, AppError>;

    /// Subordinados diretos. Nunca inclui o próprio superior.
    async fn direct_subordinates(&self, superior_id: Uuid) -> Result<Vec<UserSummary>, AppError>;

    /// Superiores diretos de um usuário.
    async fn direct_superiors(&self, subordinate_id: Uuid) -> Result<Vec<UserSummary>, AppError>;

    async fn users_with_role(&self, role: UserRole) -> Result<Vec<UserSummary>, AppError>;

    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError>;

    /// Insere a aresta se ainda não existir. Retorna `true` quando criou.
    async fn insert_edge(&self, superior_id: Uuid, subordinate_id: Uuid) -> Result<bool, AppError>;
}

#[derive(Clone)]
pub struct HierarchyRepository {
    pool: PgPool,
}

impl HierarchyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HierarchyStore for HierarchyRepository {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, AppError> {
        let user = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, funcional, role, email, chave FROM users WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn direct_subordinates(&self, superior_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.funcional, u.role, u.email, u.chave
            FROM hierarchy h
            JOIN users u ON u.id = h.subordinate_id
            WHERE h.superior_id = $1
              AND h.subordinate_id <> h.superior_id
            ORDER BY u.name
            "#,
        )
            .bind(superior_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn direct_superiors(&self, subordinate_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT u.id, u.name, u.funcional, u.role, u.email, u.chave
            FROM hierarchy h
            JOIN users u ON u.id = h.superior_id
            WHERE h.subordinate_id = $1
              AND h.subordinate_id <> h.superior_id
            ORDER BY u.name
            "#,
        )
            .bind(subordinate_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn users_with_role(&self, role: UserRole) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            r#"
            SELECT id, name, funcional, role, email, chave
            FROM users
            WHERE LOWER(role) = $1
            ORDER BY name
            "#,
        )
            .bind(role.as_str())
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, name, funcional, role, email, chave FROM users ORDER BY name",
        )
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn insert_edge(&self, superior_id: Uuid, subordinate_id: Uuid) -> Result<bool, AppError> {
        // A constraint hierarchy_edge_unique torna a operação idempotente
        let result = sqlx::query(
            r#"
            INSERT INTO hierarchy (superior_id, subordinate_id)
            VALUES ($1, $2)
            ON CONFLICT (superior_id, subordinate_id) DO NOTHING
            "#,
        )
            .bind(superior_id)
            .bind(subordinate_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
