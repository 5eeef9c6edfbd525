// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::auth::User};

/// Leitura de usuários com credenciais (login e validação do token).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_funcional(&self, funcional: &str) -> Result<Option<User>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;
}

// O repositório de usuários, responsável pelas leituras da tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Busca um usuário pelo funcional (matrícula usada no login)
    async fn find_by_funcional(&self, funcional: &str) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, funcional, password_hash, role, email, chave, created_at
            FROM users
            WHERE funcional = $1
            "#,
        )
            .bind(funcional)
            .fetch_optional(&self.pool)
            .await?;

        Ok(maybe_user)
    }

    // Busca um usuário pelo seu ID
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let maybe_user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, funcional, password_hash, role, email, chave, created_at
            FROM users
            WHERE id = $1
            "#,
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(maybe_user)
    }
}
