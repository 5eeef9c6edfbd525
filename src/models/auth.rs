// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::hierarchy::{UserRole, UserSummary};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub funcional: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub password_hash: String,

    // Texto livre no banco; só vira papel via `role()`
    #[schema(example = "supervisor")]
    pub role: String,
    pub email: Option<String>,

    // Chave organizacional (obrigatória para ter escopo fora do admin)
    pub chave: Option<i64>,

    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }

    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            name: self.name.clone(),
            funcional: self.funcional.clone(),
            role: self.role.clone(),
            email: self.email.clone(),
            chave: self.chave,
        }
    }
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(length(min = 1, message = "O funcional é obrigatório."))]
    #[schema(example = "12345")]
    pub funcional: String,
    #[validate(length(min = 1, message = "A senha é obrigatória."))]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserSummary,
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub funcional: String,
    pub role: String,
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
}
