// src/services/auth.rs

use std::sync::Arc;

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{AuthResponse, Claims, User},
};

const TOKEN_VALIDITY_HOURS: i64 = 24;

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repo: Arc<dyn UserStore>, jwt_secret: String) -> Self {
        Self { user_repo, jwt_secret }
    }

    pub async fn login_user(&self, funcional: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = self.user_repo
            .find_by_funcional(funcional)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
            ?;

        if !is_password_valid {
            tracing::warn!("🔒 Senha incorreta para o funcional {}", funcional);
            return Err(AppError::InvalidCredentials);
        }

        let token = create_token(&self.jwt_secret, &user)?;
        tracing::info!("🔑 Login de {} ({})", user.funcional, user.role);

        Ok(AuthResponse { user: user.summary(), token })
    }

    /// Valida o token e recarrega o usuário do banco, para que papel e chave
    /// sempre reflitam o cadastro atual e não o que foi gravado no token.
    /// Token de usuário removido é credencial inválida (401).
    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let claims = decode_token(&self.jwt_secret, token)?;

        match self.user_repo.find_by_id(claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                tracing::warn!("🔒 Token válido para usuário inexistente {}", claims.sub);
                Err(AppError::InvalidToken)
            }
        }
    }
}

pub fn create_token(secret: &str, user: &User) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + chrono::Duration::hours(TOKEN_VALIDITY_HOURS);

    let claims = Claims {
        sub: user.id,
        funcional: user.funcional.clone(),
        role: user.role.clone(),
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
        .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims)
}
