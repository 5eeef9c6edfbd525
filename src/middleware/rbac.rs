// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::hierarchy::UserRole,
};

/// 1. O Trait que define quais papéis uma rota aceita
pub trait RoleRequirement: Send + Sync + 'static {
    fn accepts(role: Option<UserRole>) -> bool;
    fn description() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<R>(pub PhantomData<R>);

// 3. Implementação do FromRequestParts
impl<R, S> FromRequestParts<S> for RequireRole<R>
where
    R: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or(AppError::InvalidToken)?;

        if !R::accepts(user.0.role()) {
            return Err(AppError::forbidden(format!(
                "Você precisa ser {} para realizar esta ação.",
                R::description()
            )));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS EXIGIDOS (TIPOS)
// ---

pub struct Gestor;
impl RoleRequirement for Gestor {
    fn accepts(role: Option<UserRole>) -> bool {
        matches!(role, Some(UserRole::Gerente) | Some(UserRole::Coordenador))
    }
    fn description() -> &'static str { "gerente ou coordenador" }
}

pub struct Administrador;
impl RoleRequirement for Administrador {
    fn accepts(role: Option<UserRole>) -> bool {
        role == Some(UserRole::Admin)
    }
    fn description() -> &'static str { "administrador" }
}
