// src/services/acoes_service.rs

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::AcoesStore,
    models::{
        acoes::{AcaoDiaria, AcaoSituacao, UpdateAcaoPayload},
        auth::User,
        hierarchy::UserScope,
    },
    services::hierarchy_service::HierarchyService,
};

#[derive(Clone)]
pub struct AcoesService {
    store: Arc<dyn AcoesStore>,
    hierarchy: HierarchyService,
}

impl AcoesService {
    pub fn new(store: Arc<dyn AcoesStore>, hierarchy: HierarchyService) -> Self {
        Self { store, hierarchy }
    }

    /// Ações do próprio chamador, ou de `alvo` quando ele está na hierarquia.
    pub async fn list(&self, user: &User, alvo: Option<Uuid>) -> Result<Vec<AcaoDiaria>, AppError> {
        let alvo = alvo.unwrap_or(user.id);

        if alvo != user.id {
            let target = self.hierarchy.find_user(alvo).await?;
            self.hierarchy
                .authorize_record(user.id, user.role(), target.map(|u| u.id), "Usuário")
                .await?;
        }

        self.store.list(&UserScope::Usuarios([alvo].into())).await
    }

    /// Ações da equipe: o escopo do chamador sem ele mesmo.
    pub async fn equipe(&self, user: &User) -> Result<Vec<AcaoDiaria>, AppError> {
        let scope = match self.hierarchy.resolve_user_scope(user.id, user.role()).await? {
            UserScope::Todos => UserScope::Todos,
            UserScope::Usuarios(mut ids) => {
                ids.remove(&user.id);
                if ids.is_empty() {
                    return Ok(Vec::new());
                }
                UserScope::Usuarios(ids)
            }
        };

        let mut acoes = self.store.list(&scope).await?;
        acoes.retain(|a| a.user_id != user.id);

        Ok(acoes)
    }

    pub async fn update(
        &self,
        user: &User,
        acao_id: Uuid,
        mut payload: UpdateAcaoPayload,
    ) -> Result<(), AppError> {
        if payload.is_empty() {
            return Err(AppError::InvalidInput("Nenhum campo para atualizar".into()));
        }

        let owner = self.store.find_owner(acao_id).await?;
        self.hierarchy
            .authorize_record(user.id, user.role(), owner, "Ação diária")
            .await?;

        if payload.situacao == Some(AcaoSituacao::Concluido) && payload.data_conclusao.is_none() {
            payload.data_conclusao = Some(Utc::now());
        }

        self.store.update(acao_id, &payload).await?;

        tracing::info!("✅ Ação {} atualizada por {}", acao_id, user.funcional);

        Ok(())
    }
}
