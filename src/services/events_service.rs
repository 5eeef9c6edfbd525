// src/services/events_service.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::EventsStore,
    models::{
        auth::User,
        events::{Evento, EventoCriado, EventoPayload},
        hierarchy::UserRole,
    },
    services::hierarchy_service::HierarchyService,
};

#[derive(Clone)]
pub struct EventsService {
    store: Arc<dyn EventsStore>,
    hierarchy: HierarchyService,
}

impl EventsService {
    pub fn new(store: Arc<dyn EventsStore>, hierarchy: HierarchyService) -> Self {
        Self { store, hierarchy }
    }

    pub async fn list(&self, user: &User) -> Result<Vec<Evento>, AppError> {
        let scope = self.hierarchy.resolve_user_scope(user.id, user.role()).await?;
        let mut eventos = self.store.list(&scope).await?;

        for evento in &mut eventos {
            evento.is_owner = evento.supervisor_id == user.id;
        }

        Ok(eventos)
    }

    pub async fn get(&self, user: &User, evento_id: Uuid) -> Result<Evento, AppError> {
        self.authorize(user, evento_id).await?;

        let mut evento = self.store.find(evento_id).await?.ok_or(AppError::NotFound("Evento"))?;
        evento.is_owner = evento.supervisor_id == user.id;

        Ok(evento)
    }

    pub async fn create(&self, user: &User, payload: &EventoPayload) -> Result<EventoCriado, AppError> {
        validar_periodo(payload.data_inicio, payload.data_fim)?;

        let supervisor_id =
            resolver_responsavel(&self.hierarchy, user.id, user.role(), payload.supervisor_id).await?;
        let id = self.store.create(payload, supervisor_id, user.id).await?;

        tracing::info!("📅 Evento {} criado por {} para {}", id, user.funcional, supervisor_id);

        Ok(EventoCriado { id, supervisor_id })
    }

    /// Edita o evento. Trocar o responsável segue as mesmas regras da criação.
    pub async fn update(&self, user: &User, evento_id: Uuid, payload: &EventoPayload) -> Result<(), AppError> {
        validar_periodo(payload.data_inicio, payload.data_fim)?;

        let owner = self.store.find_owner(evento_id).await?;
        self.hierarchy
            .authorize_record(user.id, user.role(), owner, "Evento")
            .await?;
        let atual = owner.ok_or(AppError::NotFound("Evento"))?;

        let supervisor_id = match payload.supervisor_id {
            Some(novo) if novo != atual => {
                resolver_responsavel(&self.hierarchy, user.id, user.role(), Some(novo)).await?
            }
            _ => atual,
        };

        self.store.update(evento_id, payload, supervisor_id).await?;

        tracing::info!("📅 Evento {} atualizado por {}", evento_id, user.funcional);

        Ok(())
    }

    pub async fn update_feedback(&self, user: &User, evento_id: Uuid, tratativa: &str) -> Result<(), AppError> {
        self.authorize(user, evento_id).await?;
        self.store.update_feedback(evento_id, tratativa).await
    }

    pub async fn delete(&self, user: &User, evento_id: Uuid) -> Result<(), AppError> {
        self.authorize(user, evento_id).await?;
        self.store.delete(evento_id).await
    }

    async fn authorize(&self, user: &User, evento_id: Uuid) -> Result<(), AppError> {
        let owner = self.store.find_owner(evento_id).await?;
        self.hierarchy
            .authorize_record(user.id, user.role(), owner, "Evento")
            .await
    }
}

fn validar_periodo(inicio: DateTime<Utc>, fim: DateTime<Utc>) -> Result<(), AppError> {
    if fim < inicio {
        return Err(AppError::InvalidInput(
            "A data de término não pode ser anterior à data de início".into(),
        ));
    }
    Ok(())
}

// Supervisor dono do evento: o próprio chamador, ou um supervisor que ele comanda
async fn resolver_responsavel(
    hierarchy: &HierarchyService,
    caller_id: Uuid,
    caller_role: Option<UserRole>,
    supervisor_id: Option<Uuid>,
) -> Result<Uuid, AppError> {
    let alvo = match supervisor_id {
        Some(alvo) if alvo != caller_id => alvo,
        _ => return Ok(caller_id),
    };

    match caller_role {
        Some(UserRole::Admin) => exigir_supervisor(hierarchy, alvo).await?,
        Some(UserRole::Gerente) => exigir_subordinado(hierarchy, caller_id, caller_role, alvo).await?,
        Some(UserRole::Coordenador) => {
            // A hierarquia vem antes do papel, para não revelar quem existe fora dela
            exigir_subordinado(hierarchy, caller_id, caller_role, alvo).await?;
            exigir_supervisor(hierarchy, alvo).await?;
        }
        _ => {
            return Err(AppError::forbidden(
                "Apenas gestores podem agendar eventos para outros supervisores",
            ));
        }
    }

    Ok(alvo)
}

async fn exigir_subordinado(
    hierarchy: &HierarchyService,
    caller_id: Uuid,
    caller_role: Option<UserRole>,
    alvo: Uuid,
) -> Result<(), AppError> {
    if hierarchy.is_authorized_over_subordinate(caller_id, caller_role, alvo).await? {
        Ok(())
    } else {
        Err(AppError::forbidden("Supervisor informado não pertence à sua hierarquia"))
    }
}

async fn exigir_supervisor(hierarchy: &HierarchyService, alvo: Uuid) -> Result<(), AppError> {
    let target = hierarchy.find_user(alvo).await?;
    if target.and_then(|u| u.role()) != Some(UserRole::Supervisor) {
        return Err(AppError::InvalidInput(
            "O responsável pelo evento deve ser um supervisor".into(),
        ));
    }
    Ok(())
}
