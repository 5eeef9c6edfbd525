// src/services/hierarchy_service.rs

use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HierarchyStore,
    models::hierarchy::{
        DirectEdgesReport, HierarchyColumn, LojaFilter, UserRole, UserScope, UserSummary,
    },
};

/// Resolve quem o usuário enxerga e sobre quem pode agir.
///
/// Toda consulta à hierarquia tem no máximo dois saltos (gerente → coordenador
/// → subordinado). Arestas diretas e o caminho de dois saltos são sempre
/// consultados juntos; basta um deles existir. Caminhos que voltam ao próprio
/// chamador são descartados, então um ciclo nunca concede autoridade extra.
#[derive(Clone)]
pub struct HierarchyService {
    store: Arc<dyn HierarchyStore>,
}

impl HierarchyService {
    pub fn new(store: Arc<dyn HierarchyStore>) -> Self {
        Self { store }
    }

    /// Predicado sobre lojas para o papel e a chave do chamador.
    /// Papel desconhecido ou chave ausente resultam em `Nenhuma`.
    pub fn resolve_filter_for_role(role: Option<UserRole>, chave: Option<i64>) -> LojaFilter {
        let column = match role {
            Some(UserRole::Admin) => return LojaFilter::Todas,
            Some(UserRole::Gerente) => HierarchyColumn::GerenciaArea,
            Some(UserRole::Coordenador) => HierarchyColumn::Coordenacao,
            Some(UserRole::Supervisor) => HierarchyColumn::Supervisao,
            None => return LojaFilter::Nenhuma,
        };

        match chave {
            Some(chave) => LojaFilter::Coluna(column, chave),
            None => LojaFilter::Nenhuma,
        }
    }

    pub async fn is_authorized_over_subordinate(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        target_id: Uuid,
    ) -> Result<bool, AppError> {
        match caller_role {
            Some(UserRole::Admin) => Ok(true),
            Some(UserRole::Supervisor) => Ok(target_id == caller_id),
            Some(UserRole::Coordenador) => {
                if target_id == caller_id {
                    return Ok(false);
                }
                let diretos = self.store.direct_subordinates(caller_id).await?;
                Ok(diretos.iter().any(|u| u.id == target_id))
            }
            Some(UserRole::Gerente) => {
                if target_id == caller_id {
                    return Ok(false);
                }
                let diretos = self.store.direct_subordinates(caller_id).await?;

                // Aresta direta (atalho gravado pela manutenção)
                if diretos.iter().any(|u| u.id == target_id) {
                    return Ok(true);
                }

                // Caminho de dois saltos por um coordenador
                for coordenador in coordenadores(&diretos, caller_id) {
                    let netos = self.store.direct_subordinates(coordenador.id).await?;
                    if netos.iter().any(|u| u.id == target_id) {
                        return Ok(true);
                    }
                }

                Ok(false)
            }
            None => Ok(false),
        }
    }

    /// Subordinados diretos. Vazio para quem não é gerente nem coordenador.
    pub async fn subordinates_of(&self, user_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let Some(user) = self.store.find_user(user_id).await? else {
            return Ok(Vec::new());
        };

        match user.role() {
            Some(UserRole::Gerente) | Some(UserRole::Coordenador) => {
                self.store.direct_subordinates(user_id).await
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Supervisores ligados ao gerente por aresta direta ou por um coordenador.
    /// Cada supervisor aparece uma única vez.
    pub async fn supervisors_under_manager(&self, manager_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let diretos = self.store.direct_subordinates(manager_id).await?;
        let mut supervisores: BTreeMap<Uuid, UserSummary> = BTreeMap::new();

        for user in &diretos {
            if user.role() == Some(UserRole::Supervisor) && user.id != manager_id {
                supervisores.insert(user.id, user.clone());
            }
        }

        for coordenador in coordenadores(&diretos, manager_id) {
            for user in self.store.direct_subordinates(coordenador.id).await? {
                if user.role() == Some(UserRole::Supervisor) && user.id != manager_id {
                    supervisores.entry(user.id).or_insert(user);
                }
            }
        }

        Ok(ordenados(supervisores.into_values().collect()))
    }

    /// Supervisores abaixo de um gerente ou coordenador.
    pub async fn supervisors_of(
        &self,
        user_id: Uuid,
        role: Option<UserRole>,
    ) -> Result<Vec<UserSummary>, AppError> {
        match role {
            Some(UserRole::Gerente) => self.supervisors_under_manager(user_id).await,
            Some(UserRole::Coordenador) => Ok(self
                .store
                .direct_subordinates(user_id)
                .await?
                .into_iter()
                .filter(|u| u.role() == Some(UserRole::Supervisor))
                .collect()),
            _ => Err(AppError::forbidden(
                "Apenas gerentes e coordenadores possuem supervisores vinculados",
            )),
        }
    }

    /// Usuários cujos registros (hotlist, eventos) o chamador enxerga.
    pub async fn resolve_user_scope(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
    ) -> Result<UserScope, AppError> {
        let mut ids = HashSet::new();

        match caller_role {
            Some(UserRole::Admin) => return Ok(UserScope::Todos),
            Some(UserRole::Supervisor) => {
                ids.insert(caller_id);
            }
            Some(UserRole::Coordenador) => {
                ids.insert(caller_id);
                for user in self.store.direct_subordinates(caller_id).await? {
                    ids.insert(user.id);
                }
            }
            Some(UserRole::Gerente) => {
                ids.insert(caller_id);
                let diretos = self.store.direct_subordinates(caller_id).await?;
                for coordenador in coordenadores(&diretos, caller_id) {
                    for user in self.store.direct_subordinates(coordenador.id).await? {
                        ids.insert(user.id);
                    }
                }
                ids.extend(diretos.iter().map(|u| u.id));
            }
            None => {}
        }

        Ok(UserScope::Usuarios(ids))
    }

    /// O chamador pode agir sobre um registro cujo dono é `owner_id`?
    pub async fn can_act_on(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        owner_id: Uuid,
    ) -> Result<bool, AppError> {
        if owner_id == caller_id || caller_role == Some(UserRole::Admin) {
            return Ok(true);
        }
        self.is_authorized_over_subordinate(caller_id, caller_role, owner_id).await
    }

    pub async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, AppError> {
        self.store.find_user(id).await
    }

    /// Subordinados diretos de `target_id`, se o chamador pode vê-lo.
    pub async fn visible_subordinates(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        target_id: Uuid,
    ) -> Result<Vec<UserSummary>, AppError> {
        let target = self.store.find_user(target_id).await?;
        self.authorize_record(caller_id, caller_role, target.map(|u| u.id), "Usuário")
            .await?;

        self.subordinates_of(target_id).await
    }

    /// Supervisores de `target_id`, se o chamador pode vê-lo.
    pub async fn visible_supervisors(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        target_id: Uuid,
    ) -> Result<Vec<UserSummary>, AppError> {
        let target = self.store.find_user(target_id).await?;
        self.authorize_record(caller_id, caller_role, target.as_ref().map(|u| u.id), "Usuário")
            .await?;

        match target {
            Some(target) => self.supervisors_of(target.id, target.role()).await,
            None => Err(AppError::NotFound("Usuário")),
        }
    }

    /// Dados de `target_id`, se o chamador pode vê-lo.
    pub async fn visible_user(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        target_id: Uuid,
    ) -> Result<UserSummary, AppError> {
        let target = self.store.find_user(target_id).await?;
        self.authorize_record(caller_id, caller_role, target.as_ref().map(|u| u.id), "Usuário")
            .await?;

        target.ok_or(AppError::NotFound("Usuário"))
    }

    /// Superior imediato de `target_id`. Com mais de um, vale o primeiro por nome.
    pub async fn visible_superior(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        target_id: Uuid,
    ) -> Result<UserSummary, AppError> {
        let target = self.visible_user(caller_id, caller_role, target_id).await?;

        self.store
            .direct_superiors(target.id)
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::NotFound("Superior"))
    }

    pub async fn all_users(&self) -> Result<Vec<UserSummary>, AppError> {
        self.store.all_users().await
    }

    /// Checagem de permissão antes de mutar um registro. Registro inexistente
    /// só aparece como `NotFound` para admin; os demais recebem `Forbidden`.
    pub async fn authorize_record(
        &self,
        caller_id: Uuid,
        caller_role: Option<UserRole>,
        owner_id: Option<Uuid>,
        registro: &'static str,
    ) -> Result<(), AppError> {
        let Some(owner_id) = owner_id else {
            return if caller_role == Some(UserRole::Admin) {
                Err(AppError::NotFound(registro))
            } else {
                Err(AppError::forbidden(format!("{registro} fora do escopo do usuário")))
            };
        };

        if self.can_act_on(caller_id, caller_role, owner_id).await? {
            Ok(())
        } else {
            Err(AppError::forbidden(format!("{registro} fora do escopo do usuário")))
        }
    }

    /// Grava arestas diretas gerente → supervisor para todo caminho de dois
    /// saltos existente. Rodar de novo não cria nada.
    pub async fn materialize_direct_edges(&self) -> Result<DirectEdgesReport, AppError> {
        let mut criadas = 0;

        for gerente in self.store.users_with_role(UserRole::Gerente).await? {
            for supervisor in self.supervisors_under_manager(gerente.id).await? {
                if self.store.insert_edge(gerente.id, supervisor.id).await? {
                    criadas += 1;
                }
            }
        }

        tracing::info!("🔗 {} arestas diretas gerente → supervisor criadas", criadas);

        Ok(DirectEdgesReport { criadas })
    }
}

// Subordinados diretos que são coordenadores, sem voltar ao próprio superior
fn coordenadores(diretos: &[UserSummary], superior_id: Uuid) -> impl Iterator<Item = &UserSummary> {
    diretos
        .iter()
        .filter(move |u| u.id != superior_id && u.role() == Some(UserRole::Coordenador))
}

fn ordenados(mut users: Vec<UserSummary>) -> Vec<UserSummary> {
    users.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    users
}
