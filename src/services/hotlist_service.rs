// src/services/hotlist_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::HotlistStore,
    models::{
        auth::User,
        hotlist::{CreateTratativaPayload, HotlistItem, HotlistSituacao, HotlistSummary, TratativaHotlist},
    },
    services::hierarchy_service::HierarchyService,
};

#[derive(Clone)]
pub struct HotlistService {
    store: Arc<dyn HotlistStore>,
    hierarchy: HierarchyService,
}

impl HotlistService {
    pub fn new(store: Arc<dyn HotlistStore>, hierarchy: HierarchyService) -> Self {
        Self { store, hierarchy }
    }

    pub async fn list(&self, user: &User) -> Result<Vec<HotlistItem>, AppError> {
        let scope = self.hierarchy.resolve_user_scope(user.id, user.role()).await?;
        self.store.list(&scope).await
    }

    pub async fn summary(&self, user: &User) -> Result<HotlistSummary, AppError> {
        let scope = self.hierarchy.resolve_user_scope(user.id, user.role()).await?;
        self.store.summary(&scope).await
    }

    pub async fn update_situacao(
        &self,
        user: &User,
        item_id: Uuid,
        situacao: HotlistSituacao,
    ) -> Result<(), AppError> {
        self.authorize(user, item_id).await?;
        self.store.update_situacao(item_id, situacao).await
    }

    /// Registra a tratativa e atualiza a situação do lead na mesma transação.
    pub async fn registrar_tratativa(
        &self,
        user: &User,
        payload: &CreateTratativaPayload,
    ) -> Result<TratativaHotlist, AppError> {
        self.authorize(user, payload.hotlist_id).await?;

        let tratativa = self.store
            .registrar_tratativa(payload.hotlist_id, user.id, &payload.descricao, payload.situacao)
            .await?;

        tracing::info!(
            "📝 Tratativa {} registrada no lead {} por {}",
            tratativa.id, payload.hotlist_id, user.funcional
        );

        Ok(tratativa)
    }

    pub async fn list_tratativas(&self, user: &User, item_id: Uuid) -> Result<Vec<TratativaHotlist>, AppError> {
        self.authorize(user, item_id).await?;
        self.store.list_tratativas(item_id).await
    }

    async fn authorize(&self, user: &User, item_id: Uuid) -> Result<(), AppError> {
        let owner = self.store.find_owner(item_id).await?;
        self.hierarchy
            .authorize_record(user.id, user.role(), owner, "Item")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::in_memory::{InMemoryStore, usuario};
    use crate::models::hotlist::ResultadoTratativa;

    struct Cenario {
        store: Arc<InMemoryStore>,
        service: HotlistService,
        coordenador: User,
        supervisor: User,
        colega: User,
        lead_supervisor: Uuid,
        lead_colega: Uuid,
    }

    // coordenador → supervisor; colega fica fora da hierarquia
    fn cenario() -> Cenario {
        let store = Arc::new(InMemoryStore::new());
        let coordenador = store.add_user("Coordenador", "coordenador", Some(2));
        let supervisor = store.add_user("Supervisor", "supervisor", Some(3));
        let colega = store.add_user("Colega", "supervisor", Some(4));
        store.add_edge(coordenador, supervisor);

        let lead_supervisor = store.add_lead(supervisor, "Mercado Central");
        let lead_colega = store.add_lead(colega, "Padaria Sol");

        let service = HotlistService::new(store.clone(), HierarchyService::new(store.clone()));
        Cenario {
            service,
            coordenador: usuario(&store, coordenador),
            supervisor: usuario(&store, supervisor),
            colega: usuario(&store, colega),
            store,
            lead_supervisor,
            lead_colega,
        }
    }

    fn tratativa(hotlist_id: Uuid, situacao: ResultadoTratativa) -> CreateTratativaPayload {
        CreateTratativaPayload {
            hotlist_id,
            descricao: "Contato feito com o responsável".into(),
            situacao,
        }
    }

    #[tokio::test]
    async fn list_and_summary_follow_the_user_scope() {
        let c = cenario();

        let do_coordenador = c.service.list(&c.coordenador).await.unwrap();
        assert_eq!(do_coordenador.len(), 1);
        assert_eq!(do_coordenador[0].id, c.lead_supervisor);

        let resumo = c.service.summary(&c.colega).await.unwrap();
        assert_eq!(resumo, HotlistSummary { total_leads: 1, leads_pendentes: 1 });
    }

    #[tokio::test]
    async fn realized_follow_up_closes_the_lead_and_keeps_history() {
        let c = cenario();

        c.service
            .registrar_tratativa(&c.coordenador, &tratativa(c.lead_supervisor, ResultadoTratativa::Pendente))
            .await
            .unwrap();
        assert_eq!(c.store.lead_situacao(c.lead_supervisor).as_deref(), Some("pendente"));

        c.service
            .registrar_tratativa(&c.supervisor, &tratativa(c.lead_supervisor, ResultadoTratativa::Realizada))
            .await
            .unwrap();
        assert_eq!(c.store.lead_situacao(c.lead_supervisor).as_deref(), Some("tratada"));

        let historico = c.service.list_tratativas(&c.supervisor, c.lead_supervisor).await.unwrap();
        let situacoes: Vec<&str> = historico.iter().map(|t| t.situacao.as_str()).collect();
        assert_eq!(situacoes, vec!["realizada", "pendente"]);

        let resumo = c.service.summary(&c.coordenador).await.unwrap();
        assert_eq!(resumo.leads_pendentes, 0);
    }

    #[tokio::test]
    async fn nothing_is_written_outside_the_scope() {
        let c = cenario();

        let resp = c.service
            .registrar_tratativa(&c.coordenador, &tratativa(c.lead_colega, ResultadoTratativa::Realizada))
            .await;
        assert!(matches!(resp, Err(AppError::Forbidden(_))));
        assert_eq!(c.store.lead_situacao(c.lead_colega).as_deref(), Some("pendente"));
        assert!(c.store.tratativas_do_lead(c.lead_colega).is_empty());

        let resp = c.service
            .update_situacao(&c.supervisor, c.lead_colega, HotlistSituacao::Tratada)
            .await;
        assert!(matches!(resp, Err(AppError::Forbidden(_))));
        assert_eq!(c.store.lead_situacao(c.lead_colega).as_deref(), Some("pendente"));
    }

    #[tokio::test]
    async fn follow_up_on_a_missing_lead_leaves_no_history() {
        let c = cenario();
        let admin = usuario(&c.store, c.store.add_user("Admin", "admin", None));
        let inexistente = Uuid::new_v4();

        let resp = c.service
            .registrar_tratativa(&admin, &tratativa(inexistente, ResultadoTratativa::Realizada))
            .await;
        assert!(matches!(resp, Err(AppError::NotFound("Item"))));
        assert!(c.store.tratativas_do_lead(inexistente).is_empty());

        let resp = c.service
            .registrar_tratativa(&c.supervisor, &tratativa(inexistente, ResultadoTratativa::Realizada))
            .await;
        assert!(matches!(resp, Err(AppError::Forbidden(_))));
    }
}
