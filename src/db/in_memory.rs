// src/db/in_memory.rs
//
// Implementação em memória dos stores, usada pelos testes dos serviços.

use std::{
    collections::HashMap,
    sync::Mutex,
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        AcoesStore, EstrategiaStore, EventsStore, HierarchyStore, HotlistStore, TratativasPontosStore,
        UserStore,
    },
    models::{
        acoes::{AcaoDiaria, UpdateAcaoPayload},
        auth::User,
        estrategia::{LojaMetricRow, Produto},
        events::{Evento, EventoPayload},
        hierarchy::{LojaFilter, UserRole, UserScope, UserSummary},
        hotlist::{HotlistItem, HotlistSituacao, HotlistSummary, ResultadoTratativa, TratativaHotlist},
        pontos_ativos::{CreateTratativaPontoPayload, TratativaPontoAtivo, TratativaPontoFiltro},
    },
};

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<HashMap<Uuid, User>>,
    edges: Mutex<Vec<(Uuid, Uuid)>>,
    lojas: Mutex<Vec<LojaMetricRow>>,
    leads: Mutex<Vec<HotlistItem>>,
    tratativas: Mutex<Vec<TratativaHotlist>>,
    eventos: Mutex<Vec<Evento>>,
    acoes: Mutex<Vec<AcaoDiaria>>,
    tratativas_pontos: Mutex<Vec<TratativaPontoAtivo>>,
}

/// Usuário completo, como o middleware de autenticação entrega aos serviços.
pub fn usuario(store: &InMemoryStore, id: Uuid) -> User {
    store.users.lock().unwrap()[&id].clone()
}

fn in_scope(scope: &UserScope, user_id: Uuid) -> bool {
    match scope {
        UserScope::Todos => true,
        UserScope::Usuarios(ids) => ids.contains(&user_id),
    }
}

fn prioridade_rank(prioridade: &str) -> u8 {
    match prioridade {
        "alta" => 1,
        "media" => 2,
        _ => 3,
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, name: &str, role: &str, chave: Option<i64>) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_user(id, name, role, chave, format!("F{}", id.simple()), String::new());
        id
    }

    pub fn add_login(&self, name: &str, role: &str, chave: Option<i64>, funcional: &str, senha: &str) -> Uuid {
        let id = Uuid::new_v4();
        let hash = bcrypt::hash(senha, 4).unwrap();
        self.insert_user(id, name, role, chave, funcional.to_string(), hash);
        id
    }

    fn insert_user(&self, id: Uuid, name: &str, role: &str, chave: Option<i64>, funcional: String, hash: String) {
        let user = User {
            id,
            name: name.to_string(),
            funcional,
            password_hash: hash,
            role: role.to_string(),
            email: None,
            chave,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().insert(id, user);
    }

    fn nome(&self, id: Uuid) -> Option<String> {
        self.users.lock().unwrap().get(&id).map(|u| u.name.clone())
    }

    pub fn add_edge(&self, superior_id: Uuid, subordinate_id: Uuid) {
        self.edges.lock().unwrap().push((superior_id, subordinate_id));
    }

    pub fn remove_edge(&self, superior_id: Uuid, subordinate_id: Uuid) {
        self.edges
            .lock()
            .unwrap()
            .retain(|edge| *edge != (superior_id, subordinate_id));
    }

    pub fn has_edge(&self, superior_id: Uuid, subordinate_id: Uuid) -> bool {
        self.edges.lock().unwrap().contains(&(superior_id, subordinate_id))
    }

    pub fn add_loja(&self, row: LojaMetricRow) {
        self.lojas.lock().unwrap().push(row);
    }

    pub fn add_lead(&self, supervisor_id: Uuid, nome_loja: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.leads.lock().unwrap().push(HotlistItem {
            id,
            supervisor_id,
            supervisor_name: self.nome(supervisor_id),
            cnpj: None,
            nome_loja: Some(nome_loja.to_string()),
            localizacao: None,
            agencia: None,
            mercado: None,
            situacao: HotlistSituacao::Pendente.as_str().to_string(),
        });
        id
    }

    pub fn lead_situacao(&self, id: Uuid) -> Option<String> {
        self.leads
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == id)
            .map(|l| l.situacao.clone())
    }

    pub fn tratativas_do_lead(&self, hotlist_id: Uuid) -> Vec<TratativaHotlist> {
        self.tratativas
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| t.hotlist_id == hotlist_id)
            .cloned()
            .collect()
    }

    pub fn add_acao(&self, user_id: Uuid, chave_loja: i64, prioridade: &str, data_limite: Option<NaiveDate>) -> Uuid {
        let id = Uuid::new_v4();
        let agora = Utc::now();
        self.acoes.lock().unwrap().push(AcaoDiaria {
            id,
            chave_loja,
            nome_loja: Some(format!("Loja {chave_loja}")),
            telefone: None,
            contato: None,
            user_id,
            nome_usuario: self.nome(user_id),
            qtd_contas_plataforma: None,
            qtd_contas_legado: None,
            agencia: None,
            situacao: "pendente".into(),
            descricao_situacao: None,
            data_limite,
            data_criacao: agora,
            data_atualizacao: agora,
            data_conclusao: None,
            observacoes: None,
            prioridade: prioridade.to_string(),
            tipo_acao: None,
        });
        id
    }

    pub fn acao(&self, id: Uuid) -> Option<AcaoDiaria> {
        self.acoes.lock().unwrap().iter().find(|a| a.id == id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_funcional(&self, funcional: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.funcional == funcional)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl HierarchyStore for InMemoryStore {
    async fn find_user(&self, id: Uuid) -> Result<Option<UserSummary>, AppError> {
        Ok(self.users.lock().unwrap().get(&id).map(User::summary))
    }

    async fn direct_subordinates(&self, superior_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let edges = self.edges.lock().unwrap();
        let users = self.users.lock().unwrap();

        let mut subordinates: Vec<UserSummary> = edges
            .iter()
            .filter(|(sup, sub)| *sup == superior_id && *sub != superior_id)
            .filter_map(|(_, sub)| users.get(sub).map(User::summary))
            .collect();
        subordinates.sort_by(|a, b| a.name.cmp(&b.name));
        subordinates.dedup_by_key(|u| u.id);

        Ok(subordinates)
    }

    async fn direct_superiors(&self, subordinate_id: Uuid) -> Result<Vec<UserSummary>, AppError> {
        let edges = self.edges.lock().unwrap();
        let users = self.users.lock().unwrap();

        let mut superiors: Vec<UserSummary> = edges
            .iter()
            .filter(|(sup, sub)| *sub == subordinate_id && *sup != subordinate_id)
            .filter_map(|(sup, _)| users.get(sup).map(User::summary))
            .collect();
        superiors.sort_by(|a, b| a.name.cmp(&b.name));
        superiors.dedup_by_key(|u| u.id);

        Ok(superiors)
    }

    async fn users_with_role(&self, role: UserRole) -> Result<Vec<UserSummary>, AppError> {
        let mut users: Vec<UserSummary> = self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.role() == Some(role))
            .map(User::summary)
            .collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(users)
    }

    async fn all_users(&self) -> Result<Vec<UserSummary>, AppError> {
        let mut users: Vec<UserSummary> = self.users.lock().unwrap().values().map(User::summary).collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(users)
    }

    async fn insert_edge(&self, superior_id: Uuid, subordinate_id: Uuid) -> Result<bool, AppError> {
        if self.has_edge(superior_id, subordinate_id) {
            return Ok(false);
        }
        self.add_edge(superior_id, subordinate_id);
        Ok(true)
    }
}

#[async_trait]
impl EstrategiaStore for InMemoryStore {
    async fn fetch_lojas(&self, _produto: Produto, filter: LojaFilter) -> Result<Vec<LojaMetricRow>, AppError> {
        Ok(self
            .lojas
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filter.matches(&row.keys()))
            .cloned()
            .collect())
    }

    async fn fetch_lojas_por_supervisao(
        &self,
        produto: Produto,
        filter: LojaFilter,
    ) -> Result<Vec<LojaMetricRow>, AppError> {
        if !produto.tem_metricas() {
            return Err(AppError::InvalidInput(
                "Métricas gerenciais não disponíveis para este produto".into(),
            ));
        }
        self.fetch_lojas(produto, filter).await
    }
}

#[async_trait]
impl HotlistStore for InMemoryStore {
    async fn list(&self, scope: &UserScope) -> Result<Vec<HotlistItem>, AppError> {
        let mut items: Vec<HotlistItem> = self
            .leads
            .lock()
            .unwrap()
            .iter()
            .filter(|l| in_scope(scope, l.supervisor_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.nome_loja.cmp(&b.nome_loja));

        Ok(items)
    }

    async fn summary(&self, scope: &UserScope) -> Result<HotlistSummary, AppError> {
        let leads = self.leads.lock().unwrap();
        let visiveis: Vec<&HotlistItem> = leads.iter().filter(|l| in_scope(scope, l.supervisor_id)).collect();

        Ok(HotlistSummary {
            total_leads: visiveis.len() as i64,
            leads_pendentes: visiveis.iter().filter(|l| l.situacao == "pendente").count() as i64,
        })
    }

    async fn find_owner(&self, item_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self
            .leads
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.id == item_id)
            .map(|l| l.supervisor_id))
    }

    async fn update_situacao(&self, item_id: Uuid, situacao: HotlistSituacao) -> Result<(), AppError> {
        let mut leads = self.leads.lock().unwrap();
        let lead = leads.iter_mut().find(|l| l.id == item_id).ok_or(AppError::NotFound("Item"))?;
        lead.situacao = situacao.as_str().to_string();
        Ok(())
    }

    async fn registrar_tratativa(
        &self,
        hotlist_id: Uuid,
        user_id: Uuid,
        descricao: &str,
        resultado: ResultadoTratativa,
    ) -> Result<TratativaHotlist, AppError> {
        if HotlistStore::find_owner(self, hotlist_id).await?.is_none() {
            return Err(AppError::NotFound("Item"));
        }

        let tratativa = TratativaHotlist {
            id: Uuid::new_v4(),
            hotlist_id,
            user_id,
            user_name: self.nome(user_id),
            descricao: descricao.to_string(),
            situacao: resultado.as_str().to_string(),
            data_tratativa: Utc::now(),
        };
        self.tratativas.lock().unwrap().push(tratativa.clone());
        self.update_situacao(hotlist_id, resultado.situacao_do_lead()).await?;

        Ok(tratativa)
    }

    async fn list_tratativas(&self, hotlist_id: Uuid) -> Result<Vec<TratativaHotlist>, AppError> {
        Ok(self.tratativas_do_lead(hotlist_id))
    }
}

#[async_trait]
impl EventsStore for InMemoryStore {
    async fn list(&self, scope: &UserScope) -> Result<Vec<Evento>, AppError> {
        let mut eventos: Vec<Evento> = self
            .eventos
            .lock()
            .unwrap()
            .iter()
            .filter(|e| in_scope(scope, e.supervisor_id))
            .cloned()
            .collect();
        eventos.sort_by(|a, b| b.data_inicio.cmp(&a.data_inicio));

        Ok(eventos)
    }

    async fn find(&self, evento_id: Uuid) -> Result<Option<Evento>, AppError> {
        Ok(self.eventos.lock().unwrap().iter().find(|e| e.id == evento_id).cloned())
    }

    async fn find_owner(&self, evento_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(EventsStore::find(self, evento_id).await?.map(|e| e.supervisor_id))
    }

    async fn create(&self, payload: &EventoPayload, supervisor_id: Uuid, creator_id: Uuid) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.eventos.lock().unwrap().push(Evento {
            id,
            titulo: payload.titulo.clone(),
            descricao: payload.descricao.clone(),
            data_inicio: payload.data_inicio,
            data_fim: payload.data_fim,
            tipo: payload.tipo.clone(),
            location: payload.location.clone(),
            municipio: payload.municipio.clone(),
            uf: payload.uf.clone(),
            tratativa: String::new(),
            supervisor_id,
            supervisor_name: self.nome(supervisor_id),
            creator_id,
            is_owner: false,
        });
        Ok(id)
    }

    async fn update(&self, evento_id: Uuid, payload: &EventoPayload, supervisor_id: Uuid) -> Result<(), AppError> {
        let supervisor_name = self.nome(supervisor_id);
        let mut eventos = self.eventos.lock().unwrap();
        let evento = eventos.iter_mut().find(|e| e.id == evento_id).ok_or(AppError::NotFound("Evento"))?;

        evento.titulo = payload.titulo.clone();
        evento.descricao = payload.descricao.clone();
        evento.data_inicio = payload.data_inicio;
        evento.data_fim = payload.data_fim;
        evento.tipo = payload.tipo.clone();
        evento.location = payload.location.clone();
        evento.municipio = payload.municipio.clone();
        evento.uf = payload.uf.clone();
        if let Some(tratativa) = &payload.tratativa {
            evento.tratativa = tratativa.clone();
        }
        evento.supervisor_id = supervisor_id;
        evento.supervisor_name = supervisor_name;

        Ok(())
    }

    async fn update_feedback(&self, evento_id: Uuid, tratativa: &str) -> Result<(), AppError> {
        let mut eventos = self.eventos.lock().unwrap();
        let evento = eventos.iter_mut().find(|e| e.id == evento_id).ok_or(AppError::NotFound("Evento"))?;
        evento.tratativa = tratativa.to_string();
        Ok(())
    }

    async fn delete(&self, evento_id: Uuid) -> Result<(), AppError> {
        let mut eventos = self.eventos.lock().unwrap();
        let antes = eventos.len();
        eventos.retain(|e| e.id != evento_id);
        if eventos.len() == antes {
            return Err(AppError::NotFound("Evento"));
        }
        Ok(())
    }
}

#[async_trait]
impl AcoesStore for InMemoryStore {
    async fn list(&self, scope: &UserScope) -> Result<Vec<AcaoDiaria>, AppError> {
        let mut acoes: Vec<AcaoDiaria> = self
            .acoes
            .lock()
            .unwrap()
            .iter()
            .filter(|a| in_scope(scope, a.user_id))
            .cloned()
            .collect();
        // Prazo ausente vai para o fim, como NULLS LAST
        acoes.sort_by_key(|a| (prioridade_rank(&a.prioridade), a.data_limite.is_none(), a.data_limite));

        Ok(acoes)
    }

    async fn find_owner(&self, acao_id: Uuid) -> Result<Option<Uuid>, AppError> {
        Ok(self.acao(acao_id).map(|a| a.user_id))
    }

    async fn update(&self, acao_id: Uuid, payload: &UpdateAcaoPayload) -> Result<(), AppError> {
        let mut acoes = self.acoes.lock().unwrap();
        let acao = acoes.iter_mut().find(|a| a.id == acao_id).ok_or(AppError::NotFound("Ação diária"))?;

        if let Some(situacao) = payload.situacao {
            acao.situacao = situacao.as_str().to_string();
        }
        if let Some(observacoes) = &payload.observacoes {
            acao.observacoes = Some(observacoes.clone());
        }
        if payload.data_conclusao.is_some() {
            acao.data_conclusao = payload.data_conclusao;
        }
        acao.data_atualizacao = Utc::now();

        Ok(())
    }
}

#[async_trait]
impl TratativasPontosStore for InMemoryStore {
    async fn loja_no_escopo(&self, chave_loja: i64, filter: LojaFilter) -> Result<bool, AppError> {
        Ok(self
            .lojas
            .lock()
            .unwrap()
            .iter()
            .any(|row| row.chave_loja == chave_loja && filter.matches(&row.keys())))
    }

    async fn insert(
        &self,
        payload: &CreateTratativaPontoPayload,
        usuario_id: Uuid,
        nome_usuario: &str,
    ) -> Result<TratativaPontoAtivo, AppError> {
        let tratativa = TratativaPontoAtivo {
            id: Uuid::new_v4(),
            chave_loja: payload.chave_loja,
            usuario_id,
            nome_usuario: nome_usuario.to_string(),
            data_contato: payload.data_contato,
            foi_tratado: payload.foi_tratado.as_str().to_string(),
            descricao_tratativa: payload.descricao_tratativa.clone(),
            quando_volta_operar: payload.quando_volta_operar,
            situacao: payload.situacao.as_str().to_string(),
            tipo: "pontos-ativos".into(),
            data_registro: Utc::now(),
        };
        self.tratativas_pontos.lock().unwrap().push(tratativa.clone());

        Ok(tratativa)
    }

    async fn list_por_loja(&self, chave_loja: i64) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        Ok(self
            .tratativas_pontos
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| t.chave_loja == chave_loja)
            .cloned()
            .collect())
    }

    async fn list(
        &self,
        filter: LojaFilter,
        filtro: &TratativaPontoFiltro,
    ) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        let lojas = self.lojas.lock().unwrap();
        let visivel = |chave: i64| lojas.iter().any(|row| row.chave_loja == chave && filter.matches(&row.keys()));

        Ok(self
            .tratativas_pontos
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|t| visivel(t.chave_loja))
            .filter(|t| filtro.foi_tratado.map_or(true, |f| t.foi_tratado == f.as_str()))
            .filter(|t| filtro.situacao.map_or(true, |s| t.situacao == s.as_str()))
            .filter(|t| filtro.data_inicio.map_or(true, |d| t.data_contato >= d))
            .filter(|t| filtro.data_fim.map_or(true, |d| t.data_contato <= d))
            .skip(filtro.deslocamento() as usize)
            .take(filtro.limite() as usize)
            .cloned()
            .collect())
    }
}
