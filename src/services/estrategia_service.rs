// src/services/estrategia_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::EstrategiaStore,
    models::{
        auth::User,
        estrategia::{
            CascataPontosAtivos, EstrategiaResponse, LojaAnalitica, LojaMetricRow, LojaSituacao,
            MetricasGerenciaisResponse, MetricasResponse, Produto,
        },
        hierarchy::{LojaFilter, UserRole},
    },
    services::{
        hierarchy_service::HierarchyService,
        metricas::{build_aggregate, build_cascata, build_supervisor_rollup},
        tendencia::classify_counts,
    },
};

#[derive(Clone)]
pub struct EstrategiaService {
    store: Arc<dyn EstrategiaStore>,
}

impl EstrategiaService {
    pub fn new(store: Arc<dyn EstrategiaStore>) -> Self {
        Self { store }
    }

    pub async fn get_estrategia(&self, user: &User, produto: Produto) -> Result<EstrategiaResponse, AppError> {
        let filter = escopo(user)?;
        let rows = self.store.fetch_lojas(produto, filter).await?;

        tracing::debug!("📊 {:?}: {} lojas para {}", produto, rows.len(), user.funcional);

        let dados_analiticos: Vec<LojaAnalitica> = rows.into_iter().map(linha_analitica).collect();

        Ok(EstrategiaResponse {
            produto,
            user_role: user.role.clone(),
            user_chave: user.chave,
            total_lojas: dados_analiticos.len(),
            dados_analiticos,
        })
    }

    pub async fn get_metricas(&self, user: &User, produto: Produto) -> Result<MetricasResponse, AppError> {
        if !produto.tem_metricas() {
            return Err(AppError::InvalidInput("Métricas não disponíveis para este produto".into()));
        }

        let filter = escopo(user)?;
        let rows = self.store.fetch_lojas(produto, filter).await?;
        let counts: Vec<_> = rows.iter().map(LojaMetricRow::counts).collect();

        Ok(MetricasResponse {
            metricas: build_aggregate(&counts),
            produto,
            user_role: user.role.clone(),
            user_chave: user.chave,
        })
    }

    pub async fn get_metricas_gerenciais(
        &self,
        user: &User,
        produto: Produto,
    ) -> Result<MetricasGerenciaisResponse, AppError> {
        if !matches!(user.role(), Some(UserRole::Gerente) | Some(UserRole::Coordenador)) {
            return Err(AppError::forbidden("Acesso permitido apenas para gerentes e coordenadores"));
        }

        let filter = escopo(user)?;
        let rows = self.store.fetch_lojas_por_supervisao(produto, filter).await?;

        Ok(MetricasGerenciaisResponse {
            produto,
            user_role: user.role.clone(),
            user_chave: user.chave,
            metricas_gerenciais: build_supervisor_rollup(&rows),
        })
    }

    pub async fn get_cascata(&self, user: &User) -> Result<CascataPontosAtivos, AppError> {
        let filter = escopo(user)?;
        let rows = self.store.fetch_lojas(Produto::PontosAtivos, filter).await?;

        Ok(build_cascata(&rows))
    }
}

// Filtro hierárquico do usuário; sem escopo é negação explícita
pub(crate) fn escopo(user: &User) -> Result<LojaFilter, AppError> {
    let filter = HierarchyService::resolve_filter_for_role(user.role(), user.chave);

    if filter.is_nothing() {
        return Err(AppError::forbidden(format!(
            "Usuário {} sem escopo hierárquico (papel '{}', chave {:?})",
            user.funcional, user.role, user.chave
        )));
    }

    Ok(filter)
}

fn linha_analitica(row: LojaMetricRow) -> LojaAnalitica {
    let counts = row.counts();

    LojaAnalitica {
        chave_loja: row.chave_loja.to_string(),
        cnpj: row.cnpj.unwrap_or_default(),
        nome_loja: row.nome_loja.unwrap_or_default(),
        mes_m3: counts.m3,
        mes_m2: counts.m2,
        mes_m1: counts.m1,
        mes_m0: counts.m0,
        tendencia: classify_counts(&counts),
        situacao: LojaSituacao::from_db(row.situacao.as_deref()),
        categoria: row.categoria,
        data_ult_trx_contabil: row.dt_ult_ab_conta,
        data_ult_trx_negocio: row.dt_ult_transacao,
        data_inauguracao: row.dt_inauguracao,
        data_bloqueio: row.dt_bloqueio,
        motivo_bloqueio: row.motivo_bloqueio,
        agencia: row.cod_ag_relacionamento.unwrap_or_default(),
        nome_agencia: row.ag_relacionamento.unwrap_or_default(),
        telefone_loja: row.telefone_padrao.unwrap_or_default(),
        nome_contato: row.gte_resp_loja.unwrap_or_default(),
        endereco: row.endereco.unwrap_or_default(),
        municipio: row.municipio.unwrap_or_default(),
        uf: row.uf.unwrap_or_default(),
        diretoria_regional: row.dir_regional.unwrap_or_default(),
        gerencia_regional: row.ger_regional.unwrap_or_default(),
        gerente_area: row.desc_gerencia_area.unwrap_or_default(),
        coordenador: row.desc_coordenacao.unwrap_or_default(),
        supervisor: row.nome_supervisor.or(row.desc_supervisao).unwrap_or_default(),
        saldo_cx: row.saldo_cx,
        limite: row.limite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::in_memory::InMemoryStore, models::estrategia::TrendTag};
    use chrono::Utc;
    use uuid::Uuid;

    fn user(role: &str, chave: Option<i64>) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Teste".into(),
            funcional: "99999".into(),
            password_hash: String::new(),
            role: role.into(),
            email: None,
            chave,
            created_at: Utc::now(),
        }
    }

    fn loja(chave: i64, supervisao: i64, coordenacao: i64, gerencia: i64, m: [i32; 4]) -> LojaMetricRow {
        LojaMetricRow {
            chave_loja: chave,
            nome_loja: Some(format!("Loja {chave}")),
            chave_supervisao: Some(supervisao),
            desc_supervisao: Some(format!("SUP {supervisao}")),
            chave_coordenacao: Some(coordenacao),
            chave_gerencia_area: Some(gerencia),
            mes_m3: Some(m[0]),
            mes_m2: Some(m[1]),
            mes_m1: Some(m[2]),
            mes_m0: Some(m[3]),
            ..Default::default()
        }
    }

    fn service() -> EstrategiaService {
        let store = Arc::new(InMemoryStore::new());
        store.add_loja(loja(1, 10, 100, 1000, [0, 0, 100, 70]));
        store.add_loja(loja(2, 10, 100, 1000, [0, 0, 0, 8]));
        store.add_loja(loja(3, 20, 100, 1000, [0, 5, 0, 0]));
        store.add_loja(loja(4, 30, 200, 1000, [0, 3, 10, 10]));
        store.add_loja(loja(5, 40, 300, 2000, [0, 0, 4, 9]));
        EstrategiaService::new(store)
    }

    #[tokio::test]
    async fn each_role_sees_only_its_column() {
        let s = service();

        let sup = s.get_estrategia(&user("supervisor", Some(10)), Produto::Credito).await.unwrap();
        assert_eq!(sup.total_lojas, 2);

        let coord = s.get_estrategia(&user("coordenador", Some(100)), Produto::Credito).await.unwrap();
        assert_eq!(coord.total_lojas, 3);

        let gerente = s.get_estrategia(&user("gerente", Some(1000)), Produto::Credito).await.unwrap();
        assert_eq!(gerente.total_lojas, 4);

        let admin = s.get_estrategia(&user("admin", None), Produto::Credito).await.unwrap();
        assert_eq!(admin.total_lojas, 5);
    }

    #[tokio::test]
    async fn missing_scope_is_an_explicit_denial() {
        let s = service();

        let sem_chave = s.get_estrategia(&user("supervisor", None), Produto::Credito).await;
        assert!(matches!(sem_chave, Err(AppError::Forbidden(_))));

        let desconhecido = s.get_metricas(&user("auditor", Some(10)), Produto::Credito).await;
        assert!(matches!(desconhecido, Err(AppError::Forbidden(_))));

        let cascata = s.get_cascata(&user("gerente", None)).await;
        assert!(matches!(cascata, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn rows_carry_the_same_tag_as_the_classifier() {
        let s = service();
        let resp = s.get_estrategia(&user("coordenador", Some(100)), Produto::Credito).await.unwrap();

        let tags: Vec<(String, TrendTag)> = resp
            .dados_analiticos
            .iter()
            .map(|l| (l.chave_loja.clone(), l.tendencia))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("1".to_string(), TrendTag::Queda),
                ("2".to_string(), TrendTag::Comecando),
                ("3".to_string(), TrendTag::Atencao),
            ]
        );
        assert_eq!(resp.dados_analiticos[0].supervisor, "SUP 10");
    }

    #[tokio::test]
    async fn metrics_tally_matches_row_tags() {
        let s = service();
        let u = user("gerente", Some(1000));

        let linhas = s.get_estrategia(&u, Produto::AberturaConta).await.unwrap();
        let metricas = s.get_metricas(&u, Produto::AberturaConta).await.unwrap().metricas;

        let mut tally = crate::models::estrategia::TrendTally::default();
        for l in &linhas.dados_analiticos {
            tally.record(l.tendencia);
        }
        assert_eq!(metricas.tendencias, tally);
        assert_eq!(metricas.total_lojas, linhas.total_lojas as u64);
    }

    #[tokio::test]
    async fn metrics_require_a_metric_backed_product() {
        let s = service();
        let resp = s.get_metricas(&user("admin", None), Produto::PontosBloqueados).await;
        assert!(matches!(resp, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn managerial_view_is_for_managers_and_coordinators() {
        let s = service();

        for role in ["supervisor", "admin"] {
            let resp = s.get_metricas_gerenciais(&user(role, Some(10)), Produto::Credito).await;
            assert!(matches!(resp, Err(AppError::Forbidden(_))), "{role}");
        }

        let resp = s
            .get_metricas_gerenciais(&user("coordenador", Some(100)), Produto::Credito)
            .await
            .unwrap();
        let chaves: Vec<Option<i64>> = resp.metricas_gerenciais.iter().map(|r| r.chave_supervisao).collect();
        assert_eq!(chaves, vec![Some(10), Some(20)]);
        assert_eq!(resp.metricas_gerenciais[0].metricas.agregado.total_lojas, 2);
    }
}
