// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::validate,

        // --- Users ---
        handlers::users::get_me,
        handlers::users::get_all_users,
        handlers::users::get_user,
        handlers::users::get_superior,
        handlers::users::get_subordinates,
        handlers::users::get_supervisors,

        // --- Hierarchy ---
        handlers::hierarchy::materialize_direct_edges,

        // --- Estratégia ---
        handlers::estrategia::get_estrategia,
        handlers::estrategia::get_metricas,
        handlers::estrategia::get_metricas_gerenciais,
        handlers::estrategia::get_cascata,

        // --- Hotlist ---
        handlers::hotlist::list_hotlist,
        handlers::hotlist::get_summary,
        handlers::hotlist::update_hotlist,
        handlers::hotlist::create_tratativa,
        handlers::hotlist::list_tratativas,

        // --- Eventos ---
        handlers::events::list_events,
        handlers::events::create_event,
        handlers::events::get_event,
        handlers::events::update_event,
        handlers::events::update_feedback,
        handlers::events::delete_event,

        // --- Ações diárias ---
        handlers::acoes::list_acoes,
        handlers::acoes::list_acoes_equipe,
        handlers::acoes::update_acao,

        // --- Tratativas de pontos ativos ---
        handlers::pontos_ativos::create_tratativa_ponto,
        handlers::pontos_ativos::list_tratativas_pontos,
        handlers::pontos_ativos::list_tratativas_da_loja,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Hierarchy ---
            models::hierarchy::UserRole,
            models::hierarchy::UserSummary,
            models::hierarchy::DirectEdgesReport,

            // --- Estratégia ---
            models::estrategia::Produto,
            models::estrategia::TrendTag,
            models::estrategia::LojaSituacao,
            models::estrategia::LojaAnalitica,
            models::estrategia::EstrategiaResponse,
            models::estrategia::TrendTally,
            models::estrategia::AggregateMetrics,
            models::estrategia::MetricasResponse,
            models::estrategia::SupervisorMetricas,
            models::estrategia::SupervisorRollup,
            models::estrategia::MetricasGerenciaisResponse,
            models::estrategia::Variacao,
            models::estrategia::BloqueioMotivo,
            models::estrategia::DiasInoperantes,
            models::estrategia::CascataPontosAtivos,

            // --- Hotlist ---
            models::hotlist::HotlistItem,
            models::hotlist::HotlistSituacao,
            models::hotlist::ResultadoTratativa,
            models::hotlist::UpdateHotlistPayload,
            models::hotlist::CreateTratativaPayload,
            models::hotlist::TratativaHotlist,
            models::hotlist::HotlistSummary,

            // --- Eventos ---
            models::events::Evento,
            models::events::EventoPayload,
            models::events::FeedbackPayload,
            models::events::EventoCriado,

            // --- Ações diárias ---
            models::acoes::AcaoDiaria,
            models::acoes::AcaoSituacao,
            models::acoes::UpdateAcaoPayload,

            // --- Tratativas de pontos ativos ---
            models::pontos_ativos::TratativaPontoAtivo,
            models::pontos_ativos::FoiTratado,
            models::pontos_ativos::SituacaoTratativaPonto,
            models::pontos_ativos::CreateTratativaPontoPayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação por funcional e senha"),
        (name = "Users", description = "Usuário atual e hierarquia"),
        (name = "Hierarchy", description = "Manutenção das arestas diretas gerente → supervisor"),
        (name = "Estratégia", description = "Lojas, tendências e métricas por produto"),
        (name = "Hotlist", description = "Leads de prospecção e tratativas"),
        (name = "Eventos", description = "Agenda de eventos dos supervisores"),
        (name = "Ações Diárias", description = "Ações de contato atribuídas a cada usuário"),
        (name = "Pontos Ativos", description = "Tratativas de pontos que deixaram de operar")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_group() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/api/auth/login",
            "/api/estrategia/{produto}/metricas-gerenciais",
            "/api/pontos-ativos/cascata",
            "/api/hotlist/tratativa",
            "/api/events/{id}/feedback",
            "/api/hierarchy/direct-edges",
            "/api/users/{id}/superior",
            "/api/acoes-diarias/equipe",
            "/api/tratativas-pontos-ativos/{chave_loja}",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "{expected}");
        }
    }
}
