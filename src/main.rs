//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = Config::from_env()?;
    let app_state = AppState::new(&config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let app = router(app_state);

    let listener = TcpListener::bind(config.bind_address()).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(app_state: AppState) -> Router {
    // Só o login é público; route_layer protege as rotas declaradas antes dele
    let auth_routes = Router::new()
        .route("/validate", get(handlers::auth::validate))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/me", get(handlers::users::get_me))
        .route("/all", get(handlers::users::get_all_users))
        .route("/{id}", get(handlers::users::get_user))
        .route("/{id}/superior", get(handlers::users::get_superior))
        .route("/{id}/subordinates", get(handlers::users::get_subordinates))
        .route("/{id}/supervisors", get(handlers::users::get_supervisors));

    let hierarchy_routes = Router::new()
        .route("/direct-edges", post(handlers::hierarchy::materialize_direct_edges));

    let estrategia_routes = Router::new()
        .route("/{produto}", get(handlers::estrategia::get_estrategia))
        .route("/{produto}/metricas", get(handlers::estrategia::get_metricas))
        .route(
            "/{produto}/metricas-gerenciais",
            get(handlers::estrategia::get_metricas_gerenciais),
        );

    let pontos_ativos_routes = Router::new()
        .route("/cascata", get(handlers::estrategia::get_cascata));

    let hotlist_routes = Router::new()
        .route("/", get(handlers::hotlist::list_hotlist))
        .route("/summary", get(handlers::hotlist::get_summary))
        .route("/tratativa", post(handlers::hotlist::create_tratativa))
        .route("/{id}", patch(handlers::hotlist::update_hotlist))
        .route("/{id}/tratativas", get(handlers::hotlist::list_tratativas));

    let event_routes = Router::new()
        .route(
            "/",
            get(handlers::events::list_events).post(handlers::events::create_event),
        )
        .route(
            "/{id}",
            get(handlers::events::get_event)
                .put(handlers::events::update_event)
                .delete(handlers::events::delete_event),
        )
        .route("/{id}/feedback", patch(handlers::events::update_feedback));

    let acoes_routes = Router::new()
        .route("/", get(handlers::acoes::list_acoes))
        .route("/equipe", get(handlers::acoes::list_acoes_equipe))
        .route("/{id}", patch(handlers::acoes::update_acao));

    let tratativas_pontos_routes = Router::new()
        .route(
            "/",
            get(handlers::pontos_ativos::list_tratativas_pontos)
                .post(handlers::pontos_ativos::create_tratativa_ponto),
        )
        .route("/{chave_loja}", get(handlers::pontos_ativos::list_tratativas_da_loja));

    let protected = Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/hierarchy", hierarchy_routes)
        .nest("/api/estrategia", estrategia_routes)
        .nest("/api/pontos-ativos", pontos_ativos_routes)
        .nest("/api/hotlist", hotlist_routes)
        .nest("/api/events", event_routes)
        .nest("/api/acoes-diarias", acoes_routes)
        .nest("/api/tratativas-pontos-ativos", tratativas_pontos_routes)
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .merge(protected)
        .with_state(app_state)
}
