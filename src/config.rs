// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{
        AcoesRepository, EstrategiaRepository, EventsRepository, HierarchyRepository, HotlistRepository,
        TratativasPontosRepository, UserRepository,
    },
    services::{
        acoes_service::AcoesService, auth::AuthService, estrategia_service::EstrategiaService,
        events_service::EventsService, hierarchy_service::HierarchyService, hotlist_service::HotlistService,
        pontos_ativos_service::TratativasPontosService,
    },
};

// Configuração lida do ambiente (.env é carregado antes)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(value) => value.parse().context("PORT deve ser um número")?,
            Err(_) => 3001,
        };
        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };

        Ok(Self { database_url, jwt_secret, host, port, db_max_connections })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub hierarchy_service: HierarchyService,
    pub estrategia_service: EstrategiaService,
    pub hotlist_service: HotlistService,
    pub events_service: EventsService,
    pub acoes_service: AcoesService,
    pub tratativas_pontos_service: TratativasPontosService,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let auth_service = AuthService::new(
            Arc::new(UserRepository::new(db_pool.clone())),
            config.jwt_secret.clone(),
        );

        let hierarchy_service = HierarchyService::new(Arc::new(HierarchyRepository::new(db_pool.clone())));
        let estrategia_service = EstrategiaService::new(Arc::new(EstrategiaRepository::new(db_pool.clone())));

        let hotlist_service = HotlistService::new(
            Arc::new(HotlistRepository::new(db_pool.clone())),
            hierarchy_service.clone(),
        );
        let events_service = EventsService::new(
            Arc::new(EventsRepository::new(db_pool.clone())),
            hierarchy_service.clone(),
        );
        let acoes_service = AcoesService::new(
            Arc::new(AcoesRepository::new(db_pool.clone())),
            hierarchy_service.clone(),
        );
        let tratativas_pontos_service =
            TratativasPontosService::new(Arc::new(TratativasPontosRepository::new(db_pool.clone())));

        Ok(Self {
            db_pool,
            auth_service,
            hierarchy_service,
            estrategia_service,
            hotlist_service,
            events_service,
            acoes_service,
            tratativas_pontos_service,
        })
    }
}
