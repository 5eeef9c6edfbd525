pub mod acoes_service;
pub mod auth;
pub mod estrategia_service;
pub mod events_service;
pub mod hierarchy_service;
pub mod hotlist_service;
pub mod metricas;
pub mod pontos_ativos_service;
pub mod tendencia;
