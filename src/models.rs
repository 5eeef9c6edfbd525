pub mod acoes;
pub mod auth;
pub mod estrategia;
pub mod events;
pub mod hierarchy;
pub mod hotlist;
pub mod pontos_ativos;
