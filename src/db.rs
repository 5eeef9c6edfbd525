pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};
pub mod hierarchy_repo;
pub use hierarchy_repo::{HierarchyRepository, HierarchyStore};
pub mod estrategia_repo;
pub use estrategia_repo::{EstrategiaRepository, EstrategiaStore};
pub mod hotlist_repo;
pub use hotlist_repo::{HotlistRepository, HotlistStore};
pub mod events_repo;
pub use events_repo::{EventsRepository, EventsStore};
pub mod acoes_repo;
pub use acoes_repo::{AcoesRepository, AcoesStore};
pub mod pontos_ativos_repo;
pub use pontos_ativos_repo::{TratativasPontosRepository, TratativasPontosStore};

#[cfg(test)]
pub mod in_memory;
