// src/models/hierarchy.rs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Papéis reconhecidos pelo sistema. Qualquer outro texto vindo do banco ou do
/// token vira `None` em [`UserRole::parse`] e não recebe acesso algum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Gerente,
    Coordenador,
    Supervisor,
}

impl UserRole {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(UserRole::Admin),
            "gerente" => Some(UserRole::Gerente),
            "coordenador" => Some(UserRole::Coordenador),
            "supervisor" => Some(UserRole::Supervisor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Gerente => "gerente",
            UserRole::Coordenador => "coordenador",
            UserRole::Supervisor => "supervisor",
        }
    }
}

/// Coluna da tabela de lojas que registra a chave de cada nível hierárquico.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HierarchyColumn {
    GerenciaArea,
    Coordenacao,
    Supervisao,
}

impl HierarchyColumn {
    pub fn column_name(&self) -> &'static str {
        match self {
            HierarchyColumn::GerenciaArea => "l.chave_gerencia_area",
            HierarchyColumn::Coordenacao => "l.chave_coordenacao",
            HierarchyColumn::Supervisao => "l.chave_supervisao",
        }
    }
}

/// As três chaves hierárquicas de uma loja (o store em memória filtra por elas).
#[cfg(test)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LojaKeys {
    pub chave_gerencia_area: Option<i64>,
    pub chave_coordenacao: Option<i64>,
    pub chave_supervisao: Option<i64>,
}

/// Predicado de visibilidade sobre lojas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LojaFilter {
    Todas,
    Coluna(HierarchyColumn, i64),
    Nenhuma,
}

impl LojaFilter {
    /// Mesmo predicado que o repositório aplica em SQL.
    #[cfg(test)]
    pub fn matches(&self, keys: &LojaKeys) -> bool {
        match self {
            LojaFilter::Todas => true,
            LojaFilter::Nenhuma => false,
            LojaFilter::Coluna(column, chave) => {
                let value = match column {
                    HierarchyColumn::GerenciaArea => keys.chave_gerencia_area,
                    HierarchyColumn::Coordenacao => keys.chave_coordenacao,
                    HierarchyColumn::Supervisao => keys.chave_supervisao,
                };
                value == Some(*chave)
            }
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, LojaFilter::Nenhuma)
    }
}

/// Conjunto de usuários cujos registros (hotlist, eventos) o chamador enxerga.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserScope {
    Todos,
    Usuarios(HashSet<Uuid>),
}

// Usuário como aparece nas consultas de hierarquia (sem credenciais)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: Uuid,
    #[schema(example = "Maria Santos")]
    pub name: String,
    #[schema(example = "67890")]
    pub funcional: String,
    #[schema(example = "coordenador")]
    pub role: String,
    pub email: Option<String>,
    pub chave: Option<i64>,
}

impl UserSummary {
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectEdgesReport {
    pub criadas: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_only_known_roles() {
        assert_eq!(UserRole::parse("gerente"), Some(UserRole::Gerente));
        assert_eq!(UserRole::parse(" Supervisor "), Some(UserRole::Supervisor));
        assert_eq!(UserRole::parse("auditor"), None);
        assert_eq!(UserRole::parse(""), None);
    }

    #[test]
    fn filter_matches_role_column_only() {
        let keys = LojaKeys {
            chave_gerencia_area: Some(10),
            chave_coordenacao: Some(20),
            chave_supervisao: Some(30),
        };

        assert!(LojaFilter::Todas.matches(&keys));
        assert!(!LojaFilter::Nenhuma.matches(&keys));
        assert!(LojaFilter::Coluna(HierarchyColumn::Coordenacao, 20).matches(&keys));
        assert!(!LojaFilter::Coluna(HierarchyColumn::Supervisao, 20).matches(&keys));
        assert!(!LojaFilter::Coluna(HierarchyColumn::GerenciaArea, 10).matches(&LojaKeys::default()));
    }
}
