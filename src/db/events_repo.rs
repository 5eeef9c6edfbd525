// src/db/events_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        events::{Evento, EventoPayload},
        hierarchy::UserScope,
    },
};

#[async_trait]
pub trait EventsStore: Send + Sync {
    /// Eventos dos supervisores do escopo, mais recentes primeiro.
    async fn list(&self, scope: &UserScope) -> Result<Vec<Evento>, AppError>;

    async fn find(&self, evento_id: Uuid) -> Result<Option<Evento>, AppError>;

    async fn find_owner(&self, evento_id: Uuid) -> Result<Option<Uuid>, AppError>;

    async fn create(&self, payload: &EventoPayload, supervisor_id: Uuid, creator_id: Uuid) -> Result<Uuid, AppError>;

    async fn update(&self, evento_id: Uuid, payload: &EventoPayload, supervisor_id: Uuid) -> Result<(), AppError>;

    async fn update_feedback(&self, evento_id: Uuid, tratativa: &str) -> Result<(), AppError>;

    async fn delete(&self, evento_id: Uuid) -> Result<(), AppError>;
}

const EVENTO_SELECT: &str = r#"
    SELECT
        e.id, e.title AS titulo, e.description AS descricao,
        e.start_date AS data_inicio, e.end_date AS data_fim,
        e.event_type AS tipo, e.location, e.municipality AS municipio,
        e.state AS uf, e.feedback AS tratativa,
        e.supervisor_id, u.name AS supervisor_name, e.creator_id
    FROM eventos e
    LEFT JOIN users u ON u.id = e.supervisor_id
"#;

#[derive(Clone)]
pub struct EventsRepository {
    pool: PgPool,
}

impl EventsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventsStore for EventsRepository {
    async fn list(&self, scope: &UserScope) -> Result<Vec<Evento>, AppError> {
        let mut builder = QueryBuilder::<Postgres>::new(EVENTO_SELECT);
        builder.push(" WHERE 1 = 1");
        if let UserScope::Usuarios(ids) = scope {
            let ids: Vec<Uuid> = ids.iter().copied().collect();
            builder.push(" AND e.supervisor_id = ANY(").push_bind(ids).push(")");
        }
        builder.push(" ORDER BY e.start_date DESC");

        let eventos = builder
            .build_query_as::<Evento>()
            .fetch_all(&self.pool)
            .await?;

        Ok(eventos)
    }

    async fn find(&self, evento_id: Uuid) -> Result<Option<Evento>, AppError> {
        let sql = format!("{EVENTO_SELECT} WHERE e.id = $1");
        let evento = sqlx::query_as::<_, Evento>(&sql)
            .bind(evento_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(evento)
    }

    async fn find_owner(&self, evento_id: Uuid) -> Result<Option<Uuid>, AppError> {
        let owner = sqlx::query_scalar::<_, Uuid>("SELECT supervisor_id FROM eventos WHERE id = $1")
            .bind(evento_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    async fn create(
        &self,
        payload: &EventoPayload,
        supervisor_id: Uuid,
        creator_id: Uuid,
    ) -> Result<Uuid, AppError> {
        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO eventos (
                title, description, start_date, end_date, event_type,
                location, municipality, state, supervisor_id, creator_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
            .bind(&payload.titulo)
            .bind(&payload.descricao)
            .bind(payload.data_inicio)
            .bind(payload.data_fim)
            .bind(&payload.tipo)
            .bind(&payload.location)
            .bind(&payload.municipio)
            .bind(&payload.uf)
            .bind(supervisor_id)
            .bind(creator_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn update(&self, evento_id: Uuid, payload: &EventoPayload, supervisor_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE eventos SET
                title = $1, description = $2, start_date = $3, end_date = $4,
                event_type = $5, location = $6, municipality = $7, state = $8,
                feedback = COALESCE($9, feedback),
                supervisor_id = $10, updated_at = now()
            WHERE id = $11
            "#,
        )
            .bind(&payload.titulo)
            .bind(&payload.descricao)
            .bind(payload.data_inicio)
            .bind(payload.data_fim)
            .bind(&payload.tipo)
            .bind(&payload.location)
            .bind(&payload.municipio)
            .bind(&payload.uf)
            .bind(payload.tratativa.as_deref())
            .bind(supervisor_id)
            .bind(evento_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Evento"));
        }

        Ok(())
    }

    async fn update_feedback(&self, evento_id: Uuid, tratativa: &str) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE eventos SET feedback = $1, updated_at = now() WHERE id = $2",
        )
            .bind(tratativa)
            .bind(evento_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Evento"));
        }

        Ok(())
    }

    async fn delete(&self, evento_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM eventos WHERE id = $1")
            .bind(evento_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Evento"));
        }

        Ok(())
    }
}
