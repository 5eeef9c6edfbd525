// src/services/pontos_ativos_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::TratativasPontosStore,
    models::{
        auth::User,
        hierarchy::LojaFilter,
        pontos_ativos::{CreateTratativaPontoPayload, TratativaPontoAtivo, TratativaPontoFiltro},
    },
    services::estrategia_service::escopo,
};

#[derive(Clone)]
pub struct TratativasPontosService {
    store: Arc<dyn TratativasPontosStore>,
}

impl TratativasPontosService {
    pub fn new(store: Arc<dyn TratativasPontosStore>) -> Self {
        Self { store }
    }

    pub async fn registrar(
        &self,
        user: &User,
        payload: &CreateTratativaPontoPayload,
    ) -> Result<TratativaPontoAtivo, AppError> {
        self.autorizar_loja(user, payload.chave_loja).await?;

        let tratativa = self.store.insert(payload, user.id, &user.name).await?;

        tracing::info!(
            "📍 Tratativa {} do ponto {} registrada por {}",
            tratativa.id, payload.chave_loja, user.funcional
        );

        Ok(tratativa)
    }

    pub async fn historico(&self, user: &User, chave_loja: i64) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        self.autorizar_loja(user, chave_loja).await?;
        self.store.list_por_loja(chave_loja).await
    }

    pub async fn list(
        &self,
        user: &User,
        filtro: &TratativaPontoFiltro,
    ) -> Result<Vec<TratativaPontoAtivo>, AppError> {
        let filter = escopo(user)?;
        self.store.list(filter, filtro).await
    }

    // Loja inexistente só aparece como NotFound para quem enxerga todas
    async fn autorizar_loja(&self, user: &User, chave_loja: i64) -> Result<(), AppError> {
        let filter = escopo(user)?;

        if self.store.loja_no_escopo(chave_loja, filter).await? {
            return Ok(());
        }

        match filter {
            LojaFilter::Todas => Err(AppError::NotFound("Loja")),
            _ => Err(AppError::forbidden("Loja fora do escopo do usuário")),
        }
    }
}
