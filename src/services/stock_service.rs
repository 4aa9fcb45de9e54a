// src/services/stock_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, Sqlite};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, StockRepository},
    models::stock::{ledger_balance, StockMovement, StockMovementPayload, StockMovementView, StockReconciliation},
};

#[derive(Clone)]
pub struct StockService {
    catalog_repo: CatalogRepository,
    stock_repo: StockRepository,
}

impl StockService {
    pub fn new(catalog_repo: CatalogRepository, stock_repo: StockRepository) -> Self {
        Self { catalog_repo, stock_repo }
    }

    fn validate_payload(payload: &StockMovementPayload) -> Result<(), AppError> {
        // Validação padrão do Validator
        payload.validate()?;

        // Nossa validação de consistência manual
        payload.validate_consistency().map_err(|e| {
            let mut errors = validator::ValidationErrors::new();
            errors.add("quantity", e);
            AppError::ValidationError(errors)
        })
    }

    /// Apenas grava no livro-razão. O saldo do produto NÃO é alterado; manter o
    /// contador em dia fica com quem chama (ou use `register_movement`).
    pub async fn record_movement<'e, E>(&self, executor: E, payload: &StockMovementPayload) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        Self::validate_payload(payload)?;
        self.stock_repo.record_stock_movement(executor, payload, Utc::now()).await
    }

    /// Grava a movimentação e aplica a quantidade com sinal ao `current_stock`,
    /// tudo na mesma transação. Limites de saldo não são impostos, só registrados em log.
    pub async fn register_movement<'e, E>(
        &self,
        executor: E,
        payload: &StockMovementPayload,
    ) -> Result<StockMovement, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        Self::validate_payload(payload)?;

        let mut tx = executor.begin().await?;

        // 1. Confere se o produto existe (erro amigável em vez de FK)
        self.catalog_repo
            .get_product(&mut *tx, payload.product_id)
            .await?
            .ok_or(AppError::ProductNotFound(payload.product_id))?;

        // 2. Grava Histórico
        let movement = self
            .stock_repo
            .record_stock_movement(&mut *tx, payload, Utc::now())
            .await?;

        // 3. Atualiza o contador desnormalizado
        let product = self
            .catalog_repo
            .adjust_current_stock(&mut *tx, payload.product_id, movement.signed_quantity())
            .await?;

        tx.commit().await?;

        if !product.is_within_stock_bounds() {
            tracing::warn!(
                product_id = %product.id,
                current_stock = product.current_stock,
                maximum_stock = product.maximum_stock,
                "saldo fora da faixa [0, máximo]"
            );
        }
        tracing::info!(
            movement_id = %movement.id,
            product_id = %product.id,
            movement_type = ?movement.movement_type,
            quantity = movement.quantity,
            current_stock = product.current_stock,
            "movimentação registrada"
        );

        Ok(movement)
    }

    pub async fn list_movements<'e, E>(&self, executor: E) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.stock_repo.list_movements(executor).await
    }

    pub async fn list_movements_by_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.stock_repo.list_movements_by_product(executor, product_id).await
    }

    pub async fn list_movements_by_period<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.stock_repo.list_movements_by_period(executor, start, end).await
    }

    /// Saldo calculado pelo livro-razão (soma das quantidades com sinal).
    pub async fn ledger_balance<'e, E>(&self, executor: E, product_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movements = self.stock_repo.get_product_ledger(executor, product_id).await?;
        Ok(ledger_balance(&movements))
    }

    /// Compara o contador gravado com o livro-razão. Não corrige nada.
    pub async fn stock_drift<'e, E>(&self, executor: E, product_id: Uuid) -> Result<StockReconciliation, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let product = self
            .catalog_repo
            .get_product(&mut *conn, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;
        let movements = self.stock_repo.get_product_ledger(&mut *conn, product_id).await?;

        let reconciliation = StockReconciliation {
            product_id,
            current_stock: product.current_stock,
            ledger_balance: ledger_balance(&movements),
        };
        if !reconciliation.is_consistent() {
            tracing::debug!(
                product_id = %product_id,
                difference = reconciliation.difference(),
                "saldo diverge do livro-razão"
            );
        }
        Ok(reconciliation)
    }
}
