// src/db/stock_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock::{StockMovement, StockMovementPayload, StockMovementView},
};

const MOVEMENT_VIEW_SELECT: &str = r#"
    SELECT m.*, p.name AS product_name, u.username AS responsible_name
    FROM stock_movements m
    LEFT JOIN products p ON p.id = m.product_id
    LEFT JOIN users u ON u.id = m.responsible_id
"#;

// Livro-razão de estoque. Só existe INSERT: movimentações nunca são alteradas.
#[derive(Clone, Default)]
pub struct StockRepository;

impl StockRepository {
    pub fn new() -> Self {
        Self
    }

    /// Registra uma movimentação no livro-razão (auditoria). Não mexe no saldo do produto.
    pub async fn record_stock_movement<'e, E>(
        &self,
        executor: E,
        payload: &StockMovementPayload,
        movement_date: DateTime<Utc>,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            r#"
            INSERT INTO stock_movements (
                id, product_id, movement_type, quantity, movement_date,
                responsible_id, reason, batch, expiry_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(payload.product_id)
        .bind(payload.movement_type)
        .bind(payload.quantity)
        .bind(movement_date)
        .bind(payload.responsible_id)
        .bind(&payload.reason)
        .bind(&payload.batch)
        .bind(payload.expiry_date)
        .fetch_one(executor)
        .await?;

        Ok(movement)
    }

    pub async fn list_movements<'e, E>(&self, executor: E) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{MOVEMENT_VIEW_SELECT} ORDER BY m.movement_date DESC");
        let movements = sqlx::query_as::<_, StockMovementView>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(movements)
    }

    pub async fn list_movements_by_product<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
    ) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{MOVEMENT_VIEW_SELECT} WHERE m.product_id = $1 ORDER BY m.movement_date DESC");
        let movements = sqlx::query_as::<_, StockMovementView>(&sql)
            .bind(product_id)
            .fetch_all(executor)
            .await?;
        Ok(movements)
    }

    /// Movimentações em [start, end).
    pub async fn list_movements_by_period<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockMovementView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "{MOVEMENT_VIEW_SELECT} WHERE m.movement_date >= $1 AND m.movement_date < $2 ORDER BY m.movement_date DESC"
        );
        let movements = sqlx::query_as::<_, StockMovementView>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await?;
        Ok(movements)
    }

    /// Movimentações cruas de um produto, na ordem em que foram gravadas.
    pub async fn get_product_ledger<'e, E>(&self, executor: E, product_id: Uuid) -> Result<Vec<StockMovement>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let movements = sqlx::query_as::<_, StockMovement>(
            "SELECT * FROM stock_movements WHERE product_id = $1 ORDER BY movement_date ASC",
        )
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(movements)
    }

    pub async fn count_movements_since<'e, E>(&self, executor: E, since: DateTime<Utc>) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE movement_date >= $1")
            .bind(since)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
