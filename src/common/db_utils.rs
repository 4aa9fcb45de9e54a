// src/common/db_utils.rs

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::{
    sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow},
    Row,
};

use crate::common::error::AppError;

// ---
// Helpers de conexão
// ---

/// Abre a pool SQLite. Chaves estrangeiras ficam ativas (padrão do driver).
pub async fn connect_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Pool em memória com uma única conexão: cada conexão nova seria um banco vazio.
pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Roda as migrações embutidas de ./migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::migrate!().run(pool).await?;
    Ok(())
}

// ---
// Helpers de mapeamento
// ---

/// Lê uma coluna monetária gravada como TEXT.
pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> Result<Decimal, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

/// Converte erro de violação de chave única no erro de domínio fornecido.
pub(crate) fn map_unique_violation(e: sqlx::Error, on_unique: impl FnOnce() -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    e.into()
}

/// Converte violação de CHECK (ex.: saldo fora da faixa de `i32`) no erro de domínio fornecido.
pub(crate) fn map_check_violation(e: sqlx::Error, on_check: impl FnOnce() -> AppError) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_check_violation() {
            return on_check();
        }
    }
    e.into()
}
