// src/common/error.rs

use thiserror::Error;
use uuid::Uuid;

// O erro único do crate. Violações de unicidade conhecidas ganham variantes próprias;
// qualquer outra falha do banco (FK inexistente, por exemplo) sobe intacta em `DatabaseError`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Já existe uma categoria com o nome '{0}'")]
    CategoryNameAlreadyExists(String),

    #[error("Já existe um produto com o código '{0}'")]
    ProductCodeAlreadyExists(String),

    #[error("Já existe um cliente com o CPF/CNPJ '{0}'")]
    CustomerDocumentAlreadyExists(String),

    #[error("O usuário '{0}' já existe")]
    UsernameAlreadyExists(String),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(Uuid),

    #[error("Venda não encontrada: {0}")]
    SaleNotFound(Uuid),

    #[error("{entity} não encontrado(a): {id}")]
    RecordNotFound { entity: &'static str, id: Uuid },

    #[error("O saldo do produto {0} sairia da faixa suportada")]
    StockOutOfRange(Uuid),

    #[error("O produto '{0}' está inativo e não pode ser vendido")]
    ProductInactive(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Falha ao aplicar as migrações: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de serialização: {0}")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Verdadeiro quando a causa é uma violação de chave estrangeira no banco.
    pub fn is_foreign_key_violation(&self) -> bool {
        match self {
            AppError::DatabaseError(sqlx::Error::Database(db_err)) => {
                db_err.is_foreign_key_violation()
            }
            _ => false,
        }
    }
}
