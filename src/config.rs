// src/config.rs

use std::env;

use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    common::db_utils,
    db::{CatalogRepository, SalesRepository, StockRepository, UserRepository},
    services::{
        catalog_service::CatalogService, report_service::ReportService, sales_service::SalesService,
        seed_service::SeedService, stock_service::StockService, user_service::UserService,
    },
};

const DEFAULT_DATABASE_URL: &str = "sqlite://estoque.db?mode=rwc";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: '{raw}'"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self { database_url, max_connections })
    }
}

// O estado compartilhado: a pool e os serviços já montados
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub stock_service: StockService,
    pub sales_service: SalesService,
    pub report_service: ReportService,
    pub seed_service: SeedService,
}

impl AppState {
    /// Conecta usando o ambiente e aplica as migrações pendentes.
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db_pool = db_utils::connect_pool(&config.database_url, config.max_connections)
            .await
            .with_context(|| format!("Falha ao conectar em {}", config.database_url))?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        db_utils::run_migrations(&db_pool).await?;
        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::from_pool(db_pool))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: SqlitePool) -> Self {
        let user_repo = UserRepository::new();
        let catalog_repo = CatalogRepository::new();
        let stock_repo = StockRepository::new();
        let sales_repo = SalesRepository::new();

        Self {
            db_pool,
            user_service: UserService::new(user_repo.clone()),
            catalog_service: CatalogService::new(catalog_repo.clone()),
            stock_service: StockService::new(catalog_repo.clone(), stock_repo.clone()),
            sales_service: SalesService::new(catalog_repo.clone(), sales_repo.clone()),
            report_service: ReportService::new(catalog_repo.clone(), stock_repo, sales_repo.clone()),
            seed_service: SeedService::new(user_repo, catalog_repo, sales_repo),
        }
    }
}
