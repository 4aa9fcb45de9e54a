// src/main.rs

use estoque::config::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Conecta e migra; se falhar, o binário encerra com o erro
    let app_state = AppState::new().await?;

    let summary = app_state.seed_service.run(&app_state.db_pool).await?;

    if summary.total() == 0 {
        tracing::info!("🌱 Banco já populado, nada a fazer.");
    } else {
        tracing::info!(
            "🌱 Seed concluído: {} usuário(s), {} categoria(s), {} fornecedor(es), {} produto(s), {} cliente(s)",
            summary.users,
            summary.categories,
            summary.suppliers,
            summary.products,
            summary.customers
        );
    }

    Ok(())
}
