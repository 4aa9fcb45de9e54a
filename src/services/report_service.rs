// src/services/report_service.rs

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Sqlite};

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SalesRepository, StockRepository},
    models::report::{SalesReport, StockReport},
};

#[derive(Clone)]
pub struct ReportService {
    catalog_repo: CatalogRepository,
    stock_repo: StockRepository,
    sales_repo: SalesRepository,
}

impl ReportService {
    pub fn new(catalog_repo: CatalogRepository, stock_repo: StockRepository, sales_repo: SalesRepository) -> Self {
        Self { catalog_repo, stock_repo, sales_repo }
    }

    // 1. Resumo do estoque (somente produtos ativos)
    pub async fn stock_report<'e, E>(&self, executor: E) -> Result<StockReport, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        // Snapshot consistente: tudo na mesma transação de leitura
        let mut tx = executor.begin().await?;

        let products = self.catalog_repo.get_all_products(&mut *tx, true).await?;
        let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        let movements_today = self.stock_repo.count_movements_since(&mut *tx, start_of_day).await?;

        tx.commit().await?;

        let total_stock_value: Decimal = products
            .iter()
            .map(|p| Decimal::from(p.current_stock) * p.purchase_cost)
            .sum();
        let low_stock_products = products
            .iter()
            .filter(|p| p.current_stock <= p.minimum_stock)
            .count();

        Ok(StockReport {
            total_products: products.len() as i64,
            total_stock_value,
            low_stock_products: low_stock_products as i64,
            movements_today,
        })
    }

    // 2. Vendas do período [start, end), a partir dos totais gravados em cada venda
    pub async fn sales_report<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<SalesReport, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sales = self.sales_repo.list_sales_by_period(executor, start, end).await?;

        let (total_revenue, total_profit) = sales.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(revenue, profit), sale| (revenue + sale.total_value, profit + sale.total_profit),
        );

        Ok(SalesReport {
            start_date: start,
            end_date: end,
            total_sales: sales.len() as i64,
            total_revenue,
            total_profit,
        })
    }
}
