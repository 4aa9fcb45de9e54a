// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// Cards da tela de estoque
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockReport {
    pub total_products: i64,     // Produtos ativos
    pub total_stock_value: Decimal, // Σ saldo × custo
    pub low_stock_products: i64,
    pub movements_today: i64,
}

// Resumo de vendas de um período [start, end)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_sales: i64,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
}
