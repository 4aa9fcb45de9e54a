// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use uuid::Uuid;
use validator::Validate;

use crate::{common::db_utils::decimal_column, models::catalog::Product};

// --- CLIENTE ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub cpf_cnpj: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerPayload {
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(length(max = 20))]
    pub cpf_cnpj: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub address: Option<String>,
}

// --- VENDA (Cabeçalho) ---
// total_value e total_profit são gravados na criação e nunca recalculados na leitura.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub sale_date: DateTime<Utc>,
    pub total_value: Decimal,
    pub total_profit: Decimal,
    pub responsible_id: Uuid,
}

impl<'r> FromRow<'r, SqliteRow> for Sale {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            customer_id: row.try_get("customer_id")?,
            sale_date: row.try_get("sale_date")?,
            total_value: decimal_column(row, "total_value")?,
            total_profit: decimal_column(row, "total_profit")?,
            responsible_id: row.try_get("responsible_id")?,
        })
    }
}

// --- ITEM DA VENDA (Snapshot de preço e custo) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_sale_price: Decimal,
    pub unit_purchase_cost: Decimal,
    pub item_profit: Decimal,
}

impl SaleItem {
    /// Item ainda sem venda: congela o preço e o custo atuais do produto.
    /// `sale_id` fica nulo até o cabeçalho ser gravado.
    pub fn snapshot(product: &Product, quantity: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_id: Uuid::nil(),
            product_id: product.id,
            quantity,
            unit_sale_price: product.sale_price,
            unit_purchase_cost: product.purchase_cost,
            item_profit: product.profit_margin(),
        }
    }

    pub fn total_item_value(&self) -> Decimal {
        self.unit_sale_price * Decimal::from(self.quantity)
    }

    pub fn total_item_profit(&self) -> Decimal {
        self.item_profit * Decimal::from(self.quantity)
    }

    /// O lucro unitário "correto"; item_profit gravado pode divergir dele.
    pub fn expected_item_profit(&self) -> Decimal {
        self.unit_sale_price - self.unit_purchase_cost
    }
}

/// (valor, lucro) somados a partir dos itens.
pub fn item_totals<'a, I>(items: I) -> (Decimal, Decimal)
where
    I: IntoIterator<Item = &'a SaleItem>,
{
    items.into_iter().fold((Decimal::ZERO, Decimal::ZERO), |(value, profit), item| {
        (value + item.total_item_value(), profit + item.total_item_profit())
    })
}

impl<'r> FromRow<'r, SqliteRow> for SaleItem {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            sale_id: row.try_get("sale_id")?,
            product_id: row.try_get("product_id")?,
            quantity: row.try_get("quantity")?,
            unit_sale_price: decimal_column(row, "unit_sale_price")?,
            unit_purchase_cost: decimal_column(row, "unit_purchase_cost")?,
            item_profit: decimal_column(row, "item_profit")?,
        })
    }
}

// --- Projeções ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItemView {
    pub id: Uuid,
    pub sale_id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub quantity: i32,
    pub unit_sale_price: Decimal,
    pub unit_purchase_cost: Decimal,
    pub item_profit: Decimal,
    pub total_item_value: Decimal,
    pub total_item_profit: Decimal,
}

impl SaleItemView {
    pub fn new(item: SaleItem, product_name: Option<String>) -> Self {
        Self {
            total_item_value: item.total_item_value(),
            total_item_profit: item.total_item_profit(),
            id: item.id,
            sale_id: item.sale_id,
            product_id: item.product_id,
            product_name,
            quantity: item.quantity,
            unit_sale_price: item.unit_sale_price,
            unit_purchase_cost: item.unit_purchase_cost,
            item_profit: item.item_profit,
        }
    }
}

impl<'r> FromRow<'r, SqliteRow> for SaleItemView {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let item = SaleItem::from_row(row)?;
        Ok(Self::new(item, row.try_get("product_name")?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleView {
    pub id: Uuid,
    pub customer_id: Option<Uuid>,
    pub customer_name: Option<String>,
    pub sale_date: DateTime<Utc>,
    pub total_value: Decimal,
    pub total_profit: Decimal,
    pub responsible_id: Uuid,
    pub responsible_name: Option<String>,
    pub items: Vec<SaleItemView>,
}

// Cabeçalho lido com os nomes auxiliares; os itens são preenchidos pelo serviço.
impl<'r> FromRow<'r, SqliteRow> for SaleView {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let sale = Sale::from_row(row)?;
        Ok(Self {
            id: sale.id,
            customer_id: sale.customer_id,
            customer_name: row.try_get("customer_name")?,
            sale_date: sale.sale_date,
            total_value: sale.total_value,
            total_profit: sale.total_profit,
            responsible_id: sale.responsible_id,
            responsible_name: row.try_get("responsible_name")?,
            items: Vec::new(),
        })
    }
}

// Totais gravados x totais calculados a partir dos itens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleTotalsCheck {
    pub sale_id: Uuid,
    pub stored_value: Decimal,
    pub computed_value: Decimal,
    pub stored_profit: Decimal,
    pub computed_profit: Decimal,
}

impl SaleTotalsCheck {
    pub fn is_consistent(&self) -> bool {
        self.stored_value == self.computed_value && self.stored_profit == self.computed_profit
    }
}

// ---
// Payload de nova venda
// ---
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewSaleItem {
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewSale {
    pub customer_id: Option<Uuid>,
    pub responsible_id: Uuid,
    #[validate(length(min = 1, message = "A venda precisa de pelo menos um item."), nested)]
    pub items: Vec<NewSaleItem>,
}
