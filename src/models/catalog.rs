// src/models/catalog.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, FromRow, Row};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::db_utils::decimal_column;

// --- 1. Categorias ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

// --- 2. Fornecedores ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub contact: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

// --- 3. Produtos ---
// O saldo (current_stock) é um contador desnormalizado: ninguém o recalcula a partir
// do livro-razão de movimentações.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub category_id: Uuid,
    pub brand: Option<String>,
    pub unit_of_measure: Option<String>,
    pub supplier_id: Uuid,
    pub purchase_cost: Decimal,
    pub sale_price: Decimal,
    pub current_stock: i32,
    pub minimum_stock: i32,
    pub maximum_stock: i32,
    pub registration_date: DateTime<Utc>,
    pub active: bool,
}

impl Product {
    /// Lucro unitário: preço de venda menos custo de compra.
    pub fn profit_margin(&self) -> Decimal {
        self.sale_price - self.purchase_cost
    }

    pub fn is_low_stock(&self) -> bool {
        self.current_stock <= self.minimum_stock
    }

    /// Valor do estoque a preço de custo.
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.current_stock) * self.purchase_cost
    }

    /// O saldo deveria ficar em [0, maximum_stock], mas nada impõe isso.
    pub fn is_within_stock_bounds(&self) -> bool {
        (0..=self.maximum_stock).contains(&self.current_stock)
    }
}

// Colunas monetárias vêm como TEXT, então o mapeamento é manual.
impl<'r> FromRow<'r, SqliteRow> for Product {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            code: row.try_get("code")?,
            category_id: row.try_get("category_id")?,
            brand: row.try_get("brand")?,
            unit_of_measure: row.try_get("unit_of_measure")?,
            supplier_id: row.try_get("supplier_id")?,
            purchase_cost: decimal_column(row, "purchase_cost")?,
            sale_price: decimal_column(row, "sale_price")?,
            current_stock: row.try_get("current_stock")?,
            minimum_stock: row.try_get("minimum_stock")?,
            maximum_stock: row.try_get("maximum_stock")?,
            registration_date: row.try_get("registration_date")?,
            active: row.try_get("active")?,
        })
    }
}

// --- 4. Projeção de Produto (com nomes resolvidos) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductView {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub code: String,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub brand: Option<String>,
    pub unit_of_measure: Option<String>,
    pub supplier_id: Uuid,
    pub supplier_name: Option<String>,
    pub purchase_cost: Decimal,
    pub sale_price: Decimal,
    pub current_stock: i32,
    pub minimum_stock: i32,
    pub maximum_stock: i32,
    pub registration_date: DateTime<Utc>,
    pub active: bool,
    pub profit_margin: Decimal,
}

impl ProductView {
    pub fn new(product: Product, category_name: Option<String>, supplier_name: Option<String>) -> Self {
        let profit_margin = product.profit_margin();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            code: product.code,
            category_id: product.category_id,
            category_name,
            brand: product.brand,
            unit_of_measure: product.unit_of_measure,
            supplier_id: product.supplier_id,
            supplier_name,
            purchase_cost: product.purchase_cost,
            sale_price: product.sale_price,
            current_stock: product.current_stock,
            minimum_stock: product.minimum_stock,
            maximum_stock: product.maximum_stock,
            registration_date: product.registration_date,
            active: product.active,
            profit_margin,
        }
    }
}

// A consulta faz LEFT JOIN em categorias e fornecedores e expõe os nomes com alias.
impl<'r> FromRow<'r, SqliteRow> for ProductView {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let product = Product::from_row(row)?;
        Ok(Self::new(
            product,
            row.try_get("category_name")?,
            row.try_get("supplier_name")?,
        ))
    }
}

// ---
// Validação Customizada
// ---

/// Maior valor monetário aceito: 99.999.999,99 (10 dígitos, 2 casas).
pub const MONEY_MAX: Decimal = Decimal::from_parts(9_999_999_999u64 as u32, (9_999_999_999u64 >> 32) as u32, 0, false, 2);

/// Casas decimais aceitas em valores monetários.
pub const MONEY_SCALE: u32 = 2;

/// Verdadeiro para valores em [-MONEY_MAX, MONEY_MAX] com no máximo duas casas.
pub fn is_money_in_range(val: &Decimal) -> bool {
    val.abs() <= MONEY_MAX && val.normalize().scale() <= MONEY_SCALE
}

pub(crate) fn validate_money(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    if !is_money_in_range(val) {
        let mut err = ValidationError::new("money");
        err.add_param("max".into(), &MONEY_MAX.to_string());
        err.message = Some("O valor deve ter no máximo 8 dígitos inteiros e 2 casas decimais.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payloads (criação e atualização usam o mesmo formato)
// ---
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryPayload {
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupplierPayload {
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    pub name: String,
    pub contact: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome é obrigatório."))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 1, max = 50, message = "O código é obrigatório."))]
    pub code: String,

    pub category_id: Uuid,
    pub brand: Option<String>,
    pub unit_of_measure: Option<String>,
    pub supplier_id: Uuid,

    #[validate(custom(function = "validate_money"))]
    pub purchase_cost: Decimal,

    #[validate(custom(function = "validate_money"))]
    pub sale_price: Decimal,

    #[serde(default)]
    pub current_stock: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque mínimo não pode ser negativo."))]
    pub minimum_stock: i32,

    #[serde(default)]
    #[validate(range(min = 0, message = "O estoque máximo não pode ser negativo."))]
    pub maximum_stock: i32,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn product(purchase_cost: Decimal, sale_price: Decimal, current: i32, minimum: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Camiseta Polo".into(),
            description: None,
            code: "ROUPA001".into(),
            category_id: Uuid::new_v4(),
            brand: None,
            unit_of_measure: Some("unidade".into()),
            supplier_id: Uuid::new_v4(),
            purchase_cost,
            sale_price,
            current_stock: current,
            minimum_stock: minimum,
            maximum_stock: 100,
            registration_date: Utc::now(),
            active: true,
        }
    }

    #[test]
    fn profit_margin_with_zero_cost_is_the_sale_price() {
        let p = product(dec!(0), dec!(45.00), 10, 5);
        assert_eq!(p.profit_margin(), dec!(45.00));
    }

    #[test]
    fn low_stock_includes_the_minimum_itself() {
        assert!(product(dec!(40), dec!(80), 2, 5).is_low_stock());
        assert!(product(dec!(40), dec!(80), 5, 5).is_low_stock());
        assert!(!product(dec!(40), dec!(80), 6, 5).is_low_stock());
    }

    #[test]
    fn stock_value_uses_purchase_cost() {
        let p = product(dec!(25.00), dec!(45.00), 50, 10);
        assert_eq!(p.stock_value(), dec!(1250.00));
    }

    #[test]
    fn stock_bounds_are_reported_not_enforced() {
        let mut p = product(dec!(1), dec!(2), 101, 0);
        assert!(!p.is_within_stock_bounds());
        p.current_stock = -1;
        assert!(!p.is_within_stock_bounds());
        p.current_stock = 100;
        assert!(p.is_within_stock_bounds());
    }

    #[test]
    fn negative_price_is_rejected_by_validation() {
        let payload = ProductPayload {
            name: "Notebook".into(),
            description: None,
            code: "TECH002".into(),
            category_id: Uuid::new_v4(),
            brand: None,
            unit_of_measure: None,
            supplier_id: Uuid::new_v4(),
            purchase_cost: dec!(-1),
            sale_price: dec!(2800),
            current_stock: 0,
            minimum_stock: 0,
            maximum_stock: 0,
            active: true,
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("purchase_cost"));
    }

    #[test]
    fn prices_above_the_money_limit_or_with_extra_decimals_are_rejected() {
        let base = ProductPayload {
            name: "Notebook".into(),
            description: None,
            code: "TECH002".into(),
            category_id: Uuid::new_v4(),
            brand: None,
            unit_of_measure: None,
            supplier_id: Uuid::new_v4(),
            purchase_cost: dec!(2000),
            sale_price: MONEY_MAX,
            current_stock: 0,
            minimum_stock: 0,
            maximum_stock: 0,
            active: true,
        };
        assert!(base.validate().is_ok());

        let too_big = ProductPayload { sale_price: dec!(100000000.00), ..base.clone() };
        let errors = too_big.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sale_price"));

        let huge = ProductPayload { sale_price: dec!(70000000000000000000000000000), ..base.clone() };
        assert!(huge.validate().is_err());

        let fractional = ProductPayload { purchase_cost: dec!(10.005), ..base.clone() };
        let errors = fractional.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("purchase_cost"));

        // Zeros à direita não contam como casas extras
        let padded = ProductPayload { purchase_cost: dec!(10.500), ..base };
        assert!(padded.validate().is_ok());
    }

    #[test]
    fn money_limit_is_99_999_999_99() {
        assert_eq!(MONEY_MAX, dec!(99999999.99));
        assert!(is_money_in_range(&-MONEY_MAX));
        assert!(!is_money_in_range(&(MONEY_MAX + dec!(0.01))));
    }

    #[test]
    fn empty_category_name_is_rejected() {
        let payload = CategoryPayload { name: String::new(), description: None };
        assert!(payload.validate().is_err());
    }

    proptest! {
        #[test]
        fn profit_margin_is_price_minus_cost(
            cost_cents in 0i64..10_000_000,
            price_cents in 0i64..10_000_000,
        ) {
            let cost = Decimal::new(cost_cents, 2);
            let price = Decimal::new(price_cents, 2);
            let p = product(cost, price, 0, 0);
            prop_assert_eq!(p.profit_margin(), price - cost);

            let view = ProductView::new(p, None, None);
            prop_assert_eq!(view.profit_margin, price - cost);
        }
    }
}
