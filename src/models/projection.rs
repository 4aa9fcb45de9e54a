// src/models/projection.rs

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::{
    common::error::AppError,
    models::{
        catalog::{Category, ProductView, Supplier},
        report::{SalesReport, StockReport},
        sales::{Customer, SaleItemView, SaleView},
        stock::StockMovementView,
        user::User,
    },
};

/// Projeção plana (chave → valor primitivo) para consumo externo.
///
/// Datas saem em ISO-8601, valores monetários como números decimais e relações
/// opcionais ausentes como `null` explícito.
pub trait Projection: Serialize + DeserializeOwned {
    fn to_record(&self) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Internal(anyhow::anyhow!(
                "a projeção deveria gerar um objeto, gerou: {other}"
            ))),
        }
    }

    fn from_record(record: Map<String, Value>) -> Result<Self, AppError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }
}

impl Projection for User {}
impl Projection for Category {}
impl Projection for Supplier {}
impl Projection for ProductView {}
impl Projection for StockMovementView {}
impl Projection for Customer {}
impl Projection for SaleItemView {}
impl Projection for SaleView {}
impl Projection for StockReport {}
impl Projection for SalesReport {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    use crate::models::catalog::{Product, MONEY_MAX};

    fn priced_view(cost: Decimal, price: Decimal) -> ProductView {
        let mut v = view();
        v.purchase_cost = cost;
        v.sale_price = price;
        v.profit_margin = price - cost;
        v
    }

    fn view() -> ProductView {
        let product = Product {
            id: Uuid::new_v4(),
            name: "Aspirador de Pó".into(),
            description: Some("Aspirador de pó portátil 1200W".into()),
            code: "CASA001".into(),
            category_id: Uuid::new_v4(),
            brand: Some("CleanMax".into()),
            unit_of_measure: Some("unidade".into()),
            supplier_id: Uuid::new_v4(),
            purchase_cost: dec!(150.00),
            sale_price: dec!(250.00),
            current_stock: 12,
            minimum_stock: 5,
            maximum_stock: 30,
            registration_date: Utc.with_ymd_and_hms(2025, 3, 1, 12, 30, 0).unwrap(),
            active: true,
        };
        ProductView::new(product, Some("Casa e Jardim".into()), None)
    }

    #[test]
    fn product_record_is_flat_with_primitive_values() {
        let record = view().to_record().unwrap();

        assert_eq!(record["code"], Value::from("CASA001"));
        assert_eq!(record["category_name"], Value::from("Casa e Jardim"));
        assert_eq!(record["supplier_name"], Value::Null);
        assert_eq!(record["profit_margin"].as_f64(), Some(100.0));
        assert_eq!(record["sale_price"].as_f64(), Some(250.0));
        assert_eq!(record["registration_date"], Value::from("2025-03-01T12:30:00Z"));
        assert!(record.values().all(|v| !v.is_object() && !v.is_array()));
    }

    #[test]
    fn record_round_trip_preserves_scalars() {
        let original = view();
        let rebuilt = ProductView::from_record(original.to_record().unwrap()).unwrap();
        assert_eq!(rebuilt, original);
    }

    #[test]
    fn money_at_the_limits_survives_the_round_trip() {
        let cases = [
            (dec!(0.01), MONEY_MAX),
            (MONEY_MAX, dec!(0)),
            (MONEY_MAX, MONEY_MAX),
            (dec!(12345678.91), dec!(99999999.90)),
        ];
        for (cost, price) in cases {
            let original = priced_view(cost, price);
            let rebuilt = ProductView::from_record(original.to_record().unwrap()).unwrap();
            assert_eq!(rebuilt, original, "custo {cost} preço {price}");
        }
        assert_eq!(priced_view(dec!(0.01), MONEY_MAX).profit_margin, dec!(99999999.98));
        assert_eq!(priced_view(MONEY_MAX, dec!(0)).profit_margin, -MONEY_MAX);
    }

    proptest! {
        #[test]
        fn any_valid_amount_round_trips_exactly(
            cost_cents in 0i64..=9_999_999_999,
            price_cents in 0i64..=9_999_999_999,
        ) {
            let original = priced_view(Decimal::new(cost_cents, 2), Decimal::new(price_cents, 2));
            let rebuilt = ProductView::from_record(original.to_record().unwrap()).unwrap();
            prop_assert_eq!(rebuilt, original);
        }
    }
}
