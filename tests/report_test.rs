// tests/report_test.rs

mod common;

use chrono::{Duration, Utc};
use estoque::models::{
    sales::{NewSale, NewSaleItem},
    stock::{MovementType, StockMovementPayload},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn empty_database_reports_zeroes() {
    let state = common::setup().await;

    let stock = state.report_service.stock_report(&state.db_pool).await.unwrap();
    assert_eq!(stock.total_products, 0);
    assert_eq!(stock.total_stock_value, Decimal::ZERO);
    assert_eq!(stock.low_stock_products, 0);
    assert_eq!(stock.movements_today, 0);

    let now = Utc::now();
    let sales = state
        .report_service
        .sales_report(&state.db_pool, now - Duration::days(1), now)
        .await
        .unwrap();
    assert_eq!(sales.total_sales, 0);
    assert_eq!(sales.total_revenue, Decimal::ZERO);
}

#[tokio::test]
async fn stock_report_values_active_products_at_cost() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let phone = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 15).await;
    common::create_product(&state, &fx, "ROUPA002", dec!(40), dec!(80), 2).await;

    let mut inactive = common::product_payload(&fx, "OLD", dec!(1000), dec!(1500), 10);
    inactive.active = false;
    state.catalog_service.create_product(&state.db_pool, &inactive).await.unwrap();

    state
        .stock_service
        .register_movement(
            &state.db_pool,
            &StockMovementPayload {
                product_id: phone.id,
                movement_type: MovementType::In,
                quantity: 5,
                responsible_id: fx.user.id,
                reason: None,
                batch: None,
                expiry_date: None,
            },
        )
        .await
        .unwrap();

    let report = state.report_service.stock_report(&state.db_pool).await.unwrap();
    assert_eq!(report.total_products, 2);
    // 20 × 800 + 2 × 40
    assert_eq!(report.total_stock_value, dec!(16080));
    assert_eq!(report.low_stock_products, 1);
    assert_eq!(report.movements_today, 1);
}

#[tokio::test]
async fn sales_report_sums_stored_totals_in_the_period() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let phone = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 15).await;

    for quantity in [1, 2] {
        state
            .sales_service
            .create_sale(
                &state.db_pool,
                &NewSale {
                    customer_id: None,
                    responsible_id: fx.user.id,
                    items: vec![NewSaleItem { product_id: phone.id, quantity }],
                },
            )
            .await
            .unwrap();
    }

    let now = Utc::now();
    let report = state
        .report_service
        .sales_report(&state.db_pool, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(report.total_sales, 2);
    assert_eq!(report.total_revenue, dec!(3600));
    assert_eq!(report.total_profit, dec!(1200));

    let listed = state
        .sales_service
        .list_sales_by_period(&state.db_pool, now - Duration::hours(1), now + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|s| s.items.len() == 1));

    let future = state
        .report_service
        .sales_report(&state.db_pool, now + Duration::hours(1), now + Duration::hours(2))
        .await
        .unwrap();
    assert_eq!(future.total_sales, 0);
}
