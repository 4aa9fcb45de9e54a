// tests/seed_test.rs

mod common;

use rust_decimal_macros::dec;

#[tokio::test]
async fn seed_populates_sample_data_once() {
    let state = common::setup().await;

    let first = state.seed_service.run(&state.db_pool).await.unwrap();
    assert_eq!(first.users, 1);
    assert_eq!(first.categories, 5);
    assert_eq!(first.suppliers, 3);
    assert_eq!(first.products, 5);
    assert_eq!(first.customers, 1);

    let second = state.seed_service.run(&state.db_pool).await.unwrap();
    assert_eq!(second.total(), 0);

    let products = state.catalog_service.list_products(&state.db_pool, true).await.unwrap();
    assert_eq!(products.len(), 5);
    assert_eq!(state.catalog_service.list_categories(&state.db_pool).await.unwrap().len(), 5);
    assert_eq!(state.catalog_service.list_suppliers(&state.db_pool).await.unwrap().len(), 3);
    assert_eq!(state.sales_service.list_customers(&state.db_pool).await.unwrap().len(), 1);

    let admin = state
        .user_service
        .find_by_username(&state.db_pool, "admin")
        .await
        .unwrap()
        .expect("admin");
    assert_eq!(admin.access_level, "administrador");
}

#[tokio::test]
async fn seeded_catalog_has_one_low_stock_product() {
    let state = common::setup().await;
    state.seed_service.run(&state.db_pool).await.unwrap();

    let low = state.catalog_service.list_low_stock_products(&state.db_pool).await.unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0].code, "ROUPA002");
    assert_eq!(low[0].category_name.as_deref(), Some("Roupas"));
    assert_eq!(low[0].supplier_name.as_deref(), Some("Moda & Estilo"));

    let report = state.report_service.stock_report(&state.db_pool).await.unwrap();
    // 15×800 + 8×2000 + 50×25 + 2×40 + 12×150
    assert_eq!(report.total_stock_value, dec!(31130));
    assert_eq!(report.low_stock_products, 1);
}
