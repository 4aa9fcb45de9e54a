// tests/stock_test.rs

mod common;

use estoque::{
    common::error::AppError,
    models::stock::{MovementType, StockMovementPayload},
};
use rust_decimal_macros::dec;
use uuid::Uuid;

fn movement(product_id: Uuid, responsible_id: Uuid, movement_type: MovementType, quantity: i32) -> StockMovementPayload {
    StockMovementPayload {
        product_id,
        movement_type,
        quantity,
        responsible_id,
        reason: Some("teste".into()),
        batch: None,
        expiry_date: None,
    }
}

#[tokio::test]
async fn register_movement_keeps_counter_and_ledger_in_step() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 0).await;

    for (kind, qty) in [(MovementType::In, 10), (MovementType::Out, 3), (MovementType::Adjustment, -2)] {
        state
            .stock_service
            .register_movement(&state.db_pool, &movement(product.id, fx.user.id, kind, qty))
            .await
            .unwrap();
    }

    let view = state.catalog_service.get_product(&state.db_pool, product.id).await.unwrap();
    assert_eq!(view.current_stock, 5);

    let balance = state.stock_service.ledger_balance(&state.db_pool, product.id).await.unwrap();
    assert_eq!(balance, 5);

    let reconciliation = state.stock_service.stock_drift(&state.db_pool, product.id).await.unwrap();
    assert!(reconciliation.is_consistent());
}

#[tokio::test]
async fn record_movement_only_appends_to_the_ledger() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 0).await;

    state
        .stock_service
        .record_movement(&state.db_pool, &movement(product.id, fx.user.id, MovementType::In, 4))
        .await
        .unwrap();

    let view = state.catalog_service.get_product(&state.db_pool, product.id).await.unwrap();
    assert_eq!(view.current_stock, 0);

    let reconciliation = state.stock_service.stock_drift(&state.db_pool, product.id).await.unwrap();
    assert_eq!(reconciliation.ledger_balance, 4);
    assert_eq!(reconciliation.difference(), -4);
    assert!(!reconciliation.is_consistent());
}

#[tokio::test]
async fn stock_may_leave_its_bounds() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 1).await;

    state
        .stock_service
        .register_movement(&state.db_pool, &movement(product.id, fx.user.id, MovementType::Out, 3))
        .await
        .unwrap();

    let view = state.catalog_service.get_product(&state.db_pool, product.id).await.unwrap();
    assert_eq!(view.current_stock, -2);
}

#[tokio::test]
async fn movement_that_would_overflow_the_counter_is_rolled_back() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), i32::MAX - 1).await;

    let err = state
        .stock_service
        .register_movement(&state.db_pool, &movement(product.id, fx.user.id, MovementType::In, 5))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::StockOutOfRange(id) if id == product.id));

    // Nem o contador nem o histórico mudaram
    let view = state.catalog_service.get_product(&state.db_pool, product.id).await.unwrap();
    assert_eq!(view.current_stock, i32::MAX - 1);
    let movements = state.stock_service.list_movements(&state.db_pool).await.unwrap();
    assert!(movements.is_empty());

    // Dentro da faixa continua funcionando
    let reached = state
        .stock_service
        .register_movement(&state.db_pool, &movement(product.id, fx.user.id, MovementType::In, 1))
        .await;
    assert!(reached.is_ok());
    let view = state.catalog_service.get_product(&state.db_pool, product.id).await.unwrap();
    assert_eq!(view.current_stock, i32::MAX);
}

#[tokio::test]
async fn invalid_quantities_are_rejected_before_touching_the_database() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 0).await;

    for (kind, qty) in [(MovementType::In, 0), (MovementType::Out, -1), (MovementType::Adjustment, 0)] {
        let err = state
            .stock_service
            .register_movement(&state.db_pool, &movement(product.id, fx.user.id, kind, qty))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)), "{kind:?} {qty}");
    }

    let movements = state.stock_service.list_movements(&state.db_pool).await.unwrap();
    assert!(movements.is_empty());
}

#[tokio::test]
async fn movement_for_unknown_product_is_not_found() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let missing = Uuid::new_v4();

    let err = state
        .stock_service
        .register_movement(&state.db_pool, &movement(missing, fx.user.id, MovementType::In, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ProductNotFound(id) if id == missing));
}

#[tokio::test]
async fn movement_views_carry_product_and_responsible_names() {
    let state = common::setup().await;
    let fx = common::fixture(&state).await;
    let product = common::create_product(&state, &fx, "TECH001", dec!(800), dec!(1200), 0).await;
    let other = common::create_product(&state, &fx, "TECH002", dec!(2000), dec!(2800), 0).await;

    state
        .stock_service
        .register_movement(&state.db_pool, &movement(product.id, fx.user.id, MovementType::In, 2))
        .await
        .unwrap();
    state
        .stock_service
        .register_movement(&state.db_pool, &movement(other.id, fx.user.id, MovementType::In, 7))
        .await
        .unwrap();

    let by_product = state
        .stock_service
        .list_movements_by_product(&state.db_pool, product.id)
        .await
        .unwrap();
    assert_eq!(by_product.len(), 1);
    assert_eq!(by_product[0].product_name.as_deref(), Some("Produto TECH001"));
    assert_eq!(by_product[0].responsible_name.as_deref(), Some("operador"));
    assert_eq!(by_product[0].movement_type, MovementType::In);

    let now = chrono::Utc::now();
    let in_window = state
        .stock_service
        .list_movements_by_period(&state.db_pool, now - chrono::Duration::hours(1), now + chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(in_window.len(), 2);

    let before = state
        .stock_service
        .list_movements_by_period(&state.db_pool, now - chrono::Duration::hours(2), now - chrono::Duration::hours(1))
        .await
        .unwrap();
    assert!(before.is_empty());
}
