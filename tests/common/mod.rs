// tests/common/mod.rs

#![allow(dead_code)]

use estoque::{
    common::db_utils,
    config::AppState,
    models::{
        catalog::{Category, CategoryPayload, Product, ProductPayload, Supplier, SupplierPayload},
        user::{User, UserPayload},
    },
};
use rust_decimal::Decimal;

/// Banco em memória já migrado, com os serviços montados por cima.
pub async fn setup() -> AppState {
    let pool = db_utils::connect_in_memory().await.expect("pool em memória");
    db_utils::run_migrations(&pool).await.expect("migrações");
    AppState::from_pool(pool)
}

pub struct Fixture {
    pub user: User,
    pub category: Category,
    pub supplier: Supplier,
}

pub async fn fixture(state: &AppState) -> Fixture {
    let user = state
        .user_service
        .create_user(
            &state.db_pool,
            &UserPayload {
                username: "operador".into(),
                full_name: "Operador de Teste".into(),
                email: Some("operador@teste.com".into()),
                access_level: "vendedor".into(),
            },
        )
        .await
        .expect("usuário");

    let category = state
        .catalog_service
        .create_category(
            &state.db_pool,
            &CategoryPayload { name: "Eletrônicos".into(), description: None },
        )
        .await
        .expect("categoria");

    let supplier = state
        .catalog_service
        .create_supplier(
            &state.db_pool,
            &SupplierPayload {
                name: "TechSupplier Ltda".into(),
                contact: None,
                phone: None,
                email: None,
                address: None,
            },
        )
        .await
        .expect("fornecedor");

    Fixture { user, category, supplier }
}

pub fn product_payload(fx: &Fixture, code: &str, cost: Decimal, price: Decimal, stock: i32) -> ProductPayload {
    ProductPayload {
        name: format!("Produto {code}"),
        description: None,
        code: code.into(),
        category_id: fx.category.id,
        brand: None,
        unit_of_measure: Some("unidade".into()),
        supplier_id: fx.supplier.id,
        purchase_cost: cost,
        sale_price: price,
        current_stock: stock,
        minimum_stock: 5,
        maximum_stock: 50,
        active: true,
    }
}

pub async fn create_product(state: &AppState, fx: &Fixture, code: &str, cost: Decimal, price: Decimal, stock: i32) -> Product {
    state
        .catalog_service
        .create_product(&state.db_pool, &product_payload(fx, code, cost, price, stock))
        .await
        .expect("produto")
}
