// src/db/catalog_repo.rs

use chrono::Utc;
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::{
    common::{
        db_utils::{map_check_violation, map_unique_violation},
        error::AppError,
    },
    models::catalog::{
        Category, CategoryPayload, Product, ProductPayload, ProductView, Supplier, SupplierPayload,
    },
};

// Produto + nomes de categoria e fornecedor. LEFT JOIN: nomes ausentes viram NULL.
const PRODUCT_VIEW_SELECT: &str = r#"
    SELECT p.*, c.name AS category_name, s.name AS supplier_name
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN suppliers s ON s.id = p.supplier_id
"#;

#[derive(Clone, Default)]
pub struct CatalogRepository;

impl CatalogRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CATEGORIAS
    // =========================================================================

    pub async fn get_all_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let categories = sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(categories)
    }

    pub async fn find_category_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let category = sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE name = $1")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(category)
    }

    /// Nome duplicado é barrado pela constraint UNIQUE, não por consulta prévia.
    pub async fn create_category<'e, E>(&self, executor: E, payload: &CategoryPayload) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, description)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.description)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::CategoryNameAlreadyExists(payload.name.clone())))
    }

    pub async fn update_category<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CategoryPayload,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = $1, description = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::CategoryNameAlreadyExists(payload.name.clone())))?
        .ok_or(AppError::RecordNotFound { entity: "Categoria", id })
    }

    /// Remove a categoria. Se houver produtos apontando para ela, o banco recusa (FK).
    pub async fn delete_category<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  FORNECEDORES
    // =========================================================================

    pub async fn get_all_suppliers<'e, E>(&self, executor: E) -> Result<Vec<Supplier>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let suppliers = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(suppliers)
    }

    pub async fn find_supplier_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Supplier>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let supplier = sqlx::query_as::<_, Supplier>("SELECT * FROM suppliers WHERE name = $1 LIMIT 1")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(supplier)
    }

    pub async fn create_supplier<'e, E>(&self, executor: E, payload: &SupplierPayload) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let supplier = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (id, name, contact, phone, email, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.contact)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .fetch_one(executor)
        .await?;
        Ok(supplier)
    }

    pub async fn update_supplier<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &SupplierPayload,
    ) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Supplier>(
            r#"
            UPDATE suppliers
            SET name = $1, contact = $2, phone = $3, email = $4, address = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.contact)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(id)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::RecordNotFound { entity: "Fornecedor", id })
    }

    pub async fn delete_supplier<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  PRODUTOS
    // =========================================================================

    pub async fn get_all_products<'e, E>(&self, executor: E, only_active: bool) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE ($1 = 0 OR p.active = 1) ORDER BY p.name ASC");
        let products = sqlx::query_as::<_, ProductView>(&sql)
            .bind(only_active)
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    /// Produtos ativos com saldo menor ou igual ao mínimo.
    pub async fn get_low_stock_products<'e, E>(&self, executor: E) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!(
            "{PRODUCT_VIEW_SELECT} WHERE p.active = 1 AND p.current_stock <= p.minimum_stock ORDER BY p.name ASC"
        );
        let products = sqlx::query_as::<_, ProductView>(&sql).fetch_all(executor).await?;
        Ok(products)
    }

    pub async fn get_product_view<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<ProductView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{PRODUCT_VIEW_SELECT} WHERE p.id = $1");
        let product = sqlx::query_as::<_, ProductView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn get_product<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_product_by_code<'e, E>(&self, executor: E, code: &str) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE code = $1")
            .bind(code)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    /// Cria um item do catálogo. Categoria ou fornecedor inexistente = violação de FK,
    /// propagada como `DatabaseError`.
    pub async fn create_product<'e, E>(&self, executor: E, payload: &ProductPayload) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                id, name, description, code, category_id, brand, unit_of_measure, supplier_id,
                purchase_cost, sale_price, current_stock, minimum_stock, maximum_stock,
                registration_date, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.code)
        .bind(payload.category_id)
        .bind(&payload.brand)
        .bind(&payload.unit_of_measure)
        .bind(payload.supplier_id)
        .bind(payload.purchase_cost.to_string())
        .bind(payload.sale_price.to_string())
        .bind(payload.current_stock)
        .bind(payload.minimum_stock)
        .bind(payload.maximum_stock)
        .bind(Utc::now())
        .bind(payload.active)
        .fetch_one(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::ProductCodeAlreadyExists(payload.code.clone())))
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &ProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = $1, description = $2, code = $3, category_id = $4, brand = $5,
                unit_of_measure = $6, supplier_id = $7, purchase_cost = $8, sale_price = $9,
                current_stock = $10, minimum_stock = $11, maximum_stock = $12, active = $13
            WHERE id = $14
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.description)
        .bind(&payload.code)
        .bind(payload.category_id)
        .bind(&payload.brand)
        .bind(&payload.unit_of_measure)
        .bind(payload.supplier_id)
        .bind(payload.purchase_cost.to_string())
        .bind(payload.sale_price.to_string())
        .bind(payload.current_stock)
        .bind(payload.minimum_stock)
        .bind(payload.maximum_stock)
        .bind(payload.active)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_unique_violation(e, || AppError::ProductCodeAlreadyExists(payload.code.clone())))?
        .ok_or(AppError::ProductNotFound(id))
    }

    /// Soma (ou subtrai) `delta` do contador desnormalizado de saldo. A constraint CHECK
    /// mantém o resultado dentro de `i32`; estourar vira `StockOutOfRange`.
    pub async fn adjust_current_stock<'e, E>(&self, executor: E, id: Uuid, delta: i32) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET current_stock = current_stock + $1
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(delta)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_check_violation(e, || AppError::StockOutOfRange(id)))?
        .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
