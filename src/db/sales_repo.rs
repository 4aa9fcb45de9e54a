// src/db/sales_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::sales::{Customer, CustomerPayload, Sale, SaleItem, SaleItemView, SaleView},
};

const SALE_VIEW_SELECT: &str = r#"
    SELECT s.*, c.name AS customer_name, u.username AS responsible_name
    FROM sales s
    LEFT JOIN customers c ON c.id = s.customer_id
    LEFT JOIN users u ON u.id = s.responsible_id
"#;

#[derive(Clone, Default)]
pub struct SalesRepository;

impl SalesRepository {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer<'e, E>(&self, executor: E, payload: &CustomerPayload) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (id, name, cpf_cnpj, phone, email, address)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&payload.name)
        .bind(&payload.cpf_cnpj)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::CustomerDocumentAlreadyExists(payload.cpf_cnpj.clone().unwrap_or_default())
            })
        })
    }

    pub async fn update_customer<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CustomerPayload,
    ) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = $1, cpf_cnpj = $2, phone = $3, email = $4, address = $5
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(&payload.name)
        .bind(&payload.cpf_cnpj)
        .bind(&payload.phone)
        .bind(&payload.email)
        .bind(&payload.address)
        .bind(id)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                AppError::CustomerDocumentAlreadyExists(payload.cpf_cnpj.clone().unwrap_or_default())
            })
        })?
        .ok_or(AppError::RecordNotFound { entity: "Cliente", id })
    }

    pub async fn get_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn find_customer_by_name<'e, E>(&self, executor: E, name: &str) -> Result<Option<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let customer = sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE name = $1 LIMIT 1")
            .bind(name)
            .fetch_optional(executor)
            .await?;
        Ok(customer)
    }

    pub async fn list_customers<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let customers = sqlx::query_as::<_, Customer>("SELECT * FROM customers ORDER BY name ASC")
            .fetch_all(executor)
            .await?;
        Ok(customers)
    }

    pub async fn delete_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    //  VENDAS
    // =========================================================================

    pub async fn create_sale<'e, E>(
        &self,
        executor: E,
        customer_id: Option<Uuid>,
        responsible_id: Uuid,
        sale_date: DateTime<Utc>,
        total_value: Decimal,
        total_profit: Decimal,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (id, customer_id, sale_date, total_value, total_profit, responsible_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(customer_id)
        .bind(sale_date)
        .bind(total_value.to_string())
        .bind(total_profit.to_string())
        .bind(responsible_id)
        .fetch_one(executor)
        .await?;

        Ok(sale)
    }

    /// Grava um item já com o snapshot de preço e custo montado pelo serviço.
    pub async fn add_sale_item<'e, E>(&self, executor: E, item: &SaleItem) -> Result<SaleItem, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (
                id, sale_id, product_id, quantity, unit_sale_price, unit_purchase_cost, item_profit
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(item.id)
        .bind(item.sale_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_sale_price.to_string())
        .bind(item.unit_purchase_cost.to_string())
        .bind(item.item_profit.to_string())
        .fetch_one(executor)
        .await?;

        Ok(item)
    }

    pub async fn get_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sale = sqlx::query_as::<_, Sale>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    /// Cabeçalho + nomes auxiliares. Os itens vêm de `list_sale_item_views`.
    pub async fn get_sale_view<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<SaleView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SALE_VIEW_SELECT} WHERE s.id = $1");
        let sale = sqlx::query_as::<_, SaleView>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(sale)
    }

    pub async fn list_sale_views<'e, E>(&self, executor: E) -> Result<Vec<SaleView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SALE_VIEW_SELECT} ORDER BY s.sale_date DESC");
        let sales = sqlx::query_as::<_, SaleView>(&sql).fetch_all(executor).await?;
        Ok(sales)
    }

    /// Vendas em [start, end).
    pub async fn list_sale_views_by_period<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sql = format!("{SALE_VIEW_SELECT} WHERE s.sale_date >= $1 AND s.sale_date < $2 ORDER BY s.sale_date DESC");
        let sales = sqlx::query_as::<_, SaleView>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(executor)
            .await?;
        Ok(sales)
    }

    pub async fn list_sales_by_period<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Sale>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let sales = sqlx::query_as::<_, Sale>(
            "SELECT * FROM sales WHERE sale_date >= $1 AND sale_date < $2 ORDER BY sale_date ASC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(executor)
        .await?;
        Ok(sales)
    }

    pub async fn list_sale_items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItem>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, SaleItem>("SELECT * FROM sale_items WHERE sale_id = $1")
            .bind(sale_id)
            .fetch_all(executor)
            .await?;
        Ok(items)
    }

    pub async fn list_sale_item_views<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<Vec<SaleItemView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let items = sqlx::query_as::<_, SaleItemView>(
            r#"
            SELECT i.*, p.name AS product_name
            FROM sale_items i
            LEFT JOIN products p ON p.id = i.product_id
            WHERE i.sale_id = $1
            "#,
        )
        .bind(sale_id)
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Apaga a venda; os itens saem junto via ON DELETE CASCADE.
    pub async fn delete_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count_sale_items<'e, E>(&self, executor: E, sale_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sale_items WHERE sale_id = $1")
            .bind(sale_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }
}
