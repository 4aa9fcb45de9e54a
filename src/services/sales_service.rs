// src/services/sales_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, Sqlite};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SalesRepository},
    models::{
        catalog::is_money_in_range,
        sales::{item_totals, Customer, CustomerPayload, NewSale, SaleItem, SaleTotalsCheck, SaleView},
    },
};

fn money_out_of_range(field: &'static str) -> AppError {
    let mut err = ValidationError::new("money");
    err.message = Some("O valor ultrapassa o limite de 99.999.999,99.".into());
    let mut errors = ValidationErrors::new();
    errors.add(field, err);
    AppError::ValidationError(errors)
}

#[derive(Clone)]
pub struct SalesService {
    catalog_repo: CatalogRepository,
    sales_repo: SalesRepository,
}

impl SalesService {
    pub fn new(catalog_repo: CatalogRepository, sales_repo: SalesRepository) -> Self {
        Self { catalog_repo, sales_repo }
    }

    // =========================================================================
    //  CLIENTES
    // =========================================================================

    pub async fn create_customer<'e, E>(&self, executor: E, payload: &CustomerPayload) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        payload.validate()?;
        let customer = self.sales_repo.create_customer(executor, payload).await?;
        tracing::info!(customer_id = %customer.id, name = %customer.name, "cliente criado");
        Ok(customer)
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
        payload.validate()?;
        self.sales_repo.update_customer(executor, id, payload).await
    }

    pub async fn get_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<Customer, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.sales_repo
            .get_customer(executor, id)
            .await?
            .ok_or(AppError::RecordNotFound { entity: "Cliente", id })
    }

    pub async fn list_customers<'e, E>(&self, executor: E) -> Result<Vec<Customer>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.sales_repo.list_customers(executor).await
    }

    pub async fn delete_customer<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.sales_repo.delete_customer(executor, id).await? {
            return Err(AppError::RecordNotFound { entity: "Cliente", id });
        }
        Ok(())
    }

    // =========================================================================
    //  VENDAS
    // =========================================================================

    /// Registra a venda numa transação: congela preço e custo de cada produto nos
    /// itens, grava os totais somados e baixa o `current_stock` de cada produto.
    /// O livro-razão de estoque não é tocado.
    pub async fn create_sale<'e, E>(&self, executor: E, payload: &NewSale) -> Result<SaleView, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        payload.validate()?;

        let mut tx = executor.begin().await?;

        // 1. Snapshot de preço/custo de cada produto
        let mut items = Vec::with_capacity(payload.items.len());
        for line in &payload.items {
            let product = self
                .catalog_repo
                .get_product(&mut *tx, line.product_id)
                .await?
                .ok_or(AppError::ProductNotFound(line.product_id))?;

            if !product.active {
                return Err(AppError::ProductInactive(product.name));
            }
            // Linhas antigas podem ter escapado da validação do cadastro
            if !is_money_in_range(&product.sale_price) || !is_money_in_range(&product.purchase_cost) {
                return Err(money_out_of_range("items"));
            }

            items.push(SaleItem::snapshot(&product, line.quantity));
        }

        // 2. Totais calculados uma única vez, na criação, pela mesma soma da conferência
        let (total_value, total_profit) = item_totals(&items);
        if !is_money_in_range(&total_value) {
            return Err(money_out_of_range("total_value"));
        }
        if !is_money_in_range(&total_profit) {
            return Err(money_out_of_range("total_profit"));
        }

        let sale = self
            .sales_repo
            .create_sale(
                &mut *tx,
                payload.customer_id,
                payload.responsible_id,
                Utc::now(),
                total_value,
                total_profit,
            )
            .await?;

        // 3. Itens + baixa no saldo do produto
        for item in &mut items {
            item.sale_id = sale.id;
            self.sales_repo.add_sale_item(&mut *tx, item).await?;

            let product = self
                .catalog_repo
                .adjust_current_stock(&mut *tx, item.product_id, -item.quantity)
                .await?;

            if product.current_stock < 0 {
                tracing::warn!(product_id = %product.id, current_stock = product.current_stock, "venda deixou saldo negativo");
            }
        }

        // 4. Monta a projeção antes de fechar a transação
        let mut view = self
            .sales_repo
            .get_sale_view(&mut *tx, sale.id)
            .await?
            .ok_or(AppError::SaleNotFound(sale.id))?;
        view.items = self.sales_repo.list_sale_item_views(&mut *tx, sale.id).await?;

        tx.commit().await?;

        tracing::info!(
            sale_id = %sale.id,
            items = items.len(),
            total_value = %sale.total_value,
            total_profit = %sale.total_profit,
            "venda registrada"
        );

        Ok(view)
    }

    pub async fn get_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<SaleView, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let mut view = self
            .sales_repo
            .get_sale_view(&mut *conn, id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;
        view.items = self.sales_repo.list_sale_item_views(&mut *conn, id).await?;
        Ok(view)
    }

    pub async fn list_sales<'e, E>(&self, executor: E) -> Result<Vec<SaleView>, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let mut sales = self.sales_repo.list_sale_views(&mut *conn).await?;
        for sale in &mut sales {
            sale.items = self.sales_repo.list_sale_item_views(&mut *conn, sale.id).await?;
        }
        Ok(sales)
    }

    /// Vendas em [start, end), com itens.
    pub async fn list_sales_by_period<'e, E>(
        &self,
        executor: E,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<SaleView>, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let mut sales = self.sales_repo.list_sale_views_by_period(&mut *conn, start, end).await?;
        for sale in &mut sales {
            sale.items = self.sales_repo.list_sale_item_views(&mut *conn, sale.id).await?;
        }
        Ok(sales)
    }

    /// Remove a venda e, por cascata, seus itens. O saldo dos produtos não é devolvido.
    pub async fn delete_sale<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.sales_repo.delete_sale(executor, id).await? {
            return Err(AppError::SaleNotFound(id));
        }
        tracing::info!(sale_id = %id, "venda removida");
        Ok(())
    }

    /// Compara os totais gravados na venda com a soma dos itens. Nada é reescrito.
    pub async fn verify_sale_totals<'e, E>(&self, executor: E, id: Uuid) -> Result<SaleTotalsCheck, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut conn = executor.acquire().await?;

        let sale = self
            .sales_repo
            .get_sale(&mut *conn, id)
            .await?
            .ok_or(AppError::SaleNotFound(id))?;
        let items = self.sales_repo.list_sale_items(&mut *conn, id).await?;
        let (computed_value, computed_profit) = item_totals(&items);

        let check = SaleTotalsCheck {
            sale_id: id,
            stored_value: sale.total_value,
            computed_value,
            stored_profit: sale.total_profit,
            computed_profit,
        };
        if !check.is_consistent() {
            tracing::warn!(sale_id = %id, "totais da venda divergem da soma dos itens");
        }
        Ok(check)
    }
}
