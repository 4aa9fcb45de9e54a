// src/services/catalog_service.rs

use sqlx::{Executor, Sqlite};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    db::CatalogRepository,
    models::catalog::{
        Category, CategoryPayload, Product, ProductPayload, ProductView, Supplier, SupplierPayload,
    },
};

#[derive(Clone)]
pub struct CatalogService {
    repo: CatalogRepository,
}

impl CatalogService {
    pub fn new(repo: CatalogRepository) -> Self {
        Self { repo }
    }

    // --- CATEGORIAS ---

    pub async fn create_category<'e, E>(&self, executor: E, payload: &CategoryPayload) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        payload.validate()?;
        let category = self.repo.create_category(executor, payload).await?;
        tracing::info!(category_id = %category.id, name = %category.name, "categoria criada");
        Ok(category)
    }

    pub async fn list_categories<'e, E>(&self, executor: E) -> Result<Vec<Category>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.get_all_categories(executor).await
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
        payload.validate()?;
        self.repo.update_category(executor, id, payload).await
    }

    pub async fn delete_category<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete_category(executor, id).await? {
            return Err(AppError::RecordNotFound { entity: "Categoria", id });
        }
        tracing::info!(category_id = %id, "categoria removida");
        Ok(())
    }

    // --- FORNECEDORES ---

    pub async fn create_supplier<'e, E>(&self, executor: E, payload: &SupplierPayload) -> Result<Supplier, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        payload.validate()?;
        let supplier = self.repo.create_supplier(executor, payload).await?;
        tracing::info!(supplier_id = %supplier.id, name = %supplier.name, "fornecedor criado");
        Ok(supplier)
    }

    pub async fn list_suppliers<'e, E>(&self, executor: E) -> Result<Vec<Supplier>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.get_all_suppliers(executor).await
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
        payload.validate()?;
        self.repo.update_supplier(executor, id, payload).await
    }

    pub async fn delete_supplier<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete_supplier(executor, id).await? {
            return Err(AppError::RecordNotFound { entity: "Fornecedor", id });
        }
        Ok(())
    }

    // --- PRODUTOS ---

    pub async fn create_product<'e, E>(&self, executor: E, payload: &ProductPayload) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        payload.validate()?;
        let product = self.repo.create_product(executor, payload).await?;
        tracing::info!(product_id = %product.id, code = %product.code, "produto criado");
        Ok(product)
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
        payload.validate()?;
        let product = self.repo.update_product(executor, id, payload).await?;
        tracing::info!(product_id = %product.id, code = %product.code, "produto atualizado");
        Ok(product)
    }

    pub async fn get_product<'e, E>(&self, executor: E, id: Uuid) -> Result<ProductView, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo
            .get_product_view(executor, id)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn list_products<'e, E>(&self, executor: E, only_active: bool) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.get_all_products(executor, only_active).await
    }

    pub async fn list_low_stock_products<'e, E>(&self, executor: E) -> Result<Vec<ProductView>, AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        self.repo.get_low_stock_products(executor).await
    }

    /// Produtos com movimentações ou vendas não podem sair (FK); o erro do banco sobe.
    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if !self.repo.delete_product(executor, id).await? {
            return Err(AppError::ProductNotFound(id));
        }
        tracing::info!(product_id = %id, "produto removido");
        Ok(())
    }
}
