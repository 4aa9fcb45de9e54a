// src/services/seed_service.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{Acquire, Sqlite, SqliteConnection};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, SalesRepository, UserRepository},
    models::{
        catalog::{CategoryPayload, ProductPayload, SupplierPayload},
        sales::CustomerPayload,
        user::UserPayload,
    },
};

const CATEGORIES: &[(&str, &str)] = &[
    ("Eletrônicos", "Produtos eletrônicos e tecnologia"),
    ("Roupas", "Vestuário e acessórios"),
    ("Casa e Jardim", "Produtos para casa e jardim"),
    ("Esportes", "Artigos esportivos e fitness"),
    ("Livros", "Livros e material educativo"),
];

// (nome, contato, telefone, e-mail, endereço)
const SUPPLIERS: &[(&str, &str, &str, &str, &str)] = &[
    (
        "TechSupplier Ltda",
        "João Silva",
        "(11) 99999-1111",
        "contato@techsupplier.com",
        "Rua da Tecnologia, 123 - São Paulo, SP",
    ),
    (
        "Moda & Estilo",
        "Maria Santos",
        "(11) 99999-2222",
        "vendas@modaestilo.com",
        "Av. da Moda, 456 - São Paulo, SP",
    ),
    (
        "Casa Bella",
        "Pedro Oliveira",
        "(11) 99999-3333",
        "pedidos@casabella.com",
        "Rua do Lar, 789 - São Paulo, SP",
    ),
];

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    code: &'static str,
    category: &'static str,
    supplier: &'static str,
    brand: &'static str,
    purchase_cost: i64,
    sale_price: i64,
    current_stock: i32,
    minimum_stock: i32,
    maximum_stock: i32,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        name: "Smartphone Samsung Galaxy",
        description: "Smartphone Android com 128GB de armazenamento",
        code: "TECH001",
        category: "Eletrônicos",
        supplier: "TechSupplier Ltda",
        brand: "Samsung",
        purchase_cost: 800,
        sale_price: 1200,
        current_stock: 15,
        minimum_stock: 5,
        maximum_stock: 50,
    },
    SeedProduct {
        name: "Notebook Dell Inspiron",
        description: "Notebook para uso profissional com 8GB RAM",
        code: "TECH002",
        category: "Eletrônicos",
        supplier: "TechSupplier Ltda",
        brand: "Dell",
        purchase_cost: 2000,
        sale_price: 2800,
        current_stock: 8,
        minimum_stock: 3,
        maximum_stock: 20,
    },
    SeedProduct {
        name: "Camiseta Polo",
        description: "Camiseta polo masculina 100% algodão",
        code: "ROUPA001",
        category: "Roupas",
        supplier: "Moda & Estilo",
        brand: "Polo Style",
        purchase_cost: 25,
        sale_price: 45,
        current_stock: 50,
        minimum_stock: 10,
        maximum_stock: 100,
    },
    SeedProduct {
        name: "Jeans Masculino",
        description: "Calça jeans masculina slim fit",
        code: "ROUPA002",
        category: "Roupas",
        supplier: "Moda & Estilo",
        brand: "Denim Co",
        purchase_cost: 40,
        sale_price: 80,
        current_stock: 2,
        minimum_stock: 5,
        maximum_stock: 50,
    },
    SeedProduct {
        name: "Aspirador de Pó",
        description: "Aspirador de pó portátil 1200W",
        code: "CASA001",
        category: "Casa e Jardim",
        supplier: "Casa Bella",
        brand: "CleanMax",
        purchase_cost: 150,
        sale_price: 250,
        current_stock: 12,
        minimum_stock: 5,
        maximum_stock: 30,
    },
];

/// Quantos registros cada execução realmente criou.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub users: usize,
    pub categories: usize,
    pub suppliers: usize,
    pub products: usize,
    pub customers: usize,
}

impl SeedSummary {
    pub fn total(&self) -> usize {
        self.users + self.categories + self.suppliers + self.products + self.customers
    }
}

#[derive(Clone)]
pub struct SeedService {
    user_repo: UserRepository,
    catalog_repo: CatalogRepository,
    sales_repo: SalesRepository,
}

impl SeedService {
    pub fn new(user_repo: UserRepository, catalog_repo: CatalogRepository, sales_repo: SalesRepository) -> Self {
        Self { user_repo, catalog_repo, sales_repo }
    }

    /// Popula o banco com os dados de exemplo. Registros já existentes (mesmo
    /// username, nome ou código) são mantidos, então rodar de novo não duplica nada.
    pub async fn run<'e, E>(&self, executor: E) -> Result<SeedSummary, AppError>
    where
        E: Acquire<'e, Database = Sqlite>,
    {
        let mut tx = executor.begin().await?;
        let mut summary = SeedSummary::default();

        // 1. Administrador
        if self.user_repo.find_by_username(&mut *tx, "admin").await?.is_none() {
            let payload = UserPayload {
                username: "admin".to_string(),
                full_name: "Administrador do Sistema".to_string(),
                email: Some("admin@sistema.com".to_string()),
                access_level: "administrador".to_string(),
            };
            self.user_repo.create_user(&mut *tx, &payload).await?;
            summary.users += 1;
        }

        // 2. Categorias
        for (name, description) in CATEGORIES {
            if self.catalog_repo.find_category_by_name(&mut *tx, name).await?.is_none() {
                let payload = CategoryPayload {
                    name: name.to_string(),
                    description: Some(description.to_string()),
                };
                self.catalog_repo.create_category(&mut *tx, &payload).await?;
                summary.categories += 1;
            }
        }

        // 3. Fornecedores
        for (name, contact, phone, email, address) in SUPPLIERS {
            if self.catalog_repo.find_supplier_by_name(&mut *tx, name).await?.is_none() {
                let payload = SupplierPayload {
                    name: name.to_string(),
                    contact: Some(contact.to_string()),
                    phone: Some(phone.to_string()),
                    email: Some(email.to_string()),
                    address: Some(address.to_string()),
                };
                self.catalog_repo.create_supplier(&mut *tx, &payload).await?;
                summary.suppliers += 1;
            }
        }

        // 4. Produtos
        for seed in PRODUCTS {
            if self.catalog_repo.find_product_by_code(&mut *tx, seed.code).await?.is_some() {
                continue;
            }
            let category_id = self.category_id(&mut *tx, seed.category).await?;
            let supplier_id = self.supplier_id(&mut *tx, seed.supplier).await?;

            let payload = ProductPayload {
                name: seed.name.to_string(),
                description: Some(seed.description.to_string()),
                code: seed.code.to_string(),
                category_id,
                brand: Some(seed.brand.to_string()),
                unit_of_measure: Some("unidade".to_string()),
                supplier_id,
                purchase_cost: Decimal::from(seed.purchase_cost),
                sale_price: Decimal::from(seed.sale_price),
                current_stock: seed.current_stock,
                minimum_stock: seed.minimum_stock,
                maximum_stock: seed.maximum_stock,
                active: true,
            };
            self.catalog_repo.create_product(&mut *tx, &payload).await?;
            summary.products += 1;
        }

        // 5. Cliente padrão
        if self.sales_repo.find_customer_by_name(&mut *tx, "Cliente Padrão").await?.is_none() {
            let payload = CustomerPayload {
                name: "Cliente Padrão".to_string(),
                cpf_cnpj: Some("123.456.789-00".to_string()),
                phone: Some("(11) 99999-0000".to_string()),
                email: Some("cliente@email.com".to_string()),
                address: Some("Rua do Cliente, 123 - São Paulo, SP".to_string()),
            };
            self.sales_repo.create_customer(&mut *tx, &payload).await?;
            summary.customers += 1;
        }

        tx.commit().await?;

        tracing::info!(
            users = summary.users,
            categories = summary.categories,
            suppliers = summary.suppliers,
            products = summary.products,
            customers = summary.customers,
            "dados de exemplo aplicados"
        );
        Ok(summary)
    }

    async fn category_id(&self, conn: &mut SqliteConnection, name: &str) -> Result<Uuid, AppError> {
        self.catalog_repo
            .find_category_by_name(&mut *conn, name)
            .await?
            .map(|c| c.id)
            .ok_or_else(|| anyhow::anyhow!("categoria '{name}' ausente no seed").into())
    }

    async fn supplier_id(&self, conn: &mut SqliteConnection, name: &str) -> Result<Uuid, AppError> {
        self.catalog_repo
            .find_supplier_by_name(&mut *conn, name)
            .await?
            .map(|s| s.id)
            .ok_or_else(|| anyhow::anyhow!("fornecedor '{name}' ausente no seed").into())
    }
}
