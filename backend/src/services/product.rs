//! Product catalog read service

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{Category, Product};

/// Read-only access to the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Filters for listing products
#[derive(Debug, Default, Deserialize)]
pub struct ProductFilter {
    pub is_active: Option<bool>,
    pub category_id: Option<Uuid>,
    /// Matches name, SKU or barcode, case-insensitively
    pub search: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    sku: String,
    barcode: Option<String>,
    category_id: Option<Uuid>,
    price: Decimal,
    cost: Decimal,
    apply_igv: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            sku: row.sku,
            barcode: row.barcode,
            category_id: row.category_id,
            price: row.price,
            cost: row.cost,
            apply_igv: row.apply_igv,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            description: row.description,
            created_at: row.created_at,
        }
    }
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, sku, barcode, category_id, price, cost,
                   apply_igv, is_active, created_at, updated_at
            FROM products WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// List products matching the filter, by name
    pub async fn list_products(&self, filter: ProductFilter) -> AppResult<Vec<Product>> {
        let search = filter.search.map(|s| format!("%{}%", s));

        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, sku, barcode, category_id, price, cost,
                   apply_igv, is_active, created_at, updated_at
            FROM products
            WHERE ($1::bool IS NULL OR is_active = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
              AND ($3::text IS NULL
                   OR name ILIKE $3 OR sku ILIKE $3 OR barcode ILIKE $3)
            ORDER BY name
            "#,
        )
        .bind(filter.is_active)
        .bind(filter.category_id)
        .bind(search)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List all categories, by name
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description, created_at FROM categories ORDER BY name",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }
}
