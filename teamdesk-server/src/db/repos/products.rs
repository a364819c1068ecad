//! Product catalogue repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use super::DbError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
}

pub struct ProductRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Product>, DbError> {
        let products = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, category, created_at FROM products ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    pub async fn create(&self, product: NewProduct) -> Result<Product, DbError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, price, category)
            VALUES ($1, $2, $3)
            RETURNING id, name, price, category, created_at
            "#,
        )
        .bind(&product.name)
        .bind(product.price)
        .bind(&product.category)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }
}
