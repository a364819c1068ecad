//! Product catalogue endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use teamdesk_core::models::{amount, required_text, MAX_SHORT_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{NewProduct, Product, ProductRepo};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
}

impl CreateProductRequest {
    fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        Ok(NewProduct {
            name: required_text("name", self.name.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            price: amount("price", self.price.ok_or(ValidationError::Empty { field: "price" })?)?,
            category: required_text(
                "category",
                self.category.as_deref().unwrap_or_default(),
                MAX_SHORT_TEXT,
            )?,
        })
    }
}

/// GET /products
async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = ProductRepo::new(&state.pool).list().await?;
    Ok(Json(products))
}

/// POST /products
async fn create_product(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let product = ProductRepo::new(&state.pool)
        .create(req.into_new_product()?)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Product routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/products", get(list_products).post(create_product))
}
