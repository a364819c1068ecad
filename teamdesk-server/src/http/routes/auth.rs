//! Mock authentication
//!
//! One hardcoded demo account and a fixed token. Nothing is persisted and
//! no route checks the token; the dashboard only stores it to decide
//! whether to show the login page.

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{required_text, Email, MAX_SHORT_TEXT};

use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;

pub const MOCK_TOKEN: &str = "mock-jwt-token-for-teamdesk";

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// POST /auth/login
async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if req.email.trim() != state.team.demo_email || req.password != state.team.demo_password {
        tracing::warn!(email = %req.email.trim(), "Login rejected");
        return Err(ApiError::Unauthorized {
            reason: "Invalid credentials".to_string(),
        });
    }

    Ok(Json(TokenResponse { token: MOCK_TOKEN }))
}

/// POST /auth/register
async fn register(ApiJson(req): ApiJson<RegisterRequest>) -> Result<Json<TokenResponse>, ApiError> {
    required_text("name", &req.name, MAX_SHORT_TEXT)?;
    Email::new(&req.email)?;
    if req.password.is_empty() {
        return Err(teamdesk_core::ValidationError::Empty { field: "password" }.into());
    }

    Ok(Json(TokenResponse { token: MOCK_TOKEN }))
}

/// POST /auth/forgot-password
async fn forgot_password(
    ApiJson(req): ApiJson<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = required_text("email", &req.email, MAX_SHORT_TEXT)?;
    tracing::info!(%email, "Password reset requested");

    Ok(Json(MessageResponse {
        message: format!("Password reset link sent to {}", email),
    }))
}

/// Auth routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/forgot-password", post(forgot_password))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{app, post};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn demo_login_returns_token() {
        let (status, json) = post(
            app(),
            "/api/auth/login",
            json!({ "email": "alex@example.com", "password": "password" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token"], MOCK_TOKEN);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let (status, json) = post(
            app(),
            "/api/auth/login",
            json!({ "email": "alex@example.com", "password": "hunter2" }),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["details"], "Invalid credentials");
    }

    #[tokio::test]
    async fn register_validates_fields() {
        let (status, json) = post(
            app(),
            "/api/auth/register",
            json!({ "name": "Bella", "email": "bella@example.com", "password": "" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "password cannot be empty");

        let (status, json) = post(
            app(),
            "/api/auth/register",
            json!({ "name": "Bella", "email": "bella@example.com", "password": "s3cret" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["token"], MOCK_TOKEN);
    }

    #[tokio::test]
    async fn forgot_password() {
        let (status, json) =
            post(app(), "/api/auth/forgot-password", json!({ "email": "maria@example.com" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Password reset link sent to maria@example.com");

        let (status, _) = post(app(), "/api/auth/forgot-password", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
