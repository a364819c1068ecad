//! Team member endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use teamdesk_core::models::{default_avatar, optional_text, required_text, Email, MAX_SHORT_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{NewUser, User, UserChanges, UserRepo};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl CreateUserRequest {
    fn into_new_user(self) -> Result<NewUser, ValidationError> {
        let email = Email::new(self.email.as_deref().unwrap_or_default())?;
        let avatar = optional_text("avatar", self.avatar.as_deref(), MAX_SHORT_TEXT)?
            .unwrap_or_else(|| default_avatar(email.as_str()));

        Ok(NewUser {
            name: required_text("name", self.name.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            email,
            avatar,
        })
    }
}

impl UpdateUserRequest {
    fn into_changes(self) -> Result<UserChanges, ValidationError> {
        let changes = UserChanges {
            name: self
                .name
                .as_deref()
                .map(|n| required_text("name", n, MAX_SHORT_TEXT))
                .transpose()?,
            email: self.email.as_deref().map(Email::new).transpose()?,
            avatar: optional_text("avatar", self.avatar.as_deref(), MAX_SHORT_TEXT)?,
        };

        if changes.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(changes)
    }
}

/// GET /users
async fn list_users(State(state): State<Arc<AppState>>) -> Result<Json<Vec<User>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users))
}

/// GET /users/me - the signed-in (demo) user
async fn current_user(State(state): State<Arc<AppState>>) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .get_by_email(&state.team.demo_email)
        .await?;
    Ok(Json(user))
}

/// POST /users
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = UserRepo::new(&state.pool).create(req.into_new_user()?).await?;

    tracing::info!(user_id = user.id, "Team member added");
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateUserRequest>,
) -> Result<Json<User>, ApiError> {
    let user = UserRepo::new(&state.pool)
        .update(id, req.into_changes()?)
        .await?;
    Ok(Json(user))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/me", get(current_user))
        .route("/users/{id}", put(update_user))
}
