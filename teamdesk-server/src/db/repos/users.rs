//! Team member repository
//!
//! Email is the only constraint the schema enforces (UNIQUE); violations
//! surface as `DbError::Conflict` instead of a check-then-insert.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::Email;

use super::DbError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub avatar: String,
}

#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub avatar: Option<String>,
}

impl UserChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.avatar.is_none()
    }
}

pub struct UserRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Team in join order.
    pub async fn list(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, created_at FROM users ORDER BY id ASC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, avatar, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("user", email))
    }

    pub async fn create(&self, user: NewUser) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, avatar)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, avatar, created_at
            "#,
        )
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.avatar)
        .fetch_one(self.pool)
        .await
        .map_err(|e| DbError::from_unique(e, "user", user.email.as_str()))
    }

    pub async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DbError> {
        let email = changes.email.as_ref().map(Email::as_str);

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                avatar = COALESCE($4, avatar)
            WHERE id = $1
            RETURNING id, name, email, avatar, created_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(email)
        .bind(changes.avatar.as_deref())
        .fetch_optional(self.pool)
        .await
        .map_err(|e| DbError::from_unique(e, "user", email.unwrap_or_default()))?
        .ok_or_else(|| DbError::not_found("user", id))
    }
}
