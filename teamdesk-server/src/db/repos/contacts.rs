//! Contact repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::Email;

use super::DbError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub company: String,
    pub tags: Vec<String>,
    pub avatar: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub company: String,
    pub tags: Vec<String>,
    pub avatar: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub tags: Option<Vec<String>>,
    pub avatar: Option<String>,
}

impl ContactChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.company.is_none()
            && self.tags.is_none()
            && self.avatar.is_none()
    }
}

/// Contact repository
pub struct ContactRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ContactRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Contact>, DbError> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT id, name, email, phone, company, tags, avatar, created_at
            FROM contacts
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(contacts)
    }

    pub async fn create(&self, contact: NewContact) -> Result<Contact, DbError> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, email, phone, company, tags, avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, phone, company, tags, avatar, created_at
            "#,
        )
        .bind(&contact.name)
        .bind(contact.email.as_str())
        .bind(&contact.phone)
        .bind(&contact.company)
        .bind(&contact.tags)
        .bind(&contact.avatar)
        .fetch_one(self.pool)
        .await?;

        Ok(contact)
    }

    pub async fn update(&self, id: i64, changes: ContactChanges) -> Result<Contact, DbError> {
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                phone = COALESCE($4, phone),
                company = COALESCE($5, company),
                tags = COALESCE($6, tags),
                avatar = COALESCE($7, avatar)
            WHERE id = $1
            RETURNING id, name, email, phone, company, tags, avatar, created_at
            "#,
        )
        .bind(id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_ref().map(Email::as_str))
        .bind(changes.phone.as_deref())
        .bind(changes.company.as_deref())
        .bind(changes.tags.as_deref())
        .bind(changes.avatar.as_deref())
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("contact", id))
    }
}
