//! Lead repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::{Email, LeadStatus};

use super::{DbError, Person};

/// Lead row, serialized as stored
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lead {
    pub id: i64,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: Option<String>,
    pub status: String,
    pub source: String,
    pub country: String,
    pub avatar: Option<String>,
    pub owner_name: String,
    pub owner_avatar: String,
    pub created_at: DateTime<Utc>,
}

/// Validated lead ready to insert
#[derive(Debug, Clone)]
pub struct NewLead {
    pub name: String,
    pub company: String,
    pub email: Email,
    pub phone: Option<String>,
    pub status: LeadStatus,
    pub source: String,
    pub country: String,
    pub avatar: String,
    pub owner: Person,
}

/// Lead repository
pub struct LeadRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> LeadRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All leads, most recently created id first.
    pub async fn list(&self) -> Result<Vec<Lead>, DbError> {
        let leads = sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, company, email, phone, status, source, country,
                   avatar, owner_name, owner_avatar, created_at
            FROM leads
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(leads)
    }

    pub async fn get(&self, id: i64) -> Result<Lead, DbError> {
        sqlx::query_as::<_, Lead>(
            r#"
            SELECT id, name, company, email, phone, status, source, country,
                   avatar, owner_name, owner_avatar, created_at
            FROM leads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("lead", id))
    }

    pub async fn create(&self, lead: NewLead) -> Result<Lead, DbError> {
        let lead = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads
                (name, company, email, phone, status, source, country, avatar, owner_name, owner_avatar)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, name, company, email, phone, status, source, country,
                      avatar, owner_name, owner_avatar, created_at
            "#,
        )
        .bind(&lead.name)
        .bind(&lead.company)
        .bind(lead.email.as_str())
        .bind(lead.phone.as_deref())
        .bind(lead.status.as_str())
        .bind(&lead.source)
        .bind(&lead.country)
        .bind(&lead.avatar)
        .bind(&lead.owner.name)
        .bind(&lead.owner.avatar)
        .fetch_one(self.pool)
        .await?;

        Ok(lead)
    }
}
