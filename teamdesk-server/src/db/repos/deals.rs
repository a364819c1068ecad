//! Deal repository
//!
//! Stage updates are a single `UPDATE ... RETURNING`, so a pipeline drag
//! either lands and returns the new row or fails as a whole.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::DealStage;

use super::{DbError, Person};

/// Deal row, serialized as stored
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Deal {
    pub id: i64,
    pub title: String,
    pub value: f64,
    pub stage: String,
    /// Free text; may reference a lead that does not exist
    pub lead_id: Option<String>,
    pub owner_name: String,
    pub owner_avatar: String,
    pub close_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl Deal {
    pub fn owner(&self) -> Person {
        Person::new(&self.owner_name, &self.owner_avatar)
    }
}

#[derive(Debug, Clone)]
pub struct NewDeal {
    pub title: String,
    pub value: f64,
    pub stage: DealStage,
    pub lead_id: Option<String>,
    pub close_date: Option<NaiveDate>,
    pub owner: Person,
}

/// Fields to change; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct DealChanges {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<DealStage>,
    pub lead_id: Option<String>,
    pub close_date: Option<NaiveDate>,
}

impl DealChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.value.is_none()
            && self.stage.is_none()
            && self.lead_id.is_none()
            && self.close_date.is_none()
    }
}

/// Deal repository
pub struct DealRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> DealRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Deal>, DbError> {
        let deals = sqlx::query_as::<_, Deal>(
            r#"
            SELECT id, title, value, stage, lead_id, owner_name, owner_avatar,
                   close_date, created_at
            FROM deals
            ORDER BY id DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }

    pub async fn create(&self, deal: NewDeal) -> Result<Deal, DbError> {
        let deal = sqlx::query_as::<_, Deal>(
            r#"
            INSERT INTO deals (title, value, stage, lead_id, owner_name, owner_avatar, close_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, value, stage, lead_id, owner_name, owner_avatar,
                      close_date, created_at
            "#,
        )
        .bind(&deal.title)
        .bind(deal.value)
        .bind(deal.stage.as_str())
        .bind(deal.lead_id.as_deref())
        .bind(&deal.owner.name)
        .bind(&deal.owner.avatar)
        .bind(deal.close_date)
        .fetch_one(self.pool)
        .await?;

        Ok(deal)
    }

    /// Apply `changes` to deal `id` and return the updated row.
    pub async fn update(&self, id: i64, changes: DealChanges) -> Result<Deal, DbError> {
        sqlx::query_as::<_, Deal>(
            r#"
            UPDATE deals SET
                title = COALESCE($2, title),
                value = COALESCE($3, value),
                stage = COALESCE($4, stage),
                lead_id = COALESCE($5, lead_id),
                close_date = COALESCE($6, close_date)
            WHERE id = $1
            RETURNING id, title, value, stage, lead_id, owner_name, owner_avatar,
                      close_date, created_at
            "#,
        )
        .bind(id)
        .bind(changes.title.as_deref())
        .bind(changes.value)
        .bind(changes.stage.map(|s| s.as_str()))
        .bind(changes.lead_id.as_deref())
        .bind(changes.close_date)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("deal", id))
    }
}
