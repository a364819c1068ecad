//! Activity feed repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::ActivityKind;

use super::{DbError, Person};

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Activity {
    pub id: i64,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
    pub date: DateTime<Utc>,
    pub lead_id: Option<i64>,
    pub author_name: String,
    pub author_avatar: String,
}

impl Activity {
    pub fn author(&self) -> Person {
        Person::new(&self.author_name, &self.author_avatar)
    }
}

#[derive(Debug, Clone)]
pub struct NewActivity {
    pub kind: ActivityKind,
    pub content: String,
    pub date: DateTime<Utc>,
    pub lead_id: Option<i64>,
    pub author: Person,
}

/// Activity repository
pub struct ActivityRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ActivityRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whole feed, newest first.
    pub async fn list(&self) -> Result<Vec<Activity>, DbError> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, type, content, date, lead_id, author_name, author_avatar
            FROM activities
            ORDER BY date DESC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(activities)
    }

    /// One lead's history, oldest first (reads as a timeline).
    pub async fn list_for_lead(&self, lead_id: i64) -> Result<Vec<Activity>, DbError> {
        let activities = sqlx::query_as::<_, Activity>(
            r#"
            SELECT id, type, content, date, lead_id, author_name, author_avatar
            FROM activities
            WHERE lead_id = $1
            ORDER BY date ASC
            "#,
        )
        .bind(lead_id)
        .fetch_all(self.pool)
        .await?;

        Ok(activities)
    }

    pub async fn create(&self, activity: NewActivity) -> Result<Activity, DbError> {
        let activity = sqlx::query_as::<_, Activity>(
            r#"
            INSERT INTO activities (type, content, date, lead_id, author_name, author_avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, type, content, date, lead_id, author_name, author_avatar
            "#,
        )
        .bind(activity.kind.as_str())
        .bind(&activity.content)
        .bind(activity.date)
        .bind(activity.lead_id)
        .bind(&activity.author.name)
        .bind(&activity.author.avatar)
        .fetch_one(self.pool)
        .await?;

        Ok(activity)
    }
}
