//! Bookmark repository

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::BookmarkKind;

use super::DbError;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bookmark {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub title: String,
    pub subtitle: String,
    pub kind: BookmarkKind,
}

pub struct BookmarkRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> BookmarkRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Bookmark>, DbError> {
        let bookmarks = sqlx::query_as::<_, Bookmark>(
            "SELECT id, title, subtitle, type, created_at FROM bookmarks ORDER BY id DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(bookmarks)
    }

    pub async fn create(&self, bookmark: NewBookmark) -> Result<Bookmark, DbError> {
        let bookmark = sqlx::query_as::<_, Bookmark>(
            r#"
            INSERT INTO bookmarks (title, subtitle, type)
            VALUES ($1, $2, $3)
            RETURNING id, title, subtitle, type, created_at
            "#,
        )
        .bind(&bookmark.title)
        .bind(&bookmark.subtitle)
        .bind(bookmark.kind.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(bookmark)
    }
}
