//! Bookmark endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Deserialize;
use teamdesk_core::models::{optional_text, required_text, BookmarkKind, MAX_SHORT_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{Bookmark, BookmarkRepo, NewBookmark};
use crate::http::error::ApiError;
use crate::http::extractors::ApiJson;
use crate::http::server::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookmarkRequest {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl CreateBookmarkRequest {
    fn into_new_bookmark(self) -> Result<NewBookmark, ValidationError> {
        Ok(NewBookmark {
            title: required_text("title", self.title.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            subtitle: optional_text("subtitle", self.subtitle.as_deref(), MAX_SHORT_TEXT)?
                .unwrap_or_default(),
            kind: BookmarkKind::parse(self.kind.as_deref().unwrap_or_default().trim())?,
        })
    }
}

/// GET /bookmarks
async fn list_bookmarks(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Bookmark>>, ApiError> {
    let bookmarks = BookmarkRepo::new(&state.pool).list().await?;
    Ok(Json(bookmarks))
}

/// POST /bookmarks
async fn create_bookmark(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>), ApiError> {
    let bookmark = BookmarkRepo::new(&state.pool)
        .create(req.into_new_bookmark()?)
        .await?;
    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Bookmark routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/bookmarks", get(list_bookmarks).post(create_bookmark))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{app, post};
    use serde_json::json;

    #[test]
    fn subtitle_is_optional() {
        let req: CreateBookmarkRequest =
            serde_json::from_value(json!({ "title": "Q4 Sales Performance", "type": "report" }))
                .unwrap();
        let bookmark = req.into_new_bookmark().unwrap();
        assert_eq!(bookmark.subtitle, "");
        assert_eq!(bookmark.kind, BookmarkKind::Report);
    }

    #[tokio::test]
    async fn unknown_type_is_400() {
        let (status, json) =
            post(app(), "/api/bookmarks", json!({ "title": "x", "type": "contact" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "invalid type value: 'contact'");
    }
}
