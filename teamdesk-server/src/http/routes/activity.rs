//! Activity feed endpoints

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{required_text, ActivityKind, MAX_LONG_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{Activity, ActivityRepo, NewActivity, Person};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, LooseId};
use crate::http::server::AppState;

/// Activity as stored, plus the nested author the feed renders
#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    #[serde(flatten)]
    pub activity: Activity,
    pub author: Person,
}

impl From<Activity> for ActivityResponse {
    fn from(activity: Activity) -> Self {
        let author = activity.author();
        Self { activity, author }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityRequest {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub content: Option<String>,
    #[serde(alias = "lead_id")]
    pub lead_id: Option<LooseId>,
    pub date: Option<DateTime<Utc>>,
}

impl CreateActivityRequest {
    fn into_new_activity(self, author: Person) -> Result<NewActivity, ValidationError> {
        let kind = self.kind.as_deref().map(str::trim).unwrap_or_default();
        if kind.is_empty() {
            return Err(ValidationError::Empty { field: "type" });
        }

        Ok(NewActivity {
            kind: ActivityKind::parse(kind)?,
            content: required_text(
                "content",
                self.content.as_deref().unwrap_or_default(),
                MAX_LONG_TEXT,
            )?,
            date: self.date.unwrap_or_else(Utc::now),
            lead_id: self.lead_id.map(|id| id.to_id("leadId")).transpose()?,
            author,
        })
    }
}

/// GET /activity - newest first
async fn list_activity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let activities = ActivityRepo::new(&state.pool).list().await?;
    Ok(Json(
        activities.into_iter().map(ActivityResponse::from).collect(),
    ))
}

/// POST /activity
async fn create_activity(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateActivityRequest>,
) -> Result<(StatusCode, Json<ActivityResponse>), ApiError> {
    let new_activity = req.into_new_activity(state.default_owner())?;
    let activity = ActivityRepo::new(&state.pool).create(new_activity).await?;

    tracing::info!(activity_id = activity.id, kind = %activity.kind, "Activity recorded");
    Ok((StatusCode::CREATED, Json(ActivityResponse::from(activity))))
}

/// Activity routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/activity", get(list_activity).post(create_activity))
}
