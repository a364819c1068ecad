//! Lead endpoints, plus the AI email and summary helpers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{
    default_avatar, optional_text, EmailKind, Email, LeadStatus, MAX_SHORT_TEXT,
};
use teamdesk_core::ValidationError;

use crate::chat::prompts;
use crate::db::{ActivityRepo, Lead, LeadRepo, NewLead};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, ValidId};
use crate::http::server::AppState;

/// Create lead request; everything but the email has a default
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
    pub country: Option<String>,
    pub avatar: Option<String>,
}

impl CreateLeadRequest {
    fn into_new_lead(self, state: &AppState) -> Result<NewLead, ValidationError> {
        let email = Email::new(self.email.as_deref().unwrap_or_default())?;
        let text = |field, value: &Option<String>, default: &str| {
            optional_text(field, value.as_deref(), MAX_SHORT_TEXT)
                .map(|v| v.unwrap_or_else(|| default.to_string()))
        };

        Ok(NewLead {
            name: text("name", &self.name, "No Name")?,
            company: text("company", &self.company, "No Company")?,
            phone: optional_text("phone", self.phone.as_deref(), MAX_SHORT_TEXT)?,
            status: LeadStatus::New,
            source: text("source", &self.source, "Manual Entry")?,
            country: text("country", &self.country, "Unknown")?,
            avatar: text("avatar", &self.avatar, &default_avatar(email.as_str()))?,
            email,
            owner: state.default_owner(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct DraftEmailRequest {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct DraftEmailResponse {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// GET /leads
async fn list_leads(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, ApiError> {
    let leads = LeadRepo::new(&state.pool).list().await?;
    Ok(Json(leads))
}

/// POST /leads
async fn create_lead(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateLeadRequest>,
) -> Result<(StatusCode, Json<Lead>), ApiError> {
    let new_lead = req.into_new_lead(&state)?;
    let lead = LeadRepo::new(&state.pool).create(new_lead).await?;

    tracing::info!(lead_id = lead.id, "Lead created");
    Ok((StatusCode::CREATED, Json(lead)))
}

/// POST /leads/{id}/email - draft an outreach email with the chat model
async fn draft_email(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<DraftEmailRequest>,
) -> Result<Json<DraftEmailResponse>, ApiError> {
    let kind = EmailKind::parse(req.kind.trim())?;
    let lead = LeadRepo::new(&state.pool).get(id).await?;

    let prompt = prompts::lead_email(&lead, kind, &state.team.default_owner_name);
    let email = state.chat.send(&prompt).await?;

    Ok(Json(DraftEmailResponse { email }))
}

/// POST /leads/{id}/summary - summarize the lead's activity history
async fn summarize(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
) -> Result<Json<SummaryResponse>, ApiError> {
    let lead = LeadRepo::new(&state.pool).get(id).await?;
    let activities = ActivityRepo::new(&state.pool).list_for_lead(id).await?;

    if activities.is_empty() {
        return Ok(Json(SummaryResponse {
            summary: prompts::NO_ACTIVITY_SUMMARY.to_string(),
        }));
    }

    let prompt = prompts::activity_summary(&lead, &activities);
    let summary = state.chat.send(&prompt).await?;

    Ok(Json(SummaryResponse { summary }))
}

/// Lead routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/leads", get(list_leads).post(create_lead))
        .route("/leads/{id}/email", post(draft_email))
        .route("/leads/{id}/summary", post(summarize))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::test_support::{app, post, StubChat};
    use serde_json::json;
    use teamdesk_core::config::TeamSettings;

    fn state() -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/teamdesk")
            .unwrap();
        AppState::new(pool, StubChat::replying("x"), TeamSettings::default())
    }

    #[tokio::test]
    async fn defaults_fill_missing_fields() {
        let req: CreateLeadRequest =
            serde_json::from_value(json!({ "email": "new@lead.com" })).unwrap();
        let lead = req.into_new_lead(&state()).unwrap();

        assert_eq!(lead.name, "No Name");
        assert_eq!(lead.company, "No Company");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.source, "Manual Entry");
        assert_eq!(lead.country, "Unknown");
        assert_eq!(lead.avatar, "https://i.pravatar.cc/150?u=new@lead.com");
        assert_eq!(lead.owner.name, "Alex Johnson");
        assert_eq!(lead.owner.avatar, "https://i.pravatar.cc/150?u=user-1");
    }

    #[tokio::test]
    async fn blank_fields_also_default() {
        let req: CreateLeadRequest = serde_json::from_value(json!({
            "name": "  ",
            "company": "Acme",
            "email": "a@acme.io",
            "phone": ""
        }))
        .unwrap();
        let lead = req.into_new_lead(&state()).unwrap();
        assert_eq!(lead.name, "No Name");
        assert_eq!(lead.company, "Acme");
        assert_eq!(lead.phone, None);
    }

    #[tokio::test]
    async fn missing_email_is_400() {
        let (status, json) = post(app(), "/api/leads", json!({ "name": "Nobody" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "email cannot be empty");
    }

    #[tokio::test]
    async fn malformed_email_is_400() {
        let (status, _) = post(app(), "/api/leads", json!({ "email": "not-an-email" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_400() {
        let (status, json) = crate::http::test_support::call(
            app(),
            axum::http::Method::POST,
            "/api/leads",
            Some(json!("just a string")),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Bad Request");
    }

    #[tokio::test]
    async fn unknown_email_kind_is_400() {
        let (status, json) = post(app(), "/api/leads/1/email", json!({ "type": "cold-call" })).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], "invalid type value: 'cold-call'");
    }

    #[tokio::test]
    async fn non_numeric_lead_id_is_400() {
        let (status, _) = post(app(), "/api/leads/lead-1/summary", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
