//! Deal pipeline endpoints
//!
//! A drag between pipeline columns is a `PUT` carrying the new stage. The
//! update is one statement, so the client either gets the stored row back
//! or an error body it can roll back on.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use teamdesk_core::models::{amount, optional_text, required_text, DealStage, MAX_SHORT_TEXT};
use teamdesk_core::ValidationError;

use crate::db::{Deal, DealChanges, DealRepo, NewDeal, Person};
use crate::http::error::ApiError;
use crate::http::extractors::{parse_date, ApiJson, LooseId, ValidId};
use crate::http::server::AppState;

/// Deal as stored, plus the nested owner the pipeline cards render
#[derive(Debug, Serialize)]
pub struct DealResponse {
    #[serde(flatten)]
    pub deal: Deal,
    pub owner: Person,
}

impl From<Deal> for DealResponse {
    fn from(deal: Deal) -> Self {
        let owner = deal.owner();
        Self { deal, owner }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDealRequest {
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    #[serde(alias = "lead_id")]
    pub lead_id: Option<LooseId>,
    #[serde(alias = "close_date")]
    pub close_date: Option<String>,
}

impl CreateDealRequest {
    fn into_new_deal(self, owner: Person) -> Result<NewDeal, ValidationError> {
        Ok(NewDeal {
            title: required_text("title", self.title.as_deref().unwrap_or_default(), MAX_SHORT_TEXT)?,
            value: amount("value", self.value.ok_or(ValidationError::Empty { field: "value" })?)?,
            stage: match self.stage.as_deref().map(str::trim) {
                None | Some("") => DealStage::Qualification,
                Some(s) => DealStage::parse(s)?,
            },
            lead_id: lead_ref(self.lead_id)?,
            close_date: self
                .close_date
                .as_deref()
                .map(|d| parse_date("closeDate", d))
                .transpose()?,
            owner,
        })
    }
}

/// Partial update; `id` is only read by `PUT /deals`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDealRequest {
    pub id: Option<LooseId>,
    pub title: Option<String>,
    pub value: Option<f64>,
    pub stage: Option<String>,
    #[serde(alias = "lead_id")]
    pub lead_id: Option<LooseId>,
    #[serde(alias = "close_date")]
    pub close_date: Option<String>,
}

impl UpdateDealRequest {
    fn into_changes(self) -> Result<DealChanges, ValidationError> {
        let changes = DealChanges {
            title: self
                .title
                .as_deref()
                .map(|t| required_text("title", t, MAX_SHORT_TEXT))
                .transpose()?,
            value: self.value.map(|v| amount("value", v)).transpose()?,
            stage: self
                .stage
                .as_deref()
                .map(|s| DealStage::parse(s.trim()))
                .transpose()?,
            lead_id: lead_ref(self.lead_id)?,
            close_date: self
                .close_date
                .as_deref()
                .map(|d| parse_date("closeDate", d))
                .transpose()?,
        };

        if changes.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }
        Ok(changes)
    }
}

/// Lead references are free text; blank means none.
fn lead_ref(id: Option<LooseId>) -> Result<Option<String>, ValidationError> {
    let text = id.map(LooseId::into_text);
    optional_text("leadId", text.as_deref(), MAX_SHORT_TEXT)
}

/// GET /deals
async fn list_deals(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DealResponse>>, ApiError> {
    let deals = DealRepo::new(&state.pool).list().await?;
    Ok(Json(deals.into_iter().map(DealResponse::from).collect()))
}

/// POST /deals
async fn create_deal(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateDealRequest>,
) -> Result<(StatusCode, Json<DealResponse>), ApiError> {
    let new_deal = req.into_new_deal(state.default_owner())?;
    let deal = DealRepo::new(&state.pool).create(new_deal).await?;

    tracing::info!(deal_id = deal.id, stage = %deal.stage, "Deal created");
    Ok((StatusCode::CREATED, Json(DealResponse::from(deal))))
}

async fn apply_update(
    state: &AppState,
    id: i64,
    req: UpdateDealRequest,
) -> Result<Json<DealResponse>, ApiError> {
    let changes = req.into_changes()?;
    let stage = changes.stage;
    let deal = DealRepo::new(&state.pool).update(id, changes).await?;

    if let Some(stage) = stage {
        tracing::info!(deal_id = id, stage = %stage, "Deal moved");
    }
    Ok(Json(DealResponse::from(deal)))
}

/// PUT /deals - id in the body, as the pipeline board sends it
async fn update_deal(
    State(state): State<Arc<AppState>>,
    ApiJson(mut req): ApiJson<UpdateDealRequest>,
) -> Result<Json<DealResponse>, ApiError> {
    let id = req
        .id
        .take()
        .ok_or(ValidationError::Empty { field: "id" })?
        .to_id("id")?;
    apply_update(&state, id, req).await
}

/// PUT /deals/{id}
async fn update_deal_by_path(
    State(state): State<Arc<AppState>>,
    ValidId(id): ValidId,
    ApiJson(req): ApiJson<UpdateDealRequest>,
) -> Result<Json<DealResponse>, ApiError> {
    apply_update(&state, id, req).await
}

/// Deal routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deals", get(list_deals).post(create_deal).put(update_deal))
        .route("/deals/{id}", put(update_deal_by_path))
}
