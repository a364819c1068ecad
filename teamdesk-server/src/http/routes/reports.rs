//! Reports and dashboard endpoints
//!
//! Aggregates come from [`ReportRepo`]; shaping lives in [`crate::reports`].

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::{Duration, Utc};

use crate::db::ReportRepo;
use crate::http::error::ApiError;
use crate::http::server::AppState;
use crate::reports::{
    self, Dashboard, MonthlyRevenue, ReportSummary, REVENUE_MONTHS, SALES_DAYS,
    SALES_HISTORY_LIMIT, VISITOR_WEEKS,
};

/// GET /reports/summary
async fn summary(State(state): State<Arc<AppState>>) -> Result<Json<ReportSummary>, ApiError> {
    let counts = ReportRepo::new(&state.pool).summary_counts().await?;
    Ok(Json(reports::summarize(counts)))
}

/// GET /reports/revenue - won revenue per month, oldest first
async fn revenue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MonthlyRevenue>>, ApiError> {
    let today = Utc::now().date_naive();
    let from = reports::month_start(today, REVENUE_MONTHS - 1);
    let wins = ReportRepo::new(&state.pool).wins_between(from, today).await?;

    Ok(Json(reports::monthly_revenue(today, REVENUE_MONTHS, &wins)))
}

/// GET /dashboard
async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Json<Dashboard>, ApiError> {
    let repo = ReportRepo::new(&state.pool);
    let today = Utc::now().date_naive();
    let from = today - Duration::days(i64::from(SALES_DAYS) - 1);

    let (wins, sources, countries, history) = tokio::try_join!(
        repo.wins_between(from, today),
        repo.lead_sources(),
        repo.country_sales(),
        repo.recent_wins(SALES_HISTORY_LIMIT),
    )?;

    // No deal joins a known lead: chart where the leads are instead
    let countries = if countries.is_empty() {
        repo.lead_countries().await?
    } else {
        countries
    };

    let overall_sales_data = reports::daily_sales(today, SALES_DAYS, &wins);
    let total_sales = reports::round_to(overall_sales_data.iter().map(|d| d.sales).sum(), 2);

    Ok(Json(Dashboard {
        overall_sales_data,
        total_sales,
        purchase_source_data: reports::shares(&sources),
        visitor_data: reports::visitor_data(&mut rand::thread_rng(), VISITOR_WEEKS),
        country_data: reports::country_data(countries),
        sales_history_data: history.into_iter().map(Into::into).collect(),
    }))
}

/// Report routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/reports/summary", get(summary))
        .route("/reports/revenue", get(revenue))
        .route("/dashboard", get(dashboard))
}

#[cfg(test)]
mod tests {
    use crate::http::test_support::{app, get};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn reports_surface_database_errors() {
        for uri in ["/api/reports/summary", "/api/reports/revenue", "/api/dashboard"] {
            let (status, json) = get(app(), uri).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{}", uri);
            assert_eq!(json["error"], "Internal Server Error");
        }
    }
}
