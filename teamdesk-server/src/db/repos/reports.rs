//! Aggregate queries behind the reports and dashboard endpoints
//!
//! Queries return raw aggregates; bucketing and labelling happen in
//! [`crate::reports`] so they can be tested without a database.

use chrono::NaiveDate;
use sqlx::{FromRow, PgPool};
use teamdesk_core::models::{DealStage, LeadStatus};

use super::{Deal, DbError};

/// Counters for the summary report, one round trip
#[derive(Debug, Clone, Copy, Default, FromRow, PartialEq)]
pub struct SummaryCounts {
    pub total_leads: i64,
    pub won_leads: i64,
    pub total_revenue: f64,
    pub avg_deal_size: f64,
    pub deal_count: i64,
}

pub struct ReportRepo<'a> {
    pool: &'a PgPool,
}

impl<'a> ReportRepo<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn summary_counts(&self) -> Result<SummaryCounts, DbError> {
        let counts = sqlx::query_as::<_, SummaryCounts>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM leads) AS total_leads,
                (SELECT COUNT(*) FROM leads WHERE status = $1) AS won_leads,
                (SELECT COALESCE(SUM(value), 0::float8) FROM deals WHERE stage = $2) AS total_revenue,
                (SELECT COALESCE(AVG(value), 0::float8) FROM deals) AS avg_deal_size,
                (SELECT COUNT(*) FROM deals) AS deal_count
            "#,
        )
        .bind(LeadStatus::Won.as_str())
        .bind(DealStage::ClosedWon.as_str())
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }

    /// `(close_date, value)` of won deals closing within `[from, to]`.
    pub async fn wins_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<(NaiveDate, f64)>, DbError> {
        let rows = sqlx::query_as::<_, (NaiveDate, f64)>(
            r#"
            SELECT close_date, value
            FROM deals
            WHERE stage = $1 AND close_date BETWEEN $2 AND $3
            ORDER BY close_date
            "#,
        )
        .bind(DealStage::ClosedWon.as_str())
        .bind(from)
        .bind(to)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Lead count per acquisition source, largest first.
    pub async fn lead_sources(&self) -> Result<Vec<(String, i64)>, DbError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT source, COUNT(*) AS leads
            FROM leads
            GROUP BY source
            ORDER BY leads DESC, source ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Won deal value per lead country.
    ///
    /// `deals.lead_id` is free text, so only ids that match a lead row join;
    /// dangling references are skipped.
    pub async fn country_sales(&self) -> Result<Vec<(String, f64)>, DbError> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT l.country, SUM(d.value) AS sales
            FROM deals d
            JOIN leads l ON d.lead_id = l.id::text
            WHERE d.stage = $1
            GROUP BY l.country
            ORDER BY sales DESC, l.country ASC
            "#,
        )
        .bind(DealStage::ClosedWon.as_str())
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Lead count per country, as a fallback when no won deal joins a lead.
    pub async fn lead_countries(&self) -> Result<Vec<(String, f64)>, DbError> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            r#"
            SELECT country, COUNT(*)::float8 AS leads
            FROM leads
            GROUP BY country
            ORDER BY leads DESC, country ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }

    /// Most recently closed won deals.
    pub async fn recent_wins(&self, limit: i64) -> Result<Vec<Deal>, DbError> {
        let deals = sqlx::query_as::<_, Deal>(
            r#"
            SELECT id, title, value, stage, lead_id, owner_name, owner_avatar,
                   close_date, created_at
            FROM deals
            WHERE stage = $1
            ORDER BY close_date DESC NULLS LAST, id DESC
            LIMIT $2
            "#,
        )
        .bind(DealStage::ClosedWon.as_str())
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(deals)
    }
}
