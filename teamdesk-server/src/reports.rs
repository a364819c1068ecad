//! Report shaping: bucketing, percentages, labels
//!
//! Pure functions over the aggregates from [`crate::db::ReportRepo`].
//! Response field names follow the dashboard's camelCase contract.

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;

use crate::db::{Deal, Person, SummaryCounts};

/// Months shown on the revenue chart
pub const REVENUE_MONTHS: u32 = 6;

/// Days shown on the dashboard sales chart
pub const SALES_DAYS: u32 = 7;

/// Weeks of visitor data on the dashboard
pub const VISITOR_WEEKS: u32 = 12;

/// Won deals listed under sales history
pub const SALES_HISTORY_LIMIT: i64 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_leads: i64,
    /// Percentage of leads marked Won, one decimal
    pub conversion_rate: f64,
    pub total_revenue: f64,
    pub avg_deal_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRevenue {
    pub name: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySales {
    pub name: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedShare {
    pub name: String,
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyVisitors {
    pub name: String,
    pub visitors: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountrySales {
    pub name: String,
    pub sales: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRecord {
    pub id: i64,
    pub value: f64,
    pub owner: Person,
}

impl From<Deal> for SaleRecord {
    fn from(deal: Deal) -> Self {
        Self {
            id: deal.id,
            value: deal.value,
            owner: deal.owner(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub overall_sales_data: Vec<DailySales>,
    pub total_sales: f64,
    pub purchase_source_data: Vec<NamedShare>,
    pub visitor_data: Vec<WeeklyVisitors>,
    pub country_data: Vec<CountrySales>,
    pub sales_history_data: Vec<SaleRecord>,
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn summarize(counts: SummaryCounts) -> ReportSummary {
    let conversion_rate = if counts.total_leads == 0 {
        0.0
    } else {
        round_to(
            counts.won_leads as f64 * 100.0 / counts.total_leads as f64,
            1,
        )
    };

    ReportSummary {
        total_leads: counts.total_leads,
        conversion_rate,
        total_revenue: round_to(counts.total_revenue, 2),
        avg_deal_size: if counts.deal_count == 0 {
            0.0
        } else {
            round_to(counts.avg_deal_size, 2)
        },
    }
}

/// First day of the month `back` months before `date`'s month.
pub fn month_start(date: NaiveDate, back: u32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 - back as i32;
    let (year, month0) = (index.div_euclid(12), index.rem_euclid(12) as u32);
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(date)
}

/// Revenue per calendar month, oldest first, ending with `today`'s month.
pub fn monthly_revenue(
    today: NaiveDate,
    months: u32,
    wins: &[(NaiveDate, f64)],
) -> Vec<MonthlyRevenue> {
    (0..months)
        .rev()
        .map(|back| {
            let start = month_start(today, back);
            let revenue = wins
                .iter()
                .filter(|(date, _)| date.year() == start.year() && date.month() == start.month())
                .map(|(_, value)| value)
                .sum::<f64>();

            MonthlyRevenue {
                name: start.format("%b").to_string(),
                revenue: round_to(revenue, 2),
            }
        })
        .collect()
}

/// Sales per day, oldest first, ending with `today`. Labels like `DEC 2`.
pub fn daily_sales(today: NaiveDate, days: u32, wins: &[(NaiveDate, f64)]) -> Vec<DailySales> {
    (0..days as i64)
        .rev()
        .map(|back| {
            let day = today - Duration::days(back);
            let sales = wins
                .iter()
                .filter(|(date, _)| *date == day)
                .map(|(_, value)| value)
                .sum::<f64>();

            DailySales {
                name: day.format("%b %-d").to_string().to_uppercase(),
                sales: round_to(sales, 2),
            }
        })
        .collect()
}

/// Whole-number percentage per name, in input order.
pub fn shares(counts: &[(String, i64)]) -> Vec<NamedShare> {
    let total: i64 = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }

    counts
        .iter()
        .map(|(name, n)| NamedShare {
            name: name.clone(),
            value: (*n as f64 * 100.0 / total as f64).round() as i64,
        })
        .collect()
}

/// Synthetic weekly visitor counts in `[20_000, 70_000)`.
///
/// No visitor tracking exists, so these are random like the original
/// dashboard placeholder.
pub fn visitor_data<R: Rng + ?Sized>(rng: &mut R, weeks: u32) -> Vec<WeeklyVisitors> {
    (1..=weeks)
        .map(|week| WeeklyVisitors {
            name: format!("W{}", week),
            visitors: rng.gen_range(20_000..70_000),
        })
        .collect()
}

/// Country rows sorted by sales, largest first.
pub fn country_data(rows: Vec<(String, f64)>) -> Vec<CountrySales> {
    let mut data: Vec<CountrySales> = rows
        .into_iter()
        .map(|(name, sales)| CountrySales {
            name,
            sales: round_to(sales, 2),
        })
        .collect();
    data.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn summary_percentages() {
        let summary = summarize(SummaryCounts {
            total_leads: 6,
            won_leads: 1,
            total_revenue: 35329.891,
            avg_deal_size: 12833.789,
            deal_count: 10,
        });

        assert_eq!(summary.total_leads, 6);
        assert_eq!(summary.conversion_rate, 16.7);
        assert_eq!(summary.total_revenue, 35329.89);
        assert_eq!(summary.avg_deal_size, 12833.79);
    }

    #[test]
    fn summary_empty_tables() {
        let summary = summarize(SummaryCounts::default());
        assert_eq!(summary.conversion_rate, 0.0);
        assert_eq!(summary.avg_deal_size, 0.0);
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(summarize(SummaryCounts::default())).unwrap();
        assert!(json.get("totalLeads").is_some());
        assert!(json.get("conversionRate").is_some());
        assert!(json.get("totalRevenue").is_some());
        assert!(json.get("avgDealSize").is_some());
    }

    #[test]
    fn month_start_crosses_years() {
        assert_eq!(month_start(date(2024, 3, 15), 0), date(2024, 3, 1));
        assert_eq!(month_start(date(2024, 3, 15), 2), date(2024, 1, 1));
        assert_eq!(month_start(date(2024, 3, 15), 3), date(2023, 12, 1));
        assert_eq!(month_start(date(2024, 1, 31), 13), date(2022, 12, 1));
    }

    #[test]
    fn monthly_buckets() {
        let wins = vec![
            (date(2024, 1, 5), 100.0),
            (date(2024, 1, 20), 50.5),
            (date(2024, 3, 1), 10.0),
            (date(2023, 9, 30), 999.0), // outside window
        ];

        let months = monthly_revenue(date(2024, 3, 10), 6, &wins);
        let names: Vec<_> = months.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Oct", "Nov", "Dec", "Jan", "Feb", "Mar"]);
        assert_eq!(months[3].revenue, 150.5);
        assert_eq!(months[4].revenue, 0.0);
        assert_eq!(months[5].revenue, 10.0);
        assert_eq!(months[0].revenue, 0.0);
    }

    #[test]
    fn daily_buckets_and_labels() {
        let wins = vec![(date(2023, 12, 8), 30.0), (date(2023, 12, 8), 49.99)];
        let days = daily_sales(date(2023, 12, 8), 7, &wins);

        assert_eq!(days.len(), 7);
        assert_eq!(days[0].name, "DEC 2");
        assert_eq!(days[6].name, "DEC 8");
        assert_eq!(days[6].sales, 79.99);
        assert_eq!(days[0].sales, 0.0);
    }

    #[test]
    fn share_percentages() {
        let counts = vec![
            ("Social Media".to_string(), 2),
            ("Direct Search".to_string(), 2),
            ("Referral".to_string(), 1),
            ("Others".to_string(), 1),
        ];
        let shares = shares(&counts);
        assert_eq!(shares[0].value, 33);
        assert_eq!(shares[2].value, 17);
        assert_eq!(shares[3].name, "Others");
        assert!(super::shares(&[]).is_empty());
    }

    #[test]
    fn visitors_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let data = visitor_data(&mut rng, 12);
        assert_eq!(data.len(), 12);
        assert_eq!(data[0].name, "W1");
        assert_eq!(data[11].name, "W12");
        assert!(data
            .iter()
            .all(|w| (20_000..70_000).contains(&w.visitors)));
    }

    #[test]
    fn countries_sorted_descending() {
        let data = country_data(vec![
            ("India".into(), 1200.0),
            ("United States".into(), 1790.0),
            ("China".into(), 490.0),
        ]);
        let names: Vec<_> = data.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["United States", "India", "China"]);
    }

    #[test]
    fn dashboard_serializes_camel_case() {
        let dashboard = Dashboard {
            overall_sales_data: vec![],
            total_sales: 0.0,
            purchase_source_data: vec![],
            visitor_data: vec![],
            country_data: vec![],
            sales_history_data: vec![],
        };
        let json = serde_json::to_value(dashboard).unwrap();
        for key in [
            "overallSalesData",
            "totalSales",
            "purchaseSourceData",
            "visitorData",
            "countryData",
            "salesHistoryData",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
    }
}
