//! Custom Axum extractors and loosely-typed request fields

use axum::extract::{FromRequest, FromRequestParts, Path};
use axum::http::request::Parts;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use teamdesk_core::ValidationError;

use super::error::ApiError;

/// JSON body whose rejections use the API error format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Extract and validate a numeric row id from the path
pub struct ValidId(pub i64);

impl<S> FromRequestParts<S> for ValidId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        Ok(Self(parse_id("id", &id)?))
    }
}

/// Positive integer id, as ids arrive from the dashboard as strings.
pub fn parse_id(field: &'static str, raw: &str) -> Result<i64, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ValidationError::InvalidFormat {
            field,
            reason: "must be a positive integer",
        })
}

/// Id sent either as a JSON number or a string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    pub fn to_id(&self, field: &'static str) -> Result<i64, ValidationError> {
        match self {
            Self::Number(n) if *n > 0 => Ok(*n),
            Self::Number(_) => Err(ValidationError::InvalidFormat {
                field,
                reason: "must be a positive integer",
            }),
            Self::Text(s) => parse_id(field, s),
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s.trim().to_string(),
        }
    }
}

/// Calendar date as `YYYY-MM-DD`; a full RFC 3339 timestamp keeps its date.
pub fn parse_date(field: &'static str, raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ValidationError::InvalidFormat {
            field,
            reason: "expected a YYYY-MM-DD date",
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids() {
        assert_eq!(parse_id("id", " 42 ").unwrap(), 42);
        assert_eq!(
            parse_id("id", "").unwrap_err(),
            ValidationError::Empty { field: "id" }
        );
        assert!(parse_id("id", "lead-1").is_err());
        assert!(parse_id("id", "0").is_err());
        assert!(parse_id("id", "-3").is_err());
    }

    #[test]
    fn loose_ids() {
        let number: LooseId = serde_json::from_str("7").unwrap();
        let text: LooseId = serde_json::from_str("\"7\"").unwrap();
        assert_eq!(number.to_id("leadId").unwrap(), 7);
        assert_eq!(text.to_id("leadId").unwrap(), 7);
        assert_eq!(number.into_text(), "7");

        let dangling: LooseId = serde_json::from_str("\"lead-x\"").unwrap();
        assert!(dangling.to_id("leadId").is_err());
        assert_eq!(dangling.into_text(), "lead-x");
    }

    #[test]
    fn dates() {
        let expected = NaiveDate::from_ymd_opt(2023, 11, 30).unwrap();
        assert_eq!(parse_date("closeDate", "2023-11-30").unwrap(), expected);
        assert_eq!(
            parse_date("closeDate", "2023-11-30T10:15:00.000Z").unwrap(),
            expected
        );
        assert!(parse_date("closeDate", "30/11/2023").is_err());
    }
}
