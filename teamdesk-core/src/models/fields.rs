//! Field-level validation for CRM input

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for names, titles, companies and similar short text
pub const MAX_SHORT_TEXT: usize = 256;

/// Maximum length for free-form content (activity notes, chat prompts)
pub const MAX_LONG_TEXT: usize = 16_384;

/// Maximum length for an email address (RFC 5321 path limit)
const MAX_EMAIL_LEN: usize = 254;

/// One `@`, no whitespace, a dot somewhere in the domain
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email regex"));

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate an email address. Surrounding whitespace is trimmed.
    ///
    /// # Example
    /// ```
    /// use teamdesk_core::models::Email;
    ///
    /// assert!(Email::new("sarah.lee@innovatellc.com").is_ok());
    /// assert!(Email::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if s.len() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must look like name@example.com",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trimmed, non-empty text no longer than `max` characters.
pub fn required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }

    Ok(value.to_owned())
}

/// Like [`required_text`], but blank or missing input becomes `None`.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => required_text(field, v, max).map(Some),
    }
}

/// Money amounts (deal value, product price) must be finite and not negative.
pub fn amount(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "must be a finite number",
        });
    }

    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            field,
            reason: "cannot be negative",
        });
    }

    Ok(value)
}

/// Placeholder avatar seeded by an arbitrary string (usually the email).
pub fn default_avatar(seed: &str) -> String {
    format!("https://i.pravatar.cc/150?u={}", seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_emails() {
        assert!(Email::new("alex@example.com").is_ok());
        assert!(Email::new("jess.wong@nextgen.ai").is_ok());
        assert_eq!(
            Email::new("  john.doe@brighttech.com ").unwrap().as_str(),
            "john.doe@brighttech.com"
        );
    }

    #[test]
    fn rejects_bad_emails() {
        assert!(matches!(
            Email::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
        assert!(matches!(
            Email::new("no-at-sign.com").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Email::new("two@@example.com").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Email::new("space in@example.com").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Email::new("nodot@localhost").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn required_text_trims_and_limits() {
        assert_eq!(required_text("name", "  Sarah ", 10).unwrap(), "Sarah");
        assert!(matches!(
            required_text("name", "   ", 10).unwrap_err(),
            ValidationError::Empty { field: "name" }
        ));
        assert!(matches!(
            required_text("name", &"x".repeat(11), 10).unwrap_err(),
            ValidationError::TooLong { max: 10, .. }
        ));
    }

    #[test]
    fn optional_text_blank_is_none() {
        assert_eq!(optional_text("phone", None, 10).unwrap(), None);
        assert_eq!(optional_text("phone", Some("  "), 10).unwrap(), None);
        assert_eq!(
            optional_text("phone", Some("123"), 10).unwrap(),
            Some("123".to_string())
        );
    }

    #[test]
    fn amounts() {
        assert_eq!(amount("value", 39.92).unwrap(), 39.92);
        assert!(amount("value", 0.0).is_ok());
        assert!(amount("value", -1.0).is_err());
        assert!(amount("value", f64::NAN).is_err());
        assert!(amount("value", f64::INFINITY).is_err());
    }

    #[test]
    fn avatar_url() {
        assert_eq!(
            default_avatar("sam@webwizards.io"),
            "https://i.pravatar.cc/150?u=sam@webwizards.io"
        );
    }
}
