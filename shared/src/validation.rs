//! Validation utilities for SimpleStock inputs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use validator::ValidationErrors;

// ============================================================================
// Text
// ============================================================================

/// Required text must contain something other than whitespace
pub fn validate_required_text(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Value cannot be blank");
    }
    Ok(())
}

/// Trim optional free text; blank becomes `None`
pub fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Pick one field error out of a `validator` report, deterministically
/// (alphabetically first field), as `(field, message)`.
pub fn first_validation_error(errors: &ValidationErrors) -> (String, String) {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    fields
        .into_iter()
        .find_map(|(field, errs)| {
            errs.first().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), message)
            })
        })
        .unwrap_or_else(|| ("input".to_string(), "Invalid input".to_string()))
}

// ============================================================================
// Dates
// ============================================================================

/// Which end of a date range a bound belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateBound {
    /// Plain dates resolve to 00:00:00 UTC
    Start,
    /// Plain dates resolve to 23:59:59.999 UTC
    End,
}

/// Parse a date filter bound.
///
/// Accepts an RFC 3339 timestamp (`2024-03-01T10:00:00Z`) or a plain
/// `YYYY-MM-DD` date. Blank input means no bound.
pub fn parse_date_bound(raw: &str, bound: DateBound) -> Result<Option<DateTime<Utc>>, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| "Date must be RFC 3339 or YYYY-MM-DD")?;
    let time = match bound {
        DateBound::Start => NaiveTime::MIN,
        DateBound::End => NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN),
    };
    Ok(Some(date.and_time(time).and_utc()))
}

/// A range is valid when it is open on either side or ordered
pub fn validate_date_range(
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> Result<(), &'static str> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err("'from' must not be after 'to'"),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProductInput;
    use chrono::{Datelike, Timelike};
    use validator::Validate;

    #[test]
    fn test_validate_required_text() {
        assert!(validate_required_text("Caneta").is_ok());
        assert!(validate_required_text("").is_err());
        assert!(validate_required_text("   ").is_err());
    }

    #[test]
    fn test_normalize_optional_text() {
        assert_eq!(normalize_optional_text(Some("  sold ")), Some("sold".to_string()));
        assert_eq!(normalize_optional_text(Some("   ")), None);
        assert_eq!(normalize_optional_text(None), None);
    }

    #[test]
    fn test_first_validation_error_reports_field_and_message() {
        let input = CreateProductInput {
            name: "Pen".into(),
            sku: String::new(),
            description: None,
            min_stock: -1,
            initial_stock: None,
        };
        let errors = input.validate().unwrap_err();
        let (field, message) = first_validation_error(&errors);
        assert!(field.starts_with("min"));
        assert_eq!(message, "Minimum stock cannot be negative");
    }

    #[test]
    fn test_parse_date_bound_rfc3339() {
        let ts = parse_date_bound("2024-03-01T10:30:00-03:00", DateBound::Start)
            .unwrap()
            .unwrap();
        assert_eq!(ts.hour(), 13);
    }

    #[test]
    fn test_parse_date_bound_plain_date() {
        let start = parse_date_bound("2024-03-01", DateBound::Start).unwrap().unwrap();
        assert_eq!((start.day(), start.hour(), start.minute()), (1, 0, 0));

        let end = parse_date_bound("2024-03-01", DateBound::End).unwrap().unwrap();
        assert_eq!((end.day(), end.hour(), end.minute(), end.second()), (1, 23, 59, 59));
    }

    #[test]
    fn test_parse_date_bound_blank_and_invalid() {
        assert_eq!(parse_date_bound("  ", DateBound::End), Ok(None));
        assert!(parse_date_bound("yesterday", DateBound::Start).is_err());
        assert!(parse_date_bound("2024-13-40", DateBound::Start).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let early = parse_date_bound("2024-01-01", DateBound::Start).unwrap();
        let late = parse_date_bound("2024-02-01", DateBound::End).unwrap();
        assert!(validate_date_range(early, late).is_ok());
        assert!(validate_date_range(late, early).is_err());
        assert!(validate_date_range(None, early).is_ok());
    }
}
