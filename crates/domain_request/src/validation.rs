//! Webhook input normalization
//!
//! The messaging webhook delivers loosely-typed JSON: phone numbers with
//! punctuation, consent as booleans or strings, timestamps as ISO strings
//! or epoch numbers in either seconds or milliseconds. Everything here
//! normalizes that input before it reaches the lifecycle service.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::RequestError;

/// Minimum rejection reason length, enforced before any store access.
pub const MIN_REJECTION_REASON_LEN: usize = 10;
/// Maximum rejection reason length.
pub const MAX_REJECTION_REASON_LEN: usize = 500;

/// Numeric timestamps at or above this are epoch milliseconds.
const EPOCH_MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

/// Normalizes a submitter phone number to its digits.
///
/// Strips every non-digit character and requires 10 to 15 digits, which
/// covers national numbers with or without a country prefix.
pub fn normalize_phone(raw: &str) -> Result<String, RequestError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 || digits.len() > 15 {
        return Err(RequestError::validation(format!(
            "phone number must contain 10-15 digits, got {}",
            digits.len()
        )));
    }
    Ok(digits)
}

/// Interprets a webhook consent value.
///
/// Grants: `true`, `1`, and the strings `true`/`yes`/`1` in any case.
/// Everything else, including an absent value, counts as withheld.
pub fn parse_consent(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(granted)) => *granted,
        Some(Value::Number(n)) => n.as_i64() == Some(1),
        Some(Value::String(s)) => {
            matches!(s.trim().to_ascii_lowercase().as_str(), "true" | "yes" | "1")
        }
        _ => false,
    }
}

/// Parses a webhook submission timestamp.
///
/// Accepts an ISO-8601 string or a Unix epoch number in seconds or
/// milliseconds (values at or above 10^12 are milliseconds). An absent
/// timestamp falls back to `received_at` - the field is informational and
/// some webhook sources omit it.
pub fn parse_submitted_at(
    value: Option<&Value>,
    received_at: DateTime<Utc>,
) -> Result<DateTime<Utc>, RequestError> {
    match value {
        None | Some(Value::Null) => Ok(received_at),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| RequestError::validation(format!("invalid timestamp '{s}': {e}"))),
        Some(Value::Number(n)) => {
            let epoch = n
                .as_i64()
                .ok_or_else(|| RequestError::validation("timestamp out of range"))?;
            let parsed = if epoch >= EPOCH_MILLIS_THRESHOLD {
                DateTime::from_timestamp_millis(epoch)
            } else {
                DateTime::from_timestamp(epoch, 0)
            };
            parsed.ok_or_else(|| RequestError::validation("timestamp out of range"))
        }
        Some(other) => Err(RequestError::validation(format!(
            "timestamp must be an ISO-8601 string or epoch number, got {other}"
        ))),
    }
}

/// Validates a rejection reason before the store is touched.
pub fn validate_rejection_reason(reason: &str) -> Result<String, RequestError> {
    let trimmed = reason.trim();
    let len = trimmed.chars().count();
    if len < MIN_REJECTION_REASON_LEN {
        return Err(RequestError::validation(format!(
            "rejection reason must be at least {MIN_REJECTION_REASON_LEN} characters"
        )));
    }
    if len > MAX_REJECTION_REASON_LEN {
        return Err(RequestError::validation(format!(
            "rejection reason must be at most {MAX_REJECTION_REASON_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_punctuated_phone_numbers() {
        assert_eq!(normalize_phone("+91 98765-43210").unwrap(), "919876543210");
        assert_eq!(normalize_phone("9876543210").unwrap(), "9876543210");
    }

    #[test]
    fn rejects_short_and_long_phone_numbers() {
        assert!(normalize_phone("12345").is_err());
        assert!(normalize_phone("1234567890123456").is_err());
        assert!(normalize_phone("no digits here").is_err());
    }

    #[test]
    fn consent_truthy_values_grant() {
        for value in [json!(true), json!("TRUE"), json!("yes"), json!("1"), json!(1)] {
            assert!(parse_consent(Some(&value)), "expected grant for {value}");
        }
    }

    #[test]
    fn consent_falsy_values_withhold() {
        for value in [
            json!(false),
            json!("no"),
            json!("0"),
            json!(0),
            json!("maybe"),
            json!(null),
        ] {
            assert!(!parse_consent(Some(&value)), "expected withhold for {value}");
        }
        assert!(!parse_consent(None));
    }

    #[test]
    fn parses_iso_timestamps() {
        let value = json!("2024-07-01T10:30:00Z");
        let parsed = parse_submitted_at(Some(&value), Utc::now()).unwrap();
        assert_eq!(parsed.timestamp(), 1_719_829_800);
    }

    #[test]
    fn parses_epoch_seconds_and_millis() {
        let now = Utc::now();

        let seconds = json!(1_719_829_800);
        let from_secs = parse_submitted_at(Some(&seconds), now).unwrap();
        assert_eq!(from_secs.timestamp(), 1_719_829_800);

        let millis = json!(1_719_829_800_000i64);
        let from_millis = parse_submitted_at(Some(&millis), now).unwrap();
        assert_eq!(from_millis, from_secs);
    }

    #[test]
    fn missing_timestamp_falls_back_to_received_time() {
        let received = Utc::now();
        assert_eq!(parse_submitted_at(None, received).unwrap(), received);
    }

    #[test]
    fn garbage_timestamps_are_validation_errors() {
        assert!(parse_submitted_at(Some(&json!("yesterday")), Utc::now()).is_err());
        assert!(parse_submitted_at(Some(&json!([1, 2])), Utc::now()).is_err());
    }

    #[test]
    fn reason_length_bounds_are_enforced() {
        assert!(validate_rejection_reason("too short").is_err());
        assert!(validate_rejection_reason("   padded   ").is_err());
        assert_eq!(
            validate_rejection_reason("  consignment details could not be verified  ").unwrap(),
            "consignment details could not be verified"
        );
        assert!(validate_rejection_reason(&"x".repeat(501)).is_err());
        assert!(validate_rejection_reason(&"x".repeat(500)).is_ok());
    }
}
