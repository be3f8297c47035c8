//! Read-only records returned by the portal API

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Shareholder identity and holding facts
///
/// Fetched once when the wizard opens and never mutated afterwards.
/// The backend is loose about numeric columns, so every field accepts
/// either a JSON string or a JSON number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shareholder {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reg_account_number: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub holdings: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rights_issue: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub holdings_after: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub amount_due: String,
}

/// Stockbroker reference data for the broker picker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stockbroker {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Confirmation record echoed back by the server after submission
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmittedForm {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub reg_account_number: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub chn: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl SubmittedForm {
    /// Submission date for display, in the local timezone
    pub fn submitted_on(&self) -> String {
        self.created_at
            .map(|ts| {
                ts.with_timezone(&chrono::Local)
                    .format("%d %b %Y")
                    .to_string()
            })
            .unwrap_or_else(|| "-".to_string())
    }
}

/// A downloadable issue document listed on the search screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub title: String,
    pub url: String,
}

impl ResourceLink {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// Accept `"42"`, `42`, `4.5` or `null` and normalise to a string
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Offset-less shapes seen from the server, read as UTC
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
];

/// RFC 3339 or a naive timestamp; anything unreadable becomes `None`
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let Some(serde_json::Value::String(raw)) = value else {
        return Ok(None);
    };
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    let parsed = NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc());
    if parsed.is_none() {
        tracing::warn!(created_at = %raw, "unreadable submission timestamp");
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_shareholder_accepts_numeric_columns() {
        let json = r#"{
            "id": 42,
            "reg_account_number": "RA-0042",
            "name": "John Doe",
            "holdings": 15000,
            "rights_issue": 5000,
            "holdings_after": 20000,
            "amount_due": "35000.00"
        }"#;
        let shareholder: Shareholder = serde_json::from_str(json).unwrap();

        assert_eq!(
            shareholder,
            Shareholder {
                id: "42".to_string(),
                reg_account_number: "RA-0042".to_string(),
                name: "John Doe".to_string(),
                holdings: "15000".to_string(),
                rights_issue: "5000".to_string(),
                holdings_after: "20000".to_string(),
                amount_due: "35000.00".to_string(),
            }
        );
    }

    #[test]
    fn test_shareholder_missing_fields_default_empty() {
        let shareholder: Shareholder = serde_json::from_str(r#"{"id": "7"}"#).unwrap();
        assert_eq!(shareholder.id, "7");
        assert!(shareholder.name.is_empty());
        assert!(shareholder.amount_due.is_empty());
    }

    #[test]
    fn test_null_amount_becomes_empty() {
        let shareholder: Shareholder =
            serde_json::from_str(r#"{"id": 1, "amount_due": null}"#).unwrap();
        assert!(shareholder.amount_due.is_empty());
    }

    #[test]
    fn test_stockbroker_numeric_id() {
        let broker: Stockbroker =
            serde_json::from_str(r#"{"id": 3, "name": "Apel Securities"}"#).unwrap();
        assert_eq!(broker.id, "3");
        assert_eq!(broker.name, "Apel Securities");
    }

    #[test]
    fn test_submitted_form_ignores_unknown_fields() {
        let json = r#"{
            "id": 9,
            "reg_account_number": "RA-1",
            "name": "Jane",
            "chn": "C123",
            "status": "pending",
            "created_at": "2025-11-20T10:00:00Z"
        }"#;
        let form: SubmittedForm = serde_json::from_str(json).unwrap();
        assert_eq!(form.chn, "C123");
        assert!(form.created_at.is_some());
        assert_ne!(form.submitted_on(), "-");
    }

    #[test]
    fn test_submitted_form_accepts_naive_timestamps() {
        for created_at in ["2026-10-01 09:30:00", "2026-10-01T09:30:00.000"] {
            let json = format!(r#"{{"id": 9, "chn": "C123", "created_at": "{created_at}"}}"#);
            let form: SubmittedForm = serde_json::from_str(&json).unwrap();
            let ts = form.created_at.expect("naive timestamp kept");
            assert_eq!(ts.to_rfc3339(), "2026-10-01T09:30:00+00:00");
        }
    }

    #[test]
    fn test_submitted_form_survives_unreadable_timestamp() {
        for created_at in [r#""yesterday""#, "1764000000", "null"] {
            let json = format!(r#"{{"id": 9, "chn": "C123", "created_at": {created_at}}}"#);
            let form: SubmittedForm = serde_json::from_str(&json).unwrap();
            assert_eq!(form.chn, "C123");
            assert!(form.created_at.is_none());
            assert_eq!(form.submitted_on(), "-");
        }
    }

    #[test]
    fn test_submitted_on_without_timestamp() {
        let form = SubmittedForm::default();
        assert_eq!(form.submitted_on(), "-");
    }
}
