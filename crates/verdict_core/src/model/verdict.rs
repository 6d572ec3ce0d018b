//! Verdict domain model.
//!
//! # Responsibility
//! - Define the verdict record shape stored in the verdicts collection.
//! - Own the "every textual field is required" check used on create.
//!
//! # Invariants
//! - `id` is assigned by the store on creation and never reused.
//! - Textual fields absent from a stored document read back as empty strings;
//!   numbers and booleans read back as their text form.
//! - `date` is Unix epoch milliseconds and only feeds analytics. Stored
//!   RFC 3339 or `YYYY-MM-DD` strings are accepted; anything else reads as
//!   undated.
//! - Decoding one stored body never fails on field types.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Opaque store-assigned identifier of one verdict document.
pub type RecordId = String;

/// Field names as they appear in stored documents, in form order.
pub const VERDICT_FIELD_NAMES: [&str; 7] = [
    "caseNumber",
    "courtName",
    "judgeName",
    "plaintiff",
    "defendant",
    "statedFacts",
    "verdict",
];

/// Rejected verdict input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Named field is empty or whitespace-only.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(name) => write!(f, "field `{name}` must not be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Body of a verdict document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VerdictFields {
    #[serde(deserialize_with = "lenient_text")]
    pub case_number: String,
    #[serde(deserialize_with = "lenient_text")]
    pub court_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub judge_name: String,
    #[serde(deserialize_with = "lenient_text")]
    pub plaintiff: String,
    #[serde(deserialize_with = "lenient_text")]
    pub defendant: String,
    #[serde(deserialize_with = "lenient_text")]
    pub stated_facts: String,
    #[serde(deserialize_with = "lenient_text")]
    pub verdict: String,
    /// Decision timestamp in epoch milliseconds, if known.
    #[serde(
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<i64>,
}

impl VerdictFields {
    /// Returns `(document field name, value)` pairs for the seven text fields.
    pub fn text_fields(&self) -> [(&'static str, &str); 7] {
        [
            (VERDICT_FIELD_NAMES[0], self.case_number.as_str()),
            (VERDICT_FIELD_NAMES[1], self.court_name.as_str()),
            (VERDICT_FIELD_NAMES[2], self.judge_name.as_str()),
            (VERDICT_FIELD_NAMES[3], self.plaintiff.as_str()),
            (VERDICT_FIELD_NAMES[4], self.defendant.as_str()),
            (VERDICT_FIELD_NAMES[5], self.stated_facts.as_str()),
            (VERDICT_FIELD_NAMES[6], self.verdict.as_str()),
        ]
    }

    /// Checks that every text field is non-empty after trimming.
    ///
    /// Reports the first offending field in form order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self
            .text_fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((name, _)) => Err(ValidationError::EmptyField(name)),
            None => Ok(()),
        }
    }
}

/// Partial edit input. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictPatch {
    pub case_number: Option<String>,
    pub court_name: Option<String>,
    pub judge_name: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub stated_facts: Option<String>,
    pub verdict: Option<String>,
    pub date: Option<i64>,
}

impl VerdictPatch {
    /// Returns a copy of `current` with every supplied field replaced.
    pub fn merged_over(&self, current: &VerdictFields) -> VerdictFields {
        fn pick(patch: &Option<String>, current: &str) -> String {
            patch.clone().unwrap_or_else(|| current.to_string())
        }

        VerdictFields {
            case_number: pick(&self.case_number, &current.case_number),
            court_name: pick(&self.court_name, &current.court_name),
            judge_name: pick(&self.judge_name, &current.judge_name),
            plaintiff: pick(&self.plaintiff, &current.plaintiff),
            defendant: pick(&self.defendant, &current.defendant),
            stated_facts: pick(&self.stated_facts, &current.stated_facts),
            verdict: pick(&self.verdict, &current.verdict),
            date: self.date.or(current.date),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Persisted verdict: store id plus document body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: VerdictFields,
}

/// Parses a stored date string into epoch milliseconds.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date_text(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
        return Some(instant.timestamp_millis());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp_millis())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|ms| ms.is_finite()).map(|ms| ms as i64)),
        Value::String(text) => parse_date_text(&text),
        _ => None,
    })
}
