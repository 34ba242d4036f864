//! Request payload describing one student's daily session.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Attendance assumed when the caller leaves it out.
pub const DEFAULT_ATTENDANCE: &str = "정상";
/// Attitude assumed when the caller leaves it out.
pub const DEFAULT_ATTITUDE: &str = "우수";
/// Homework status assumed when the caller leaves it out.
pub const DEFAULT_HOMEWORK_STATUS: &str = "정상";

/// Body of `POST /generate`.
///
/// Every field is optional on the wire. The prompt builder applies defaults
/// and rejects a missing `name` or `className`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionInput {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub class_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub teacher_name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub progress: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub homework: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub test_range: Option<String>,
    pub score: Option<NumericField>,
    /// Denominator of `score`. Scores are rescaled to 100 when this is positive.
    pub base: Option<NumericField>,
    /// Score of the follow-up "취약유사" (similar weak-point) test.
    pub weak_score: Option<NumericField>,
    #[serde(deserialize_with = "lenient_text")]
    pub attendance: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub attitude: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub homework_status: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub extra_request: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub notice: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub test_reason: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub date_str: Option<String>,
    #[serde(deserialize_with = "lenient_choice")]
    pub length_mode: Option<LengthMode>,
    #[serde(deserialize_with = "lenient_choice")]
    pub score_format: Option<ScoreFormat>,
    #[serde(deserialize_with = "lenient_flag")]
    pub include_class: Option<bool>,
    #[serde(deserialize_with = "lenient_flag")]
    pub include_teacher: Option<bool>,
}

impl SessionInput {
    pub fn attendance(&self) -> &str {
        non_blank(&self.attendance).unwrap_or(DEFAULT_ATTENDANCE)
    }

    pub fn attitude(&self) -> &str {
        non_blank(&self.attitude).unwrap_or(DEFAULT_ATTITUDE)
    }

    pub fn homework_status(&self) -> &str {
        non_blank(&self.homework_status).unwrap_or(DEFAULT_HOMEWORK_STATUS)
    }

    pub fn length_mode(&self) -> LengthMode {
        self.length_mode.unwrap_or_default()
    }

    pub fn score_format(&self) -> ScoreFormat {
        self.score_format.unwrap_or_default()
    }

    pub fn include_class(&self) -> bool {
        self.include_class.unwrap_or(true)
    }

    pub fn include_teacher(&self) -> bool {
        self.include_teacher.unwrap_or(true)
    }
}

/// Trimmed value of an optional text field, `None` when absent or blank.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Text field that also accepts numbers and booleans (`"className": 3`).
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Lowercase keyword field; blank or unknown values fall back to the default.
fn lenient_choice<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(text)) => {
            serde_json::from_value(Value::String(text.trim().to_ascii_lowercase())).ok()
        }
        _ => None,
    })
}

/// Boolean switch that also accepts `"true"`/`"false"`, `"1"`/`"0"` and `1`/`0`.
fn lenient_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        Some(Value::String(text)) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "y" => Some(true),
            "false" | "0" | "no" | "n" => Some(false),
            _ => None,
        },
        _ => None,
    })
}

/// A number that callers send either as a JSON number or as text.
///
/// Spreadsheet-driven clients post `"85"` or `"85점"` as often as `85`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    /// Whether the caller actually supplied something.
    pub fn is_blank(&self) -> bool {
        match self {
            NumericField::Number(_) => false,
            NumericField::Text(text) => text.trim().is_empty(),
        }
    }

    /// Finite numeric value, if the field parses as one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            NumericField::Number(n) => *n,
            NumericField::Text(text) => {
                let text = text.trim();
                let text = text.strip_suffix('점').unwrap_or(text).trim_end();
                text.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for NumericField {
    fn from(value: f64) -> Self {
        NumericField::Number(value)
    }
}

impl From<&str> for NumericField {
    fn from(value: &str) -> Self {
        NumericField::Text(value.to_string())
    }
}

/// Target length of the "수업리뷰" paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthMode {
    Short,
    #[default]
    Standard,
    Long,
}

impl LengthMode {
    /// Sentence-count instruction handed to the generator.
    pub fn sentence_guide(self) -> &'static str {
        match self {
            LengthMode::Short => "2문장",
            LengthMode::Standard => "3~5문장",
            LengthMode::Long => "5~7문장",
        }
    }
}

/// How the primary test score is written in the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreFormat {
    /// `85점 (100점 만점 기준)`
    #[default]
    Normalized,
    /// `17/20점`
    Raw,
    /// `17/20점 → 85점 (100점 만점 기준)`
    Both,
}
