use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name given to the placeholder record produced when a model response
/// cannot be interpreted at all.
pub const ANALYSIS_ERROR_NAME: &str = "Analysis error";
pub const ANALYSIS_ERROR_SUMMARY: &str = "There was an error analyzing this résumé";

/// Substituted when the model returns a blank or missing `name`.
pub const UNIDENTIFIED_NAME: &str = "Unidentified candidate";

/// How a required field is back-filled and repaired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
    Score,
}

impl FieldKind {
    pub fn default_value(self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::List => Value::Array(Vec::new()),
            FieldKind::Score => Value::from(0.0),
        }
    }
}

/// Every key the screening schema asks the model for, in display order.
pub const REQUIRED_FIELDS: &[(&str, FieldKind)] = &[
    ("name", FieldKind::Text),
    ("area", FieldKind::Text),
    ("summary", FieldKind::Text),
    ("skills", FieldKind::List),
    ("education", FieldKind::Text),
    ("interview_questions", FieldKind::List),
    ("strengths", FieldKind::List),
    ("areas_for_development", FieldKind::List),
    ("important_considerations", FieldKind::List),
    ("final_recommendations", FieldKind::Text),
    ("score", FieldKind::Score),
];

/// One screened candidate as stored in the candidates file.
///
/// Keys the model returns beyond the schema are kept in `extra` so a
/// record survives a load/save cycle unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateRecord {
    pub name: String,
    pub area: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub education: String,
    pub interview_questions: Vec<String>,
    pub strengths: Vec<String>,
    pub areas_for_development: Vec<String>,
    pub important_considerations: Vec<String>,
    pub final_recommendations: String,
    pub score: f64,
    /// Local wall-clock time stamped when the record is persisted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analyzed_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CandidateRecord {
    /// The record returned when a model response holds no usable JSON object.
    pub fn analysis_error() -> Self {
        Self {
            name: ANALYSIS_ERROR_NAME.to_string(),
            summary: ANALYSIS_ERROR_SUMMARY.to_string(),
            ..Self::default()
        }
    }

    /// Case-insensitive, whitespace-trimmed identity used for duplicate detection.
    pub fn identity_key(&self) -> String {
        self.name.trim().to_lowercase()
    }

    pub fn is_analysis_error(&self) -> bool {
        self.name == ANALYSIS_ERROR_NAME && self.summary == ANALYSIS_ERROR_SUMMARY
    }
}
