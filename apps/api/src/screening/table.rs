//! Tabular view over stored candidates: filtering, metrics and exports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::candidate::{CandidateRecord, REQUIRED_FIELDS};

/// Score at or above which a candidate counts as recommended in the metrics.
pub const RECOMMENDED_SCORE: f64 = 7.0;

/// Area label for candidates whose area is blank, in metrics and filters alike.
pub const UNCLASSIFIED_AREA: &str = "Unclassified";

/// Separator used when a list cell is flattened into one CSV field.
const LIST_SEPARATOR: &str = "; ";

/// Query-string filter shared by the list and export endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandidateFilter {
    pub min_score: Option<f64>,
    pub area: Option<String>,
}

impl CandidateFilter {
    pub fn is_empty(&self) -> bool {
        self.min_score.is_none() && self.area_filter().is_none()
    }

    fn area_filter(&self) -> Option<&str> {
        self.area.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    pub fn matches(&self, record: &CandidateRecord) -> bool {
        let score_ok = self.min_score.map_or(true, |min| record.score >= min);
        let area_ok = self
            .area_filter()
            .map_or(true, |area| area_label(record).eq_ignore_ascii_case(area));
        score_ok && area_ok
    }

    pub fn apply(&self, records: Vec<CandidateRecord>) -> Vec<CandidateRecord> {
        records.into_iter().filter(|r| self.matches(r)).collect()
    }
}

fn area_label(record: &CandidateRecord) -> &str {
    match record.area.trim() {
        "" => UNCLASSIFIED_AREA,
        area => area,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Column order of the table: schema fields, then the analysis timestamp.
pub fn table_columns() -> Vec<&'static str> {
    REQUIRED_FIELDS
        .iter()
        .map(|(field, _)| *field)
        .chain(std::iter::once("analyzed_at"))
        .collect()
}

fn row(record: &CandidateRecord) -> Vec<String> {
    vec![
        record.name.clone(),
        record.area.clone(),
        record.summary.clone(),
        record.skills.join(LIST_SEPARATOR),
        record.education.clone(),
        record.interview_questions.join(LIST_SEPARATOR),
        record.strengths.join(LIST_SEPARATOR),
        record.areas_for_development.join(LIST_SEPARATOR),
        record.important_considerations.join(LIST_SEPARATOR),
        record.final_recommendations.clone(),
        record.score.to_string(),
        record.analyzed_at.clone().unwrap_or_default(),
    ]
}

pub fn to_csv(records: &[CandidateRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table_columns())?;
    for record in records {
        writer.write_record(row(record))?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

pub fn to_json(records: &[CandidateRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(records)
}

/// Summary metrics over a set of candidates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateStats {
    pub total: usize,
    pub average_score: Option<f64>,
    pub max_score: Option<f64>,
    pub recommended: usize,
    pub by_area: BTreeMap<String, usize>,
}

pub fn compute_stats(records: &[CandidateRecord]) -> CandidateStats {
    let total = records.len();
    let average_score =
        (total > 0).then(|| records.iter().map(|r| r.score).sum::<f64>() / total as f64);
    let max_score = records.iter().map(|r| r.score).reduce(f64::max);
    let recommended = records
        .iter()
        .filter(|r| r.score >= RECOMMENDED_SCORE)
        .count();

    let mut by_area = BTreeMap::new();
    for record in records {
        *by_area.entry(area_label(record).to_string()).or_insert(0) += 1;
    }

    CandidateStats {
        total,
        average_score,
        max_score,
        recommended,
        by_area,
    }
}
