use thiserror::Error;

use crate::models::candidate::CandidateRecord;
use crate::screening::parse::{MAX_SCORE, MIN_SCORE};

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("required field '{0}' is empty")]
    EmptyField(&'static str),

    #[error("score {0} is outside the 0-10 range")]
    ScoreOutOfRange(f64),
}

/// Checks that a record carries the minimum a reviewer needs: a name, a
/// summary and a score within range. The pipeline only logs failures.
pub fn validate_record(record: &CandidateRecord) -> Result<(), ValidationError> {
    if record.name.trim().is_empty() {
        return Err(ValidationError::EmptyField("name"));
    }
    if record.summary.trim().is_empty() {
        return Err(ValidationError::EmptyField("summary"));
    }
    if !record.score.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&record.score) {
        return Err(ValidationError::ScoreOutOfRange(record.score));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, summary: &str, score: f64) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            summary: summary.to_string(),
            score,
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_passes() {
        assert_eq!(validate_record(&record("Ana", "Backend developer", 7.0)), Ok(()));
    }

    #[test]
    fn test_zero_score_is_valid() {
        assert_eq!(validate_record(&record("Ana", "Backend developer", 0.0)), Ok(()));
    }

    #[test]
    fn test_blank_summary_fails() {
        assert_eq!(
            validate_record(&record("Ana", "  ", 7.0)),
            Err(ValidationError::EmptyField("summary"))
        );
    }

    #[test]
    fn test_blank_name_fails_first() {
        assert_eq!(
            validate_record(&record("", "", 7.0)),
            Err(ValidationError::EmptyField("name"))
        );
    }

    #[test]
    fn test_out_of_range_score_fails() {
        assert_eq!(
            validate_record(&record("Ana", "Dev", 11.0)),
            Err(ValidationError::ScoreOutOfRange(11.0))
        );
        assert!(validate_record(&record("Ana", "Dev", f64::NAN)).is_err());
    }
}
