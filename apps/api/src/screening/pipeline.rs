//! Screening pipeline: orchestrates one résumé from upload to stored record.
//!
//! Flow: write upload to a temp file → extract text → truncate → build prompt
//! with the latest job posting → model call → strip reasoning → tolerant
//! parse → validate (log only) → persist with duplicate check.

use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{truncate_content, DocumentExtractor};
use crate::jobs::format_job_details;
use crate::llm_client::{format_response, ChatModel};
use crate::models::candidate::CandidateRecord;
use crate::screening::parse::parse_llm_response;
use crate::screening::prompts::{build_screening_prompt, CANDIDATE_SCHEMA, SCORE_RUBRIC};
use crate::screening::report::render_markdown;
use crate::screening::upload::UploadedResume;
use crate::screening::validation::validate_record;
use crate::state::AppState;
use crate::storage::SaveOutcome;

/// Model output for one résumé.
#[derive(Debug, Clone)]
pub struct ScreeningOutput {
    /// The answer exactly as the model returned it.
    pub raw_response: String,
    /// The answer with the reasoning section removed, ready for parsing.
    pub response: String,
}

/// Everything the caller learns about one screened upload.
#[derive(Debug, Serialize)]
pub struct ScreeningResult {
    pub screening_id: Uuid,
    pub filename: String,
    pub record: CandidateRecord,
    pub outcome: SaveOutcome,
    pub report_markdown: String,
    /// Model answer with the reasoning section kept in readable form.
    pub model_output: String,
    pub warnings: Vec<String>,
}

/// Extracts the document at `path`, asks the model to analyze it against
/// `job_details` and returns the cleaned answer.
pub async fn process_cv(
    path: &Path,
    job_details: &str,
    extractor: &dyn DocumentExtractor,
    llm: &dyn ChatModel,
    max_content_chars: usize,
) -> Result<ScreeningOutput, AppError> {
    let content = extractor.extract(path).await?;
    let content = truncate_content(&content, max_content_chars);

    let prompt = build_screening_prompt(CANDIDATE_SCHEMA, SCORE_RUBRIC, &content, job_details);
    let raw_response = llm.complete(&prompt).await.map_err(|e| {
        if let Some(hint) = e.hint() {
            warn!("{hint}");
        }
        AppError::Llm(e)
    })?;

    let response = format_response(&raw_response, false);
    Ok(ScreeningOutput {
        raw_response,
        response,
    })
}

/// Runs the full pipeline on an uploaded résumé and persists the result.
///
/// The temporary copy of the upload is removed whether or not analysis succeeds.
pub async fn screen_upload(
    state: &AppState,
    upload: UploadedResume,
) -> Result<ScreeningResult, AppError> {
    let screening_id = Uuid::new_v4();
    info!(%screening_id, filename = %upload.filename, "Analyzing résumé");

    let job = state
        .jobs
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("No job posting registered".to_string()))?;
    let job_details = format_job_details(&job);

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", upload_dir.display()))?;
    let temp = tempfile::Builder::new()
        .prefix("cv-")
        .suffix(".pdf")
        .tempfile_in(upload_dir)
        .context("creating temporary upload file")?;
    tokio::fs::write(temp.path(), &upload.data)
        .await
        .context("writing temporary upload file")?;

    let output = process_cv(
        temp.path(),
        &job_details,
        state.extractor.as_ref(),
        state.llm.as_ref(),
        state.config.max_content_chars,
    )
    .await;
    drop(temp);
    let output = output?;

    let mut warnings = Vec::new();
    let mut record = parse_llm_response(&output.response);
    if record.is_analysis_error() {
        warnings.push("The model returned a malformed answer; a placeholder record was used".to_string());
    }
    if let Err(e) = validate_record(&record) {
        warn!(%screening_id, "Incomplete analysis: {e}");
        warnings.push(format!("Incomplete analysis: {e}"));
    }

    let outcome = state.store.save(&mut record).await?;
    match &outcome {
        SaveOutcome::Saved => info!(%screening_id, name = %record.name, score = record.score, "Résumé analyzed"),
        SaveOutcome::Duplicate { existing_name } => {
            warnings.push(format!("Résumé of '{existing_name}' was already registered"))
        }
        SaveOutcome::Invalid { reason } => warnings.push(format!("Not saved: {reason}")),
    }

    Ok(ScreeningResult {
        screening_id,
        filename: upload.filename,
        report_markdown: render_markdown(&record),
        model_output: format_response(&output.raw_response, true),
        record,
        outcome,
        warnings,
    })
}
