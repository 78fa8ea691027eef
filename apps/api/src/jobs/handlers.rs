//! Axum route handlers for the Job API.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::errors::AppError;
use crate::jobs::{format_job_details, JobPosting};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub job: JobPosting,
    /// Exactly the text interpolated into the screening prompt.
    pub prompt_text: String,
}

/// GET /api/v1/job
pub async fn handle_get_job(State(state): State<AppState>) -> Result<Json<JobResponse>, AppError> {
    let job = state
        .jobs
        .latest()
        .await?
        .ok_or_else(|| AppError::NotFound("No job posting registered".to_string()))?;
    let prompt_text = format_job_details(&job);
    Ok(Json(JobResponse { job, prompt_text }))
}

/// POST /api/v1/job
///
/// Registers a new posting; subsequent screenings use it.
pub async fn handle_post_job(
    State(state): State<AppState>,
    Json(job): Json<JobPosting>,
) -> Result<(StatusCode, Json<JobResponse>), AppError> {
    if job.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }
    if job.description.trim().is_empty() && job.details.trim().is_empty() {
        return Err(AppError::Validation(
            "description and details cannot both be empty".to_string(),
        ));
    }

    state.jobs.append(&job).await?;
    let prompt_text = format_job_details(&job);
    Ok((StatusCode::CREATED, Json(JobResponse { job, prompt_text })))
}
