//! Axum route handlers for the Candidates API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::candidate::CandidateRecord;
use crate::screening::pipeline::{screen_upload, ScreeningResult};
use crate::screening::report::{render_markdown, ScoreLevel};
use crate::screening::table::{
    compute_stats, to_csv, to_json, CandidateFilter, CandidateStats, ExportFormat,
};
use crate::screening::upload::parse_multipart;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub total: usize,
    pub candidates: Vec<CandidateRecord>,
}

#[derive(Debug, Serialize)]
pub struct CandidateDetailResponse {
    pub record: CandidateRecord,
    pub level: ScoreLevel,
    pub report_markdown: String,
}

// Not `#[serde(flatten)]`: flattened numeric fields fail to parse from query strings.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    pub min_score: Option<f64>,
    pub area: Option<String>,
}

impl ExportQuery {
    fn filter(&self) -> CandidateFilter {
        CandidateFilter {
            min_score: self.min_score,
            area: self.area.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteAllQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub deleted: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/candidates/screen
///
/// Multipart upload with a `file` field holding the PDF résumé.
pub async fn handle_screen(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ScreeningResult>, AppError> {
    let upload = parse_multipart(multipart).await?;
    let result = screen_upload(&state, upload).await?;
    Ok(Json(result))
}

/// GET /api/v1/candidates?min_score=&area=
pub async fn handle_list(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Result<Json<CandidateListResponse>, AppError> {
    let all = state.store.load().await?;
    let total = all.len();
    let candidates = filter.apply(all);
    Ok(Json(CandidateListResponse { total, candidates }))
}

/// GET /api/v1/candidates/stats?min_score=&area=
pub async fn handle_stats(
    State(state): State<AppState>,
    Query(filter): Query<CandidateFilter>,
) -> Result<Json<CandidateStats>, AppError> {
    let candidates = filter.apply(state.store.load().await?);
    Ok(Json(compute_stats(&candidates)))
}

/// GET /api/v1/candidates/export?format=json|csv&min_score=&area=
///
/// Without filters, the JSON export is the stored file byte for byte.
pub async fn handle_export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let filter = query.filter();
    let body = match (query.format, filter.is_empty()) {
        (ExportFormat::Json, true) => match state.store.raw_json().await? {
            Some(raw) => raw,
            None => b"[]".to_vec(),
        },
        (ExportFormat::Json, false) => {
            let candidates = filter.apply(state.store.load().await?);
            to_json(&candidates).map_err(|e| AppError::Internal(e.into()))?
        }
        (ExportFormat::Csv, _) => {
            let candidates = filter.apply(state.store.load().await?);
            to_csv(&candidates).map_err(|e| AppError::Internal(e.into()))?
        }
    };

    let stem = if filter.is_empty() {
        "candidates"
    } else {
        "candidates_filtered"
    };
    let disposition = format!(
        "attachment; filename=\"{stem}.{}\"",
        query.format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, query.format.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}

/// GET /api/v1/candidates/by-name/:name
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CandidateDetailResponse>, AppError> {
    let record = state
        .store
        .find(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate '{name}' not found")))?;

    Ok(Json(CandidateDetailResponse {
        level: ScoreLevel::from_score(record.score),
        report_markdown: render_markdown(&record),
        record,
    }))
}

/// DELETE /api/v1/candidates?confirm=true
///
/// Deletes every analyzed résumé. Refused unless the caller confirms.
pub async fn handle_delete_all(
    State(state): State<AppState>,
    Query(query): Query<DeleteAllQuery>,
) -> Result<(StatusCode, Json<DeleteAllResponse>), AppError> {
    if !query.confirm {
        return Err(AppError::Validation(
            "Deleting all candidates requires confirm=true".to_string(),
        ));
    }
    let deleted = state.store.clear().await?;
    Ok((StatusCode::OK, Json(DeleteAllResponse { deleted })))
}
