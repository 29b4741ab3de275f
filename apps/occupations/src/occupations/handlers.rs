//! Axum route handlers for the Occupations API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::occupations::pipeline::RunOutcome;
use crate::occupations::record::OccupationRecord;
use crate::occupations::Notice;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FetchRequest {
    #[serde(default)]
    pub keyword: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchStatus {
    Success,
    NoMatches,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub keyword: String,
    pub status: FetchStatus,
    pub message: String,
    pub records: Vec<OccupationRecord>,
    pub notices: Vec<Notice>,
}

#[derive(Debug, Serialize)]
pub struct OccupationListResponse {
    pub records: Vec<OccupationRecord>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/occupations/fetch
///
/// Replaces the stored snapshot with fresh data for a military title or code.
/// A blank keyword is rejected before any network call.
pub async fn handle_fetch_occupations(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> Result<Json<FetchResponse>, AppError> {
    if request.keyword.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a Military Title or MOC Code.".to_string(),
        ));
    }

    let report = state.pipeline.run(&request.keyword).await?;

    let (status, message) = match report.outcome() {
        RunOutcome::Fetched(n) => (
            FetchStatus::Success,
            format!("Data fetched successfully! {n} SOC records found."),
        ),
        RunOutcome::NoMatches => (
            FetchStatus::NoMatches,
            "No data available for the given input.".to_string(),
        ),
        RunOutcome::SearchFailed(message) => return Err(AppError::Upstream(message)),
    };

    Ok(Json(FetchResponse {
        keyword: report.keyword,
        status,
        message,
        records: report.records,
        notices: report.notices,
    }))
}

/// GET /api/v1/occupations
///
/// Records persisted by the most recent run.
pub async fn handle_list_occupations(
    State(state): State<AppState>,
) -> Result<Json<OccupationListResponse>, AppError> {
    let records = state.pipeline.store().load_all().await?;
    Ok(Json(OccupationListResponse { records }))
}

/// GET /api/v1/occupations/:code
pub async fn handle_get_occupation(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<OccupationRecord>, AppError> {
    state
        .pipeline
        .store()
        .load(&code)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No stored record for code {code}")))
}
