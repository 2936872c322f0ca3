//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::AppState;
use super::types::{DayRecord, DaysQuery, ErrorResponse, SummaryResponse};

/// `GET /summary` → 200 + `SummaryResponse` JSON
pub async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    Json(SummaryResponse {
        parameters: state.parameters.clone(),
        derived: state.result.derived,
        summary: state.summary.clone(),
    })
}

/// Returns day records, optionally filtered by date range.
///
/// `GET /days` → 200 + `Vec<DayRecord>` JSON
/// `GET /days?from=2024-01-01&to=2024-01-31` → filtered range (inclusive)
/// `GET /days?from=2024-02-01&to=2024-01-01` → 400 + `ErrorResponse`
pub async fn get_days(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DaysQuery>,
) -> impl IntoResponse {
    if let (Some(from), Some(to)) = (query.from, query.to) {
        if from > to {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: format!("`from` ({from}) must be <= `to` ({to})"),
                }),
            ));
        }
    }

    let records: Vec<DayRecord> = state
        .result
        .days
        .iter()
        .filter(|d| query.from.is_none_or(|from| d.date >= from))
        .filter(|d| query.to.is_none_or(|to| d.date <= to))
        .map(DayRecord::from)
        .collect();

    Ok(Json(records))
}

/// `GET /sweep` → 200 + `SweepTable` JSON, or 404 when the sweep was skipped.
pub async fn get_sweep(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.sweep {
        Some(table) => Ok(Json(table.clone())),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "autonomy sweep was not run".to_string(),
            }),
        )),
    }
}
