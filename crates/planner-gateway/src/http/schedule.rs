//! Schedule endpoints — GET/PUT /api/schedule.
//!
//! Entries go over the wire as `{"user_id", "day", "status"}`; the surrogate
//! id stays internal. PUT answers with an array holding zero entries (the
//! cell is back to the office default) or exactly one.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::error;

use super::{api_error, ApiError};
use crate::app::AppState;
use planner_schedule::{validate_range, ScheduleEntry, ScheduleError, ScheduleStatus};

#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleUpdate {
    #[serde(alias = "userId")]
    pub user_id: i64,
    pub day: NaiveDate,
    pub status: ScheduleStatus,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ScheduleView {
    pub user_id: i64,
    pub day: NaiveDate,
    pub status: ScheduleStatus,
}

impl From<ScheduleEntry> for ScheduleView {
    fn from(entry: ScheduleEntry) -> Self {
        Self {
            user_id: entry.user_id,
            day: entry.day,
            status: entry.status,
        }
    }
}

/// GET /api/schedule?start=YYYY-MM-DD&end=YYYY-MM-DD
pub async fn read_schedule(
    State(state): State<Arc<AppState>>,
    Query(range): Query<RangeParams>,
) -> Result<Json<Vec<ScheduleView>>, ApiError> {
    validate_range(range.start, range.end).map_err(schedule_error)?;
    let entries = state
        .schedule
        .range_query(range.start, range.end)
        .map_err(schedule_error)?;
    Ok(Json(entries.into_iter().map(ScheduleView::from).collect()))
}

/// PUT /api/schedule
pub async fn update_schedule(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ScheduleUpdate>,
) -> Result<Json<Vec<ScheduleView>>, ApiError> {
    let entry = state
        .schedule
        .upsert(payload.user_id, payload.day, payload.status)
        .map_err(schedule_error)?;
    Ok(Json(entry.into_iter().map(ScheduleView::from).collect()))
}

fn schedule_error(e: ScheduleError) -> ApiError {
    match e {
        ScheduleError::InvalidRange { .. } => {
            api_error(StatusCode::BAD_REQUEST, "Start date must precede end")
        }
        other => {
            error!(error = %other, "schedule store failure");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
        }
    }
}
