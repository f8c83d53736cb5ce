use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::ErrorBody;
use crate::state::{AppState, ReadingView};

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(latest_readings))
}

#[derive(Debug, Serialize)]
pub struct ReadingsResponse {
    pub taken_at: DateTime<Utc>,
    pub readings: Vec<ReadingView>,
    pub parse_failures: Vec<String>,
}

async fn latest_readings(
    State(state): State<AppState>,
) -> Result<Json<ReadingsResponse>, (StatusCode, Json<ErrorBody>)> {
    let guard = state.snapshot.read().await;
    let snapshot = guard.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody::new("no telemetry snapshot yet")),
        )
    })?;

    Ok(Json(ReadingsResponse {
        taken_at: snapshot.taken_at,
        readings: snapshot.readings.clone(),
        parse_failures: snapshot.parse_failures.clone(),
    }))
}
