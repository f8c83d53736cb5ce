use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use ulcerwatch_schema::Alert;

use super::ErrorBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(active_alerts))
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub taken_at: DateTime<Utc>,
    pub alerts: Vec<Alert>,
}

async fn active_alerts(
    State(state): State<AppState>,
) -> Result<Json<AlertsResponse>, (StatusCode, Json<ErrorBody>)> {
    let guard = state.snapshot.read().await;
    let snapshot = guard.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorBody::new("no telemetry snapshot yet")),
        )
    })?;

    Ok(Json(AlertsResponse {
        taken_at: snapshot.taken_at,
        alerts: snapshot.alerts.clone(),
    }))
}
