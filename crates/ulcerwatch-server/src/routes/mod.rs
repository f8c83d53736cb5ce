pub mod alerts;
pub mod chat;
pub mod readings;

use axum::Router;
use serde::Serialize;

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/chat", chat::router())
        .nest("/readings", readings::router())
        .nest("/alerts", alerts::router())
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
