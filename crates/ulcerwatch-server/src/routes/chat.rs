use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use ulcerwatch_provider::{format_transcript, ChatTurn};
use ulcerwatch_schema::ChatMessage;

use super::ErrorBody;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(chat))
}

/// Either a bare message or a full transcript (oldest-first, newest user
/// utterance last).
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub messages: Option<Vec<ChatMessage>>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorBody>)> {
    let turns = build_turns(&req, &state.system_prompt).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("message is required")),
        )
    })?;

    match state.provider.send(turns).await {
        Ok(response) => Ok(Json(ChatResponse { response })),
        Err(err) => {
            tracing::error!(error = %err, "chat completion failed");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(err.to_string())),
            ))
        }
    }
}

/// `None` means the request carried nothing to say.
fn build_turns(req: &ChatRequest, system_prompt: &str) -> Option<Vec<ChatTurn>> {
    if let Some(messages) = req.messages.as_deref() {
        if messages.iter().any(|m| !m.content.trim().is_empty()) {
            return Some(format_transcript(messages, Some(system_prompt)));
        }
        return None;
    }

    let message = req.message.as_deref()?;
    if message.trim().is_empty() {
        return None;
    }
    let mut turns = format_transcript(&[], Some(system_prompt));
    turns.push(ChatTurn::user(message));
    Some(turns)
}
