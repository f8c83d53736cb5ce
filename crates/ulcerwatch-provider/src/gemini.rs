//! Google Gemini API adapter
//!
//! https://ai.google.dev/api/generate-content

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::{ChatProvider, ChatTurn, GatewayError, TurnPart};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    api_base: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            api_base: GEMINI_API_BASE.to_string(),
        }
    }

    /// Points the adapter at a different endpoint. Used by tests.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ChatProvider for GeminiProvider {
    async fn send(&self, turns: Vec<ChatTurn>) -> Result<String, GatewayError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );
        let payload = GeminiRequest { contents: turns };

        let resp = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&payload)
            .send()
            .await
            .map_err(into_gateway_error)?;

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), "gemini upstream error");
            return Err(upstream_error(status, &text));
        }

        let body: GeminiResponse = resp.json().await.map_err(into_gateway_error)?;
        completion_text(body)
    }
}

fn into_gateway_error(err: reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Transport(err.to_string())
    }
}

/// Non-2xx bodies usually carry `{"error": {"message": ...}}`; fall back to
/// the raw body when they do not.
fn upstream_error(status: StatusCode, text: &str) -> GatewayError {
    let message = serde_json::from_str::<GeminiErrorBody>(text)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| text.to_string());
    GatewayError::Upstream {
        status: status.as_u16(),
        message,
    }
}

fn completion_text(body: GeminiResponse) -> Result<String, GatewayError> {
    let candidate = body
        .candidates
        .into_iter()
        .next()
        .ok_or(GatewayError::EmptyResponse)?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();
    if text.is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<TurnPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: GeminiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serialization_matches_expected_shape() {
        let payload = GeminiRequest {
            contents: vec![ChatTurn::model("."), ChatTurn::user("hi")],
        };
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "contents": [
                    { "role": "model", "parts": [{ "text": "." }] },
                    { "role": "user", "parts": [{ "text": "hi" }] }
                ]
            })
        );
    }

    #[test]
    fn completion_text_joins_parts() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{ "text": "line 1 " }, { "text": "line 2" }]
                },
                "finishReason": "STOP"
            }]
        });
        let body: GeminiResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(completion_text(body).unwrap(), "line 1 line 2");
    }

    #[test]
    fn empty_candidates_is_empty_response() {
        let body: GeminiResponse =
            serde_json::from_value(serde_json::json!({ "candidates": [] })).unwrap();
        assert!(matches!(
            completion_text(body),
            Err(GatewayError::EmptyResponse)
        ));
    }

    #[test]
    fn upstream_error_prefers_parsed_message() {
        let err = upstream_error(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#,
        );
        match err {
            GatewayError::Upstream { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }

    #[test]
    fn upstream_error_falls_back_to_raw_body() {
        let err = upstream_error(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        match err {
            GatewayError::Upstream { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>bad gateway</html>");
            }
            other => panic!("expected upstream error, got {other:?}"),
        }
    }
}
