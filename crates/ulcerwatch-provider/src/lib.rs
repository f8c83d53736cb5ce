pub mod gemini;
pub mod transcript;

pub use gemini::GeminiProvider;
pub use transcript::{format_transcript, ChatTurn, TurnPart, TurnRole, INSTRUCTION_PREFIX};

use async_trait::async_trait;

/// Errors from one outbound completion call. Never retried here; the
/// caller decides whether a retry makes sense.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("llm upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },
    #[error("llm request timed out")]
    Timeout,
    #[error("llm transport error: {0}")]
    Transport(String),
    #[error("llm returned no completion")]
    EmptyResponse,
}

/// One generation request per call, provider-ready turns in, completion
/// text out.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn send(&self, turns: Vec<ChatTurn>) -> Result<String, GatewayError>;
}

/// Offline provider for tests and wiring checks: echoes the last user turn.
pub struct StubProvider;

#[async_trait]
impl ChatProvider for StubProvider {
    async fn send(&self, turns: Vec<ChatTurn>) -> Result<String, GatewayError> {
        let last = turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::User)
            .and_then(|t| t.parts.first())
            .map(|p| p.text.as_str())
            .ok_or(GatewayError::EmptyResponse)?;
        Ok(format!("[stub] {last}"))
    }
}
