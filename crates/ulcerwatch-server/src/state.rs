use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use ulcerwatch_provider::ChatProvider;
use ulcerwatch_schema::{Alert, SensorKind, Status};

/// Shared application state accessible from all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Fixed persona instruction for the chat assistant.
    pub system_prompt: Arc<String>,
    /// Outbound LLM adapter; swapped for a stub in tests.
    pub provider: Arc<dyn ChatProvider>,
    /// Latest evaluated poll cycle; `None` until the first successful poll.
    pub snapshot: Arc<RwLock<Option<Snapshot>>>,
}

/// One fully evaluated poll cycle, as served to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub taken_at: DateTime<Utc>,
    pub readings: Vec<ReadingView>,
    pub alerts: Vec<Alert>,
    /// Human-readable descriptions of fields the feed delivered malformed.
    pub parse_failures: Vec<String>,
}

/// A normalized reading with its severity band attached.
#[derive(Debug, Clone, Serialize)]
pub struct ReadingView {
    pub sensor: String,
    pub kind: SensorKind,
    pub value: f64,
    pub unit: String,
    pub status: Status,
}
