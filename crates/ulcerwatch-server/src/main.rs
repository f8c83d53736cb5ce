use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use ulcerwatch_provider::GeminiProvider;
use ulcerwatch_server::config::Config;
use ulcerwatch_server::poller::spawn_poller;
use ulcerwatch_server::state::AppState;
use ulcerwatch_telemetry::FeedClient;

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ulcerwatch_server=info,tower_http=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = std::env::var("ULCERWATCH_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("ulcerwatch.yaml"));
    let config = Config::load(&config_path)?;

    let provider = GeminiProvider::new(
        config.chat.api_key.clone(),
        config.chat.model.clone(),
        Duration::from_secs(config.chat.timeout_secs),
    );

    let feed = FeedClient::new(
        config.telemetry.base_url.clone(),
        config.telemetry.channel_id.clone(),
        config.telemetry.api_key.clone(),
        config.telemetry.results,
        Duration::from_secs(config.telemetry.timeout_secs),
    );

    let snapshot = Arc::new(RwLock::new(None));
    spawn_poller(
        feed,
        config.telemetry.fields.clone(),
        Duration::from_secs(config.telemetry.poll_interval_secs),
        snapshot.clone(),
    );

    let state = AppState {
        system_prompt: Arc::new(config.chat.system_prompt.clone()),
        provider: Arc::new(provider),
        snapshot,
    };

    let addr = std::env::var("ULCERWATCH_BIND").unwrap_or_else(|_| config.bind.clone());
    ulcerwatch_server::serve(state, &addr).await
}
