use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use ulcerwatch_schema::SensorKind;
use ulcerwatch_telemetry::{FieldMap, FieldSpec};

/// Persona instruction injected into every chat completion.
pub const DFU_SYSTEM_PROMPT: &str = "You are an AI-powered healthcare assistant specialized in \
monitoring and managing Diabetic Foot Ulcers (DFU). Your primary role is to assist diabetic \
patients by analyzing sensor readings (e.g., temperature, pressure, SpO2, and heart rate) from \
wearable devices and providing timely recommendations to prevent complications.\n\n\
1. Monitoring & Analysis: analyze foot temperature, pressure distribution, oxygen saturation, \
and heart rate; detect early signs of ulcer formation, poor circulation, or excessive pressure; \
compare real-time readings with baseline patient data and flag abnormalities.\n\
2. Personalized Recommendations: provide preventive measures such as pressure relief techniques, \
proper footwear advice, hygiene tips, and wound care guidelines; offer exercise and mobility \
suggestions to improve circulation; recommend dietary changes for stable blood glucose.\n\
3. Risk Alerts & Warnings: alert the patient if a high-risk condition is detected (abnormal \
temperature variations, excessive pressure, or low SpO2 in the foot); suggest seeking medical \
attention if critical thresholds are exceeded.\n\
4. Conversational & Supportive Tone: engage in a friendly, empathetic, easy-to-understand \
conversation; give step-by-step guidance on wound management and self-care; encourage follow-ups \
with healthcare professionals.\n\
5. Long-Term Health Management: track historical trends, provide reminders for routine checkups \
and medication, and educate the patient on diabetic neuropathy and ulcer prevention.\n\n\
Always provide accurate, medically sound advice and encourage consulting a healthcare \
professional when necessary.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub channel_id: String,
    /// Read key for the channel; falls back to THINGSPEAK_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_results")]
    pub results: u32,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_feed_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_field_map")]
    pub fields: FieldMap,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_model")]
    pub model: String,
    /// Falls back to GOOGLE_AI_API_KEY.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_chat_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
}

fn default_bind() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_feed_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}

fn default_results() -> u32 {
    2
}

fn default_poll_interval_secs() -> u64 {
    30
}

fn default_feed_timeout_secs() -> u64 {
    10
}

fn default_model() -> String {
    "gemini-pro".to_string()
}

fn default_chat_timeout_secs() -> u64 {
    30
}

fn default_system_prompt() -> String {
    DFU_SYSTEM_PROMPT.to_string()
}

/// The channel layout of the reference device: two temperature sensors,
/// two pressure sensors, heart rate, SpO2.
fn default_field_map() -> FieldMap {
    FieldMap::from([
        (
            "field1".to_string(),
            FieldSpec {
                sensor: "temp1".into(),
                kind: SensorKind::Temperature,
            },
        ),
        (
            "field2".to_string(),
            FieldSpec {
                sensor: "temp2".into(),
                kind: SensorKind::Temperature,
            },
        ),
        (
            "field3".to_string(),
            FieldSpec {
                sensor: "pressure1".into(),
                kind: SensorKind::Pressure,
            },
        ),
        (
            "field4".to_string(),
            FieldSpec {
                sensor: "pressure2".into(),
                kind: SensorKind::Pressure,
            },
        ),
        (
            "field5".to_string(),
            FieldSpec {
                sensor: "heart_rate".into(),
                kind: SensorKind::HeartRate,
            },
        ),
        (
            "field6".to_string(),
            FieldSpec {
                sensor: "spo2".into(),
                kind: SensorKind::SpO2,
            },
        ),
    ])
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            telemetry: TelemetryConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            channel_id: String::new(),
            api_key: String::new(),
            results: default_results(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_feed_timeout_secs(),
            fields: default_field_map(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key: String::new(),
            timeout_secs: default_chat_timeout_secs(),
            system_prompt: default_system_prompt(),
        }
    }
}

impl Config {
    /// Loads the YAML config, or defaults when the file does not exist.
    /// Empty API keys fall back to their environment variables.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            serde_yaml::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?
        } else {
            tracing::info!(path = %path.display(), "config file not found, using defaults");
            Config::default()
        };

        if config.telemetry.api_key.is_empty() {
            if let Ok(key) = std::env::var("THINGSPEAK_API_KEY") {
                config.telemetry.api_key = key;
            }
        }
        if config.chat.api_key.is_empty() {
            if let Ok(key) = std::env::var("GOOGLE_AI_API_KEY") {
                config.chat.api_key = key;
            }
        }

        Ok(config)
    }
}
