use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The sensor modalities a foot-monitoring wearable reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Pressure,
    HeartRate,
    #[serde(rename = "spo2")]
    SpO2,
}

impl SensorKind {
    /// Display unit for readings of this kind.
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Pressure => "mmHg",
            SensorKind::HeartRate => "bpm",
            SensorKind::SpO2 => "%",
        }
    }

    /// The range considered unremarkable on the dashboard.
    pub fn normal_range(&self) -> (f64, f64) {
        match self {
            SensorKind::Temperature => (29.0, 32.0),
            SensorKind::Pressure => (1000.0, 1800.0),
            SensorKind::HeartRate => (60.0, 120.0),
            SensorKind::SpO2 => (90.0, 100.0),
        }
    }
}

/// Severity band derived from a continuous sensor value.
///
/// Ordered so that `Normal < Elevated < High < Critical` holds, which lets
/// alert lists sort by plain comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Normal,
    Elevated,
    High,
    Critical,
}

/// One typed, unit-tagged sensor value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub kind: SensorKind,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    /// Builds a reading with the unit implied by its kind.
    pub fn new(kind: SensorKind, value: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            kind,
            value,
            unit: kind.unit().to_string(),
            timestamp,
        }
    }
}

/// All readings from a single poll cycle, keyed by sensor id.
///
/// Identity is the sensor id ("temp1", "pressure2", ...), not the kind:
/// several sensors of the same kind may report in one cycle. The map is
/// ordered so repeated evaluation over the same data walks sensors in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingSet {
    pub taken_at: DateTime<Utc>,
    pub readings: BTreeMap<String, Reading>,
}

impl ReadingSet {
    pub fn new(taken_at: DateTime<Utc>) -> Self {
        Self {
            taken_at,
            readings: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, sensor_id: impl Into<String>, reading: Reading) {
        self.readings.insert(sensor_id.into(), reading);
    }

    pub fn get(&self, sensor_id: &str) -> Option<&Reading> {
        self.readings.get(sensor_id)
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Sensor ids of the given kind, in id order.
    pub fn ids_of_kind(&self, kind: SensorKind) -> Vec<&str> {
        self.readings
            .iter()
            .filter(|(_, r)| r.kind == kind)
            .map(|(id, _)| id.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    LowPressure,
    TemperatureDifferential,
}

impl AlertKind {
    pub fn name(&self) -> &'static str {
        match self {
            AlertKind::LowPressure => "low_pressure",
            AlertKind::TemperatureDifferential => "temperature_differential",
        }
    }
}

/// An active condition raised by the alert evaluator for one poll cycle.
///
/// `id` is derived from the kind plus the involved sensor ids, so the same
/// cause produces the same id on every cycle and callers can deduplicate
/// against what they already display. Alerts are not persisted here;
/// dismissal state belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub kind: AlertKind,
    pub message: String,
    pub severity: Status,
    pub detected_at: DateTime<Utc>,
    pub source_readings: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

/// One entry of a conversation transcript, oldest-first in context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }
}
