use ulcerwatch_schema::{Alert, AlertKind, ReadingSet, SensorKind, Status};

use crate::classify::PRESSURE_LOW;

/// Inter-sensor temperature spread above which ulceration risk is flagged.
pub const TEMP_DIFF_ALERT_C: f64 = 2.0;

/// Evaluates the active alerts for one poll cycle.
///
/// A pure function of its inputs: identical reading sets produce value-equal
/// alert sequences, which keeps repeated polling idempotent. Output is sorted
/// by descending severity, then alert kind, then id. `baseline` is accepted
/// for trend-relative rules; none of the current rules consume it.
pub fn evaluate(current: &ReadingSet, baseline: Option<&ReadingSet>) -> Vec<Alert> {
    let _ = baseline;
    let mut alerts = Vec::new();

    temperature_differential(current, &mut alerts);
    low_pressure(current, &mut alerts);

    alerts.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.kind.name().cmp(b.kind.name()))
            .then_with(|| a.id.cmp(&b.id))
    });
    alerts
}

/// One alert per pair of temperature sensors whose spread exceeds 2.0°C.
/// Pairs are walked in id order, so the same cause always yields the same
/// alert id.
fn temperature_differential(current: &ReadingSet, alerts: &mut Vec<Alert>) {
    let ids = current.ids_of_kind(SensorKind::Temperature);
    for (i, a) in ids.iter().enumerate() {
        for b in &ids[i + 1..] {
            let t1 = current.get(a).map(|r| r.value);
            let t2 = current.get(b).map(|r| r.value);
            let (Some(t1), Some(t2)) = (t1, t2) else {
                continue;
            };
            let diff = (t1 - t2).abs();
            if diff > TEMP_DIFF_ALERT_C {
                alerts.push(Alert {
                    id: format!("temperature_differential:{a}+{b}"),
                    kind: AlertKind::TemperatureDifferential,
                    message: format!(
                        "Temperature difference of {diff:.1}°C between {a} and {b} exceeds {TEMP_DIFF_ALERT_C:.1}°C"
                    ),
                    severity: Status::Critical,
                    detected_at: current.taken_at,
                    source_readings: vec![a.to_string(), b.to_string()],
                });
            }
        }
    }
}

/// One alert per pressure sensor reading below the 1000 mmHg floor.
fn low_pressure(current: &ReadingSet, alerts: &mut Vec<Alert>) {
    for id in current.ids_of_kind(SensorKind::Pressure) {
        let Some(reading) = current.get(id) else {
            continue;
        };
        if reading.value < PRESSURE_LOW {
            alerts.push(Alert {
                id: format!("low_pressure:{id}"),
                kind: AlertKind::LowPressure,
                message: format!(
                    "Pressure of {:.0} mmHg on {id} is below {PRESSURE_LOW:.0} mmHg",
                    reading.value
                ),
                severity: Status::Critical,
                detected_at: current.taken_at,
                source_readings: vec![id.to_string()],
            });
        }
    }
}
