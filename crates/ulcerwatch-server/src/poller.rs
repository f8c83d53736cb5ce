use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use ulcerwatch_schema::ReadingSet;
use ulcerwatch_telemetry::{classify, evaluate, normalize_record, FeedClient, FeedEntry, FieldMap};

use crate::state::{ReadingView, Snapshot};

/// Runs fetch -> normalize -> classify -> evaluate on a fixed cadence and
/// publishes the result into shared state. The evaluation pipeline itself is
/// pure; this task owns the only clock in the system.
pub fn spawn_poller(
    feed: FeedClient,
    fields: FieldMap,
    poll_interval: Duration,
    snapshot: Arc<RwLock<Option<Snapshot>>>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        let mut baseline: Option<ReadingSet> = None;

        loop {
            ticker.tick().await;

            match feed.latest().await {
                Ok(entry) => {
                    let (next, set) = evaluate_cycle(&entry, &fields, baseline.as_ref());
                    tracing::info!(
                        readings = next.readings.len(),
                        alerts = next.alerts.len(),
                        failures = next.parse_failures.len(),
                        "telemetry cycle evaluated"
                    );
                    *snapshot.write().await = Some(next);
                    baseline = Some(set);
                }
                Err(err) => {
                    // Surfaced and dropped; the previous snapshot stays
                    // visible and the next tick tries again. No backoff.
                    tracing::warn!(error = %err, "telemetry poll failed");
                }
            }
        }
    })
}

/// Evaluates one raw feed entry into a served snapshot. Pure; the poller
/// supplies the prior cycle as baseline.
pub fn evaluate_cycle(
    entry: &FeedEntry,
    fields: &FieldMap,
    baseline: Option<&ReadingSet>,
) -> (Snapshot, ReadingSet) {
    let (set, failures) = normalize_record(&entry.fields, fields, entry.created_at);
    let alerts = evaluate(&set, baseline);

    let readings = set
        .readings
        .iter()
        .map(|(sensor, reading)| ReadingView {
            sensor: sensor.clone(),
            kind: reading.kind,
            value: reading.value,
            unit: reading.unit.clone(),
            status: classify(reading.kind, reading.value),
        })
        .collect();

    let snapshot = Snapshot {
        taken_at: set.taken_at,
        readings,
        alerts,
        parse_failures: failures.iter().map(|f| f.to_string()).collect(),
    };
    (snapshot, set)
}
