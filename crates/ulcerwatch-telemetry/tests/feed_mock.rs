use std::time::Duration;

use chrono::Utc;
use ulcerwatch_schema::SensorKind;
use ulcerwatch_telemetry::{normalize_record, FeedClient, FeedError, FieldMap, FieldSpec};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feeds_body() -> serde_json::Value {
    serde_json::json!({
        "channel": { "id": 2886060 },
        "feeds": [
            {
                "created_at": "2025-03-01T10:00:00Z",
                "field1": "30.5",
                "field2": "31.0",
                "field3": "1500",
                "field4": "1200"
            },
            {
                "created_at": "2025-03-01T10:00:30Z",
                "field1": "34.0",
                "field2": "31.0",
                "field3": "1500",
                "field4": "abc"
            }
        ]
    })
}

fn field_map() -> FieldMap {
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
    ])
}

#[tokio::test]
async fn latest_returns_newest_entry_and_normalizes_partially() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/2886060/feeds.json"))
        .and(query_param("results", "2"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feeds_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = FeedClient::new(server.uri(), "2886060", "test-key", 2, Duration::from_secs(5));
    let entry = client.latest().await.unwrap();

    // Newest entry is last in the page.
    assert_eq!(entry.fields["field1"], "34.0");

    let (set, failures) = normalize_record(&entry.fields, &field_map(), entry.created_at);
    assert_eq!(set.len(), 3);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].field(), "field4");
}

#[tokio::test]
async fn non_success_status_becomes_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/2886060/feeds.json"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let client = FeedClient::new(server.uri(), "2886060", "bad-key", 2, Duration::from_secs(5));
    let err = client.latest().await.unwrap_err();

    match err {
        FeedError::Upstream { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid api key"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_feed_page_is_its_own_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/2886060/feeds.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "channel": {}, "feeds": [] })),
        )
        .mount(&server)
        .await;

    let client = FeedClient::new(server.uri(), "2886060", "test-key", 2, Duration::from_secs(5));
    assert!(matches!(client.latest().await, Err(FeedError::Empty)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/2886060/feeds.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(feeds_body())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = FeedClient::new(
        server.uri(),
        "2886060",
        "test-key",
        2,
        Duration::from_millis(50),
    );
    assert!(matches!(client.latest().await, Err(FeedError::Timeout)));
}

#[tokio::test]
async fn feed_timestamp_flows_into_reading_set() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels/2886060/feeds.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(feeds_body()))
        .mount(&server)
        .await;

    let client = FeedClient::new(server.uri(), "2886060", "test-key", 2, Duration::from_secs(5));
    let entry = client.latest().await.unwrap();
    let (set, _) = normalize_record(&entry.fields, &field_map(), entry.created_at);

    assert_eq!(
        set.taken_at,
        "2025-03-01T10:00:30Z".parse::<chrono::DateTime<Utc>>().unwrap()
    );
}
