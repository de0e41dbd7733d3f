//! MetricsClient against an in-process mock of the metrics API.

mod common;

use common::{snapshot_value, spawn_api, LatestMode};
use sysdash::{ErrorKind, MetricsClient};

#[tokio::test]
async fn fetch_latest_decodes_snapshot() {
    let (base, _state) = spawn_api().await;
    let client = MetricsClient::new(&base).unwrap();
    let m = client.fetch_latest().await.expect("latest snapshot");
    assert_eq!(m.cpu.count, 2);
    assert_eq!(m.network.bytes_recv, 5000);
    assert_eq!(m.load_average.one, 0.5);
    assert!(m.disk.contains_key("/"));
}

#[tokio::test]
async fn server_error_is_a_transport_failure() {
    let (base, state) = spawn_api().await;
    *state.latest.lock().unwrap() = LatestMode::ServerError;
    let client = MetricsClient::new(&base).unwrap();
    let err = client.fetch_latest().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("500"), "{err}");
}

#[tokio::test]
async fn malformed_body_is_a_decode_failure() {
    let (base, state) = spawn_api().await;
    *state.latest.lock().unwrap() = LatestMode::Malformed;
    let client = MetricsClient::new(&base).unwrap();
    let err = client.fetch_latest().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    // Bind then drop to get a port nobody listens on.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let client = MetricsClient::new(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = client.fetch_history().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn history_may_be_empty_or_ordered() {
    let (base, state) = spawn_api().await;
    let client = MetricsClient::new(&base).unwrap();
    assert!(client.fetch_history().await.unwrap().is_empty());

    *state.history.lock().unwrap() = vec![
        snapshot_value("2024-03-01 11:59:50", 1000),
        snapshot_value("2024-03-01 12:00:00", 2500),
    ];
    let h = client.fetch_history().await.unwrap();
    assert_eq!(h.len(), 2);
    assert!(h[0].timestamp < h[1].timestamp);
    assert_eq!(h[1].network.bytes_sent, 2500);
}

#[tokio::test]
async fn schedule_round_trip() {
    let (base, state) = spawn_api().await;
    let client = MetricsClient::new(&base).unwrap();

    let msg = client.start_schedule(10).await.unwrap();
    assert!(msg.contains("10 seconds"), "{msg}");
    assert_eq!(*state.scheduled.lock().unwrap(), Some(10));

    let msg = client.stop_schedule().await.unwrap();
    assert_eq!(msg, "Scheduled collection stopped");
    // Stopping twice is not an error.
    let msg = client.stop_schedule().await.unwrap();
    assert_eq!(msg, "No scheduled job was running");
}

#[tokio::test]
async fn zero_interval_never_reaches_the_server() {
    let (base, state) = spawn_api().await;
    let client = MetricsClient::new(&base).unwrap();
    let err = client.start_schedule(0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Contract);
    assert_eq!(*state.scheduled.lock().unwrap(), None);
}

#[tokio::test]
async fn manual_collection_returns_message() {
    let (base, _state) = spawn_api().await;
    let client = MetricsClient::new(&base).unwrap();
    assert_eq!(client.trigger_collection().await.unwrap(), "Metrics collected");
}
