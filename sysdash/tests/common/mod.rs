//! In-process stand-in for the metrics API, bound to an ephemeral port.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

pub const SNAPSHOT: &str = r#"{
    "timestamp": "2024-03-01 12:00:00",
    "cpu": {
        "percent": [12.5, 40.0],
        "average_percent": 26.25,
        "count": 2,
        "times_percent": {"user": 10.0, "system": 5.0, "idle": 85.0},
        "frequency": {"current": 2400.0, "min": 800.0, "max": 3600.0}
    },
    "memory": {
        "total": 8589934592, "available": 4294967296, "percent": 50.0,
        "used": 4294967296, "free": 2147483648,
        "swap": {"total": 2147483648, "used": 0, "free": 2147483648, "percent": 0.0}
    },
    "disk": {"/": {"total": 100000, "used": 60000, "free": 40000, "percent": 60.0}},
    "network": {
        "bytes_sent": 1000, "bytes_recv": 5000, "packets_sent": 10,
        "packets_recv": 50, "errin": 0, "errout": 0, "dropin": 0, "dropout": 0
    },
    "processes": [
        {"pid": 1, "name": "init", "username": "root", "cpu_percent": 0.5, "memory_percent": 0.1}
    ],
    "load_average": {"1min": 0.5, "5min": 0.25, "15min": 0.1},
    "system": {
        "boot_time": "2024-02-29 08:00:00",
        "uptime": {"days": 1, "hours": 4, "minutes": 0, "seconds": 0}
    }
}"#;

/// What the next GET of the latest snapshot answers with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatestMode {
    Ok,
    ServerError,
    Malformed,
}

#[derive(Clone)]
pub struct MockState {
    pub latest: Arc<Mutex<LatestMode>>,
    pub history: Arc<Mutex<Vec<Value>>>,
    pub scheduled: Arc<Mutex<Option<u64>>>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            latest: Arc::new(Mutex::new(LatestMode::Ok)),
            history: Arc::new(Mutex::new(Vec::new())),
            scheduled: Arc::new(Mutex::new(None)),
        }
    }
}

async fn latest(State(s): State<MockState>) -> Response {
    let mode = *s.latest.lock().unwrap();
    match mode {
        LatestMode::Ok => (
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            SNAPSHOT,
        )
            .into_response(),
        LatestMode::ServerError => {
            (StatusCode::INTERNAL_SERVER_ERROR, "collector crashed").into_response()
        }
        LatestMode::Malformed => (StatusCode::OK, "{\"timestamp\": 12").into_response(),
    }
}

async fn history(State(s): State<MockState>) -> Json<Vec<Value>> {
    Json(s.history.lock().unwrap().clone())
}

async fn schedule(State(s): State<MockState>, Json(body): Json<Value>) -> Json<Value> {
    let interval = body["interval"].as_u64().unwrap_or(0);
    *s.scheduled.lock().unwrap() = Some(interval);
    Json(json!({ "message": format!("Metrics collection scheduled every {interval} seconds") }))
}

async fn stop(State(s): State<MockState>) -> Json<Value> {
    let was = s.scheduled.lock().unwrap().take();
    let message = if was.is_some() {
        "Scheduled collection stopped"
    } else {
        "No scheduled job was running"
    };
    Json(json!({ "message": message }))
}

async fn collect() -> Json<Value> {
    Json(json!({ "message": "Metrics collected" }))
}

/// Serve the mock API; returns its base URL and shared state.
pub async fn spawn_api() -> (String, MockState) {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/metrics", get(latest))
        .route("/api/metrics/history", get(history))
        .route("/api/metrics/collect", post(collect))
        .route("/api/schedule", post(schedule))
        .route("/api/schedule/stop", post(stop))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

pub fn snapshot_value(ts: &str, bytes_sent: u64) -> Value {
    let mut v: Value = serde_json::from_str(SNAPSHOT).unwrap();
    v["timestamp"] = json!(ts);
    v["network"]["bytes_sent"] = json!(bytes_sent);
    v
}
