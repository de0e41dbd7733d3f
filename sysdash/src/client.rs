//! HTTP client for the metrics API: latest snapshot, history, and the
//! server-side collection schedule.

use reqwest::{Certificate, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::error::{ClientError, Result};
use crate::types::{Confirmation, MetricsSnapshot, ScheduleRequest};

pub const METRICS_PATH: &str = "api/metrics";
pub const HISTORY_PATH: &str = "api/metrics/history";
pub const COLLECT_PATH: &str = "api/metrics/collect";
pub const SCHEDULE_PATH: &str = "api/schedule";
pub const SCHEDULE_STOP_PATH: &str = "api/schedule/stop";

/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    http: reqwest::Client,
    base: Url,
}

/// Schedules shorter than one second are a caller error, never sent to the server.
pub fn validate_interval(interval_secs: u64) -> Result<u64> {
    if interval_secs == 0 {
        return Err(ClientError::InvalidInterval(interval_secs));
    }
    Ok(interval_secs)
}

fn normalize_base(base_url: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url.trim()).map_err(|_| ClientError::InvalidBaseUrl(base_url.into()))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(base_url.into()));
    }
    // Endpoints are joined relative to the base, so keep any path prefix as a directory.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

impl MetricsClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_tls_ca(base_url, None)
    }

    /// Build a client, optionally trusting an extra PEM CA bundle for `https` bases.
    pub fn with_tls_ca(base_url: &str, tls_ca: Option<&str>) -> Result<Self> {
        let base = normalize_base(base_url)?;
        let mut builder = reqwest::Client::builder();
        if let Some(path) = tls_ca {
            let pem = std::fs::read(path).map_err(|e| ClientError::TlsConfig {
                path: path.into(),
                reason: e.to_string(),
            })?;
            let cert = Certificate::from_pem(&pem).map_err(|e| ClientError::TlsConfig {
                path: path.into(),
                reason: e.to_string(),
            })?;
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build().map_err(|e| ClientError::Transport {
            url: base.to_string(),
            source: e,
        })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|_| ClientError::InvalidBaseUrl(format!("{}{path}", self.base)))
    }

    /// GET the most recent snapshot.
    pub async fn fetch_latest(&self) -> Result<MetricsSnapshot> {
        self.get_json(METRICS_PATH).await
    }

    /// GET the stored history, oldest first. An empty series is a valid answer.
    pub async fn fetch_history(&self) -> Result<Vec<MetricsSnapshot>> {
        self.get_json(HISTORY_PATH).await
    }

    /// Ask the server to collect every `interval_secs` seconds; returns its message.
    pub async fn start_schedule(&self, interval_secs: u64) -> Result<String> {
        let interval = validate_interval(interval_secs)?;
        let reply: Confirmation = self
            .post_json(SCHEDULE_PATH, Some(&ScheduleRequest { interval }))
            .await?;
        Ok(reply.message)
    }

    /// Stop server-side collection. A server with nothing running still answers 2xx.
    pub async fn stop_schedule(&self) -> Result<String> {
        let reply: Confirmation = self.post_json::<(), _>(SCHEDULE_STOP_PATH, None).await?;
        Ok(reply.message)
    }

    /// One-off collection on the server, outside any schedule.
    pub async fn trigger_collection(&self) -> Result<String> {
        let reply: Confirmation = self.post_json::<(), _>(COLLECT_PATH, None).await?;
        Ok(reply.message)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| transport(&url, e))?;
        decode(&url, resp).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        debug!(%url, "POST");
        let mut req = self.http.post(url.clone());
        if let Some(b) = body {
            req = req.json(b);
        }
        let resp = req.send().await.map_err(|e| transport(&url, e))?;
        decode(&url, resp).await
    }
}

fn transport(url: &Url, source: reqwest::Error) -> ClientError {
    ClientError::Transport {
        url: url.to_string(),
        source,
    }
}

async fn decode<T: DeserializeOwned>(url: &Url, resp: Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            url: url.to_string(),
            status,
        });
    }
    let body = resp.bytes().await.map_err(|e| transport(url, e))?;
    debug!(%url, %status, bytes = body.len(), "response");
    serde_json::from_slice(&body).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}
