//! Library surface for sysdash: API client, rate and history derivation,
//! refresh scheduling and the terminal dashboard.

pub mod alerts;
pub mod app;
pub mod client;
pub mod error;
pub mod history;
pub mod logging;
pub mod profiles;
pub mod rate;
pub mod scheduler;
pub mod sequence;
pub mod types;
pub mod ui;

pub use client::MetricsClient;
pub use error::{ClientError, ErrorKind};
pub use types::MetricsSnapshot;
