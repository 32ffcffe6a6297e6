//! Telemetry for the worker pool.
//!
//! Counters and a queue-wait histogram. Log output goes through `tracing`;
//! installing a subscriber is left to the application.

pub mod metrics;

pub use metrics::{Metrics, MetricsSnapshot};
