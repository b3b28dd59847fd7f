//! Prometheus metrics for the poller.
//!
//! Registered in the default registry on first use. Nothing serves them
//! over HTTP; `Metrics::gather_text` renders the exposition format for
//! whoever wants to scrape or dump it.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()`. Registration only fails on a
//! duplicate metric name, which is a programming error.

use crate::error::{TelemetryError, TelemetryResult};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge, CounterVec, Encoder, Gauge, TextEncoder,
};

/// Completed cycles by outcome (persisted/empty/skipped).
pub static CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricelog_cycles_total",
        "Completed poll cycles by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Skipped fetches by reason (http_status/transport/decode).
pub static FETCH_SKIPPED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricelog_fetch_skipped_total",
        "Fetches that produced no data, by reason",
        &["reason"]
    )
    .unwrap()
});

/// Rows appended, by file kind (aggregate/token_csv/token_json).
pub static ROWS_WRITTEN_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "pricelog_rows_written_total",
        "Rows appended to persisted files",
        &["file"]
    )
    .unwrap()
});

/// Unix time of the last completed cycle.
pub static LAST_CYCLE_TIMESTAMP: Lazy<Gauge> = Lazy::new(|| {
    register_gauge!(
        "pricelog_last_cycle_timestamp_seconds",
        "Unix timestamp of the last completed cycle"
    )
    .unwrap()
});

/// Metrics recorder facade.
pub struct Metrics;

impl Metrics {
    /// Record a completed cycle.
    pub fn cycle_completed(outcome: &str, unix_secs: f64) {
        CYCLES_TOTAL.with_label_values(&[outcome]).inc();
        LAST_CYCLE_TIMESTAMP.set(unix_secs);
    }

    /// Record a skipped fetch.
    pub fn fetch_skipped(reason: &str) {
        FETCH_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
    }

    /// Record rows written in one cycle.
    pub fn rows_written(aggregate: usize, per_token: usize) {
        ROWS_WRITTEN_TOTAL
            .with_label_values(&["aggregate"])
            .inc_by(aggregate as f64);
        ROWS_WRITTEN_TOTAL
            .with_label_values(&["token_csv"])
            .inc_by(per_token as f64);
        ROWS_WRITTEN_TOTAL
            .with_label_values(&["token_json"])
            .inc_by(per_token as f64);
    }

    /// Render all registered metrics in the Prometheus text format.
    pub fn gather_text() -> TelemetryResult<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&prometheus::gather(), &mut buffer)
            .map_err(|e| TelemetryError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| TelemetryError::Metrics(e.to_string()))
    }
}
