//! Typed result of one fetch.
//!
//! A fetch never fails in the `Result` sense: the cycle either gets a
//! snapshot or is skipped, and the caller decides what to do with the reason.

use pricelog_core::PriceSnapshot;
use thiserror::Error;

/// Outcome of a single price fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// HTTP 200 with a decodable body. The snapshot may be empty.
    Fetched(PriceSnapshot),
    /// Nothing usable this cycle.
    Skipped(SkipReason),
}

/// Why a cycle produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    /// Upstream answered with something other than 200.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Connection, timeout or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Body was not the expected JSON shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl SkipReason {
    /// Short label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::HttpStatus { .. } => "http_status",
            Self::Transport(_) => "transport",
            Self::Decode(_) => "decode",
        }
    }
}
