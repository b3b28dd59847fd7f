//! Main application orchestration.
//!
//! One sequential task: wait for the minute boundary, fetch, persist,
//! repeat. Cancellation is checked around the sleep and during the fetch;
//! once writing has started the cycle runs to completion.

use crate::config::AppConfig;
use crate::error::AppResult;
use crate::scheduler;
use pricelog_core::CycleTimestamp;
use pricelog_feed::{FetchOutcome, PriceClient, SkipReason};
use pricelog_persistence::{CyclePersister, CycleWriteSummary};
use pricelog_telemetry::Metrics;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Snapshot written to disk.
    Persisted(CycleWriteSummary),
    /// Upstream answered 200 but returned no tracked tokens.
    Empty,
    /// Nothing fetched; nothing written.
    Skipped(SkipReason),
    /// Shutdown requested while fetching.
    Cancelled,
}

impl CycleOutcome {
    fn label(&self) -> &'static str {
        match self {
            Self::Persisted(_) => "persisted",
            Self::Empty => "empty",
            Self::Skipped(_) => "skipped",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Main application.
pub struct Application {
    config: AppConfig,
    client: PriceClient,
    persister: CyclePersister,
    cycle_count: u64,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        let tokens = config.token_list()?;
        let client = PriceClient::new(config.client_config(), tokens.clone())?;
        let persister = CyclePersister::new(&config.data_dir, tokens);

        Ok(Self {
            config,
            client,
            persister,
            cycle_count: 0,
        })
    }

    /// Run the poll loop until `cancel` fires.
    ///
    /// Returns an error only when persistence fails.
    pub async fn run(mut self, cancel: CancellationToken) -> AppResult<()> {
        info!(
            price_url = %self.config.price_url,
            data_dir = %self.config.data_dir,
            tokens = self.client.tokens().len(),
            "Entering poll loop"
        );

        loop {
            if !scheduler::wait_for_next_minute(&cancel).await {
                info!("Shutdown requested while waiting");
                break;
            }

            if self.run_cycle(&cancel).await? == CycleOutcome::Cancelled {
                info!("Shutdown requested while fetching");
                break;
            }
        }

        info!(cycles = self.cycle_count, "Shutting down");
        Ok(())
    }

    /// Run one fetch-then-persist cycle.
    ///
    /// The timestamp is captured once, before the fetch, and used for
    /// every row written in this cycle.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) -> AppResult<CycleOutcome> {
        let timestamp = CycleTimestamp::now();
        self.cycle_count += 1;
        debug!(cycle = self.cycle_count, datetime = %timestamp, "Starting cycle");

        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            outcome = self.client.fetch_prices() => Some(outcome),
        };

        let outcome = match fetched {
            None => CycleOutcome::Cancelled,
            Some(FetchOutcome::Skipped(reason)) => {
                Self::report_skip(&reason);
                Metrics::fetch_skipped(reason.label());
                CycleOutcome::Skipped(reason)
            }
            Some(FetchOutcome::Fetched(snapshot)) if snapshot.is_empty() => {
                info!(datetime = %timestamp, "No tracked tokens in response; nothing stored");
                CycleOutcome::Empty
            }
            Some(FetchOutcome::Fetched(snapshot)) => {
                let summary = self.persister.persist(&timestamp, &snapshot)?;
                for token in &summary.tokens_written {
                    info!(token = %token, datetime = %timestamp, "Stored price data");
                }
                Metrics::rows_written(summary.aggregate_rows, summary.tokens_written.len());
                CycleOutcome::Persisted(summary)
            }
        };

        if outcome != CycleOutcome::Cancelled {
            Metrics::cycle_completed(outcome.label(), timestamp.inner().timestamp() as f64);
        }
        Ok(outcome)
    }

    fn report_skip(reason: &SkipReason) {
        match reason {
            SkipReason::HttpStatus { status, body } => {
                warn!(status, body = %body, "Failed to fetch live prices");
            }
            SkipReason::Transport(e) => {
                warn!(error = %e, "Error fetching prices");
            }
            SkipReason::Decode(e) => {
                warn!(error = %e, "Could not decode price response");
            }
        }
    }
}
