//! Application error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] pricelog_core::CoreError),

    #[error("Feed error: {0}")]
    Feed(#[from] pricelog_feed::FeedError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] pricelog_persistence::PersistenceError),

    #[error("Telemetry error: {0}")]
    Telemetry(#[from] pricelog_telemetry::TelemetryError),
}

pub type AppResult<T> = Result<T, AppError>;
