//! Minute-aligned token price logger.
//!
//! Orchestrates the components:
//! - scheduling on minute boundaries
//! - fetching prices for the configured tokens
//! - appending aggregate and per-token records to disk

pub mod app;
pub mod config;
pub mod error;
pub mod scheduler;

pub use app::{Application, CycleOutcome};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
