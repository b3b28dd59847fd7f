//! Core domain types for the pricelog poller.
//!
//! - `TokenId`, `TokenList`: the fixed set of tracked tokens
//! - `Price`: precision-safe decimal price
//! - `PriceRecord`, `PriceSnapshot`: one fetch worth of upstream data
//! - `CycleTimestamp`: the instant stamped on every row of a cycle

pub mod decimal;
pub mod error;
pub mod token;
pub mod types;

pub use decimal::Price;
pub use error::{CoreError, Result};
pub use token::{TokenId, TokenList};
pub use types::{CycleTimestamp, PriceRecord, PriceSnapshot};
