//! Token price fetching.
//!
//! Polls the price endpoint for a fixed token list and reports each
//! attempt as a typed `FetchOutcome` instead of an error.

pub mod client;
pub mod error;
pub mod outcome;
pub mod response;

pub use client::{PriceClient, PriceClientConfig, DEFAULT_PRICE_URL};
pub use error::{FeedError, FeedResult};
pub use outcome::{FetchOutcome, SkipReason};
pub use response::parse_price_response;
