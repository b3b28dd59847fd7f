//! HTTP client for the token price endpoint.
//!
//! Issues one GET per cycle with every tracked token in a single `ids`
//! parameter and turns whatever comes back into a `FetchOutcome`.

use crate::error::{FeedError, FeedResult};
use crate::outcome::{FetchOutcome, SkipReason};
use crate::response::parse_price_response;
use pricelog_core::TokenList;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

/// Default price endpoint (Jupiter Price API v2).
pub const DEFAULT_PRICE_URL: &str = "https://api.jup.ag/price/v2";

/// Price client settings.
#[derive(Debug, Clone)]
pub struct PriceClientConfig {
    /// Endpoint URL, without query string.
    pub price_url: String,
    /// Value of the `showExtraInfo` query flag.
    pub show_extra_info: bool,
    /// Whole-request timeout. `None` leaves the HTTP client's default in place.
    pub request_timeout: Option<Duration>,
}

impl Default for PriceClientConfig {
    fn default() -> Self {
        Self {
            price_url: DEFAULT_PRICE_URL.to_string(),
            show_extra_info: true,
            request_timeout: None,
        }
    }
}

/// Client for fetching token prices.
pub struct PriceClient {
    /// HTTP client.
    client: Client,
    /// Endpoint URL.
    price_url: String,
    /// Tokens requested on every fetch.
    tokens: TokenList,
    show_extra_info: bool,
}

impl PriceClient {
    /// Create a new price client for a fixed token list.
    pub fn new(config: PriceClientConfig, tokens: TokenList) -> FeedResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| FeedError::HttpClient(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            price_url: config.price_url,
            tokens,
            show_extra_info: config.show_extra_info,
        })
    }

    pub fn tokens(&self) -> &TokenList {
        &self.tokens
    }

    /// Query parameters for the price request.
    fn query_params(&self) -> [(&'static str, String); 2] {
        [
            ("ids", self.tokens.joined()),
            ("showExtraInfo", self.show_extra_info.to_string()),
        ]
    }

    /// Fetch current prices for all tracked tokens.
    ///
    /// Never retries. Any failure is reported as `FetchOutcome::Skipped`.
    pub async fn fetch_prices(&self) -> FetchOutcome {
        debug!(url = %self.price_url, tokens = self.tokens.len(), "Fetching prices");

        let response = match self
            .client
            .get(&self.price_url)
            .query(&self.query_params())
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => return FetchOutcome::Skipped(SkipReason::Transport(e.to_string())),
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return FetchOutcome::Skipped(SkipReason::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = match response.text().await {
            Ok(b) => b,
            Err(e) => {
                return FetchOutcome::Skipped(SkipReason::Transport(format!(
                    "Failed to read response body: {e}"
                )))
            }
        };

        match parse_price_response(&self.tokens, &body) {
            Ok(snapshot) => {
                info!(
                    requested = self.tokens.len(),
                    received = snapshot.len(),
                    "Fetched prices"
                );
                FetchOutcome::Fetched(snapshot)
            }
            Err(e) => FetchOutcome::Skipped(SkipReason::Decode(e.to_string())),
        }
    }
}
