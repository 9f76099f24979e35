//! # CEX Venues
//!
//! Order-book liquidity from centralized exchanges.
//!
//! [`CexVenue`] is the single generic implementation: it drives any
//! [`OrderBookAdapter`] through the shared HTTP client, retries transient
//! fetch failures, hands the parsed book to the order-book depth builder, and
//! skips markets that come back empty or broken.

pub mod exchanges;

use crate::application::services::retry::{execute_with_retry, RetryPolicy};
use crate::domain::depth::{DepthCurve, OrderBook, OrderBookDepth};
use crate::domain::value_objects::{LiquidityKey, Market};
use crate::infrastructure::venues::error::VenueResult;
use crate::infrastructure::venues::http_client::HttpClient;
use crate::infrastructure::venues::traits::{OrderBookAdapter, Venue};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, warn};

/// A centralized exchange with a set of configured markets.
pub struct CexVenue {
    /// The exchange's endpoint/field-mapping adapter.
    adapter: Box<dyn OrderBookAdapter>,
    /// Markets to query, one major asset against several minors.
    markets: Vec<Market>,
    /// Shared HTTP client.
    http: HttpClient,
    /// Retry policy around each order-book fetch.
    retry: RetryPolicy,
}

impl CexVenue {
    /// Creates a venue querying `major` against each of `minors`.
    #[must_use]
    pub fn new(
        adapter: Box<dyn OrderBookAdapter>,
        major: &str,
        minors: &[&str],
        http: HttpClient,
    ) -> Self {
        let markets = minors
            .iter()
            .map(|minor| Market::new(major, minor))
            .collect();
        Self {
            adapter,
            markets,
            http,
            retry: RetryPolicy::default(),
        }
    }

    /// Replaces the retry policy used around order-book fetches.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the configured markets.
    #[inline]
    #[must_use]
    pub fn markets(&self) -> &[Market] {
        &self.markets
    }

    /// Fetches and parses one market's order book, retrying transient
    /// failures.
    ///
    /// # Errors
    ///
    /// Returns the final `VenueError` once the retry budget is exhausted or a
    /// permanent error occurs.
    async fn fetch_order_book(&self, market: &Market) -> VenueResult<OrderBook> {
        let url = format!(
            "{}{}",
            self.adapter.api_base_url(),
            self.adapter.request_path(market)
        );
        let params = self.adapter.request_params(market);

        let response = execute_with_retry(&self.retry, || self.http.get_json(&url, &params))
            .await
            .map_err(super::error::VenueError::from_retry)?;
        debug!(venue = self.adapter.name(), %market, "fetched order book");

        let bids = self.adapter.parse_bids(&response)?;
        let asks = self.adapter.parse_asks(&response)?;
        Ok(OrderBook::new(bids, asks))
    }

    /// Builds one market's depth curve, or `None` if the book is unusable.
    async fn market_liquidity(&self, market: &Market) -> VenueResult<Option<DepthCurve>> {
        let book = self.fetch_order_book(market).await?;
        match OrderBookDepth::build(&book) {
            Ok(curve) => Ok(Some(curve)),
            Err(reason) => {
                warn!(venue = self.adapter.name(), %market, %reason, "empty order book");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl Venue for CexVenue {
    fn name(&self) -> &str {
        self.adapter.name()
    }

    async fn get_liquidity(&self) -> HashMap<LiquidityKey, DepthCurve> {
        let mut curves = HashMap::with_capacity(self.markets.len());

        for market in &self.markets {
            match self.market_liquidity(market).await {
                Ok(Some(curve)) => {
                    curves.insert(LiquidityKey::Market(market.clone()), curve);
                }
                Ok(None) => {}
                Err(error) => {
                    warn!(
                        venue = self.adapter.name(),
                        %market,
                        %error,
                        "skipping market"
                    );
                }
            }
        }

        curves
    }
}

impl std::fmt::Debug for CexVenue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CexVenue")
            .field("name", &self.adapter.name())
            .field("markets", &self.markets)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::venues::cex::exchanges::Binance;

    #[test]
    fn markets_are_built_from_major_and_minors() {
        let venue = CexVenue::new(
            Box::new(Binance),
            "rpl",
            &["usdt", "btc"],
            HttpClient::new().expect("client"),
        );
        assert_eq!(venue.markets().len(), 2);
        assert!(venue.markets().contains(&Market::new("RPL", "USDT")));
        assert!(venue.markets().contains(&Market::new("RPL", "BTC")));
        assert_eq!(venue.name(), "Binance");
    }
}
