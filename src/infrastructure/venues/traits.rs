//! # Venue Traits
//!
//! The capability seams of the venue layer.
//!
//! [`Venue`] is the uniform surface both venue kinds expose to callers;
//! [`OrderBookAdapter`] is the per-exchange capability the generic CEX venue
//! is parameterized with — one small implementation per exchange describing
//! its endpoint and field mapping, nothing more.

use crate::domain::depth::DepthCurve;
use crate::domain::value_objects::{LiquidityKey, Market};
use crate::infrastructure::venues::error::VenueResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

/// A liquidity venue: CEX or DEX.
///
/// `get_liquidity` fetches fresh state for every configured market or pool,
/// builds a depth curve per entry, and merges the successes into one mapping.
/// Entries with empty state or failed fetches are omitted; a single noisy
/// source degrades coverage, never availability.
#[async_trait]
pub trait Venue: Send + Sync {
    /// Returns the venue's display name.
    fn name(&self) -> &str;

    /// Fetches and builds depth curves for every configured market/pool.
    async fn get_liquidity(&self) -> HashMap<LiquidityKey, DepthCurve>;
}

/// Endpoint description and field mapping for one exchange's order-book API.
///
/// Implementations are stateless descriptors; the generic CEX venue owns the
/// HTTP client, the retry policy, and the depth construction.
pub trait OrderBookAdapter: Send + Sync {
    /// Returns the exchange's display name.
    fn name(&self) -> &str;

    /// Returns the API base URL.
    fn api_base_url(&self) -> &str;

    /// Returns the request path for a market's order-book endpoint.
    fn request_path(&self, market: &Market) -> String;

    /// Returns the query parameters for a market's order-book request.
    fn request_params(&self, market: &Market) -> Vec<(String, String)>;

    /// Extracts `(price, size)` bid levels from the venue's JSON response,
    /// sizes denominated in the major asset.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Protocol` if the expected fields are missing or
    /// malformed.
    fn parse_bids(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>>;

    /// Extracts `(price, size)` ask levels from the venue's JSON response.
    ///
    /// # Errors
    ///
    /// Returns `VenueError::Protocol` if the expected fields are missing or
    /// malformed.
    fn parse_asks(&self, response: &Value) -> VenueResult<Vec<(f64, f64)>>;
}
