//! # Order-Book Depth Builder
//!
//! Cumulative-sum depth over a sorted CEX order book.
//!
//! The builder sorts the book once (bids descending, asks ascending),
//! precomputes cumulative minor-asset notional per side, and answers depth
//! queries with a binary search into those arrays. Depth is 0 strictly inside
//! the spread and monotonically non-decreasing as the target price moves away
//! from the spread in either direction.
//!
//! # Examples
//!
//! ```
//! use depth_engine::domain::depth::{OrderBook, OrderBookDepth};
//!
//! let book = OrderBook::new(
//!     [(100.0, 1.0), (99.0, 2.0)],
//!     [(101.0, 1.0), (102.0, 2.0)],
//! );
//! let curve = OrderBookDepth::build(&book).unwrap();
//!
//! assert_eq!(curve.price(), 100.5);
//! assert_eq!(curve.depth_at(100.5), 0.0);
//! assert_eq!(curve.depth_at(99.0), 100.0 * 1.0 + 99.0 * 2.0);
//! ```

use super::curve::{DepthCurve, DepthProfile};
use crate::domain::errors::{BookSide, DepthError, DepthResult};

/// A snapshot of one market's order book.
///
/// Levels are `(price, size)` with sizes denominated in the major asset.
/// Sort order is established at construction and never changes: bids
/// descending, asks ascending by price.
#[derive(Debug, Clone, Default)]
pub struct OrderBook {
    /// Bid levels, best (highest) price first.
    bids: Vec<(f64, f64)>,
    /// Ask levels, best (lowest) price first.
    asks: Vec<(f64, f64)>,
}

impl OrderBook {
    /// Creates a book from unsorted bid and ask levels.
    #[must_use]
    pub fn new(
        bids: impl IntoIterator<Item = (f64, f64)>,
        asks: impl IntoIterator<Item = (f64, f64)>,
    ) -> Self {
        let mut bids: Vec<_> = bids.into_iter().collect();
        let mut asks: Vec<_> = asks.into_iter().collect();
        bids.sort_by(|a, b| b.0.total_cmp(&a.0));
        asks.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { bids, asks }
    }

    /// Returns the bid levels, best price first.
    #[inline]
    #[must_use]
    pub fn bids(&self) -> &[(f64, f64)] {
        &self.bids
    }

    /// Returns the ask levels, best price first.
    #[inline]
    #[must_use]
    pub fn asks(&self) -> &[(f64, f64)] {
        &self.asks
    }

    /// Returns the best (highest) bid price, if any.
    #[must_use]
    pub fn best_bid(&self) -> Option<f64> {
        self.bids.first().map(|&(price, _)| price)
    }

    /// Returns the best (lowest) ask price, if any.
    #[must_use]
    pub fn best_ask(&self) -> Option<f64> {
        self.asks.first().map(|&(price, _)| price)
    }
}

/// Depth profile of an order book.
///
/// Holds the sorted price arrays and the cumulative minor-asset notional per
/// side, computed once at build time.
#[derive(Debug, Clone)]
pub struct OrderBookDepth {
    /// Bid prices, descending.
    bid_prices: Vec<f64>,
    /// Cumulative bid notional, parallel to `bid_prices`.
    bid_liquidity: Vec<f64>,
    /// Ask prices, ascending.
    ask_prices: Vec<f64>,
    /// Cumulative ask notional, parallel to `ask_prices`.
    ask_liquidity: Vec<f64>,
    /// Best bid price.
    best_bid: f64,
    /// Best ask price.
    best_ask: f64,
}

impl OrderBookDepth {
    /// Builds a depth curve from an order book snapshot.
    ///
    /// The curve's reference price is the midpoint of best bid and best ask.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::EmptyBook`] if either side of the book has no
    /// levels; a one-sided book has no usable liquidity.
    pub fn build(book: &OrderBook) -> DepthResult<DepthCurve> {
        let best_bid = book
            .best_bid()
            .ok_or(DepthError::EmptyBook(BookSide::Bids))?;
        let best_ask = book
            .best_ask()
            .ok_or(DepthError::EmptyBook(BookSide::Asks))?;

        let (bid_prices, bid_liquidity) = cumulative_notional(book.bids());
        let (ask_prices, ask_liquidity) = cumulative_notional(book.asks());

        let price = (best_bid + best_ask) / 2.0;
        let profile = Self {
            bid_prices,
            bid_liquidity,
            ask_prices,
            ask_liquidity,
            best_bid,
            best_ask,
        };
        Ok(DepthCurve::new(price, profile))
    }
}

impl DepthProfile for OrderBookDepth {
    fn depth_at(&self, target_price: f64) -> f64 {
        if target_price.is_nan() {
            return 0.0;
        }
        if self.best_bid < target_price && target_price < self.best_ask {
            return 0.0;
        }

        if target_price <= self.best_bid {
            // Count of bid levels consumed walking down to the target,
            // target price inclusive.
            let i = self.bid_prices.partition_point(|&level| level >= target_price);
            self.bid_liquidity[i.min(self.bid_liquidity.len()) - 1]
        } else {
            let i = self.ask_prices.partition_point(|&level| level <= target_price);
            self.ask_liquidity[i.min(self.ask_liquidity.len()) - 1]
        }
    }
}

/// Splits sorted levels into a price array and the running minor-asset
/// notional (`Σ price * size`) over them.
fn cumulative_notional(levels: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    let prices = levels.iter().map(|&(price, _)| price).collect();
    let mut running = 0.0;
    let liquidity = levels
        .iter()
        .map(|&(price, size)| {
            running += price * size;
            running
        })
        .collect();
    (prices, liquidity)
}
