//! # Depth Engine
//!
//! Cross-venue liquidity depth aggregation for a token traded on centralized
//! order-book exchanges (CEX) and on-chain AMM pools (DEX).
//!
//! Every venue, whatever the shape of its raw data — an order book, a pair of
//! pool reserves, or a sparse set of concentrated-liquidity ticks — is reduced
//! to the same contract: a [`DepthCurve`](domain::depth::DepthCurve) holding
//! the reference price at snapshot time and a pure `depth_at(price)` query
//! returning the cumulative volume tradable between the current price and the
//! target.
//!
//! ## Architecture
//!
//! The crate follows a layered layout:
//!
//! - **Domain Layer** (`domain`): the depth-curve builders and the value
//!   objects they operate on. Builders are pure, synchronous functions over
//!   already-fetched snapshots and never perform I/O.
//! - **Application Layer** (`application`): cross-cutting services, currently
//!   the bounded retry policy used around venue fetches.
//! - **Infrastructure Layer** (`infrastructure`): venue adapters — the HTTP
//!   order-book fetch path for exchanges and the `ethers`-backed contract
//!   read client (with batched multicall) for pools.
//!
//! ## Example
//!
//! ```rust,ignore
//! use depth_engine::infrastructure::venues::cex::{CexVenue, exchanges::Binance};
//! use depth_engine::infrastructure::venues::traits::Venue;
//!
//! let venue = CexVenue::new(Box::new(Binance), "RPL", &["USDT", "BTC"], http);
//! for (key, curve) in venue.get_liquidity().await {
//!     println!("{key}: {} deep at -5%", curve.depth_at(curve.price() * 0.95));
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
