//! # Depth Curves
//!
//! The uniform "depth-at-price" contract and the builders that produce it.
//!
//! A [`DepthCurve`] answers one question for one liquidity source: given a
//! target price, how much volume is tradable between the current mid-price
//! and that target? Three builders normalize three very different data shapes
//! into that contract:
//!
//! - [`order_book::OrderBookDepth`]: cumulative sums + binary search over a
//!   sorted CEX order book
//! - [`constant_product::ConstantProductDepth`]: closed-form depth of a
//!   two-asset constant-product pool
//! - [`tick_range::TickRangeDepth`]: outward tick walk + interpolation over a
//!   concentrated-liquidity pool's sparse tick state
//!
//! All builders consume immutable snapshots and perform no I/O; a curve's
//! query is deterministic for the lifetime of the curve.

pub mod constant_product;
pub mod curve;
pub mod order_book;
pub mod tick_range;

pub use constant_product::{ConstantProductDepth, PoolReserves};
pub use curve::{DepthCurve, DepthProfile};
pub use order_book::{OrderBook, OrderBookDepth};
pub use tick_range::{TickRangeDepth, TickRangeSnapshot};
