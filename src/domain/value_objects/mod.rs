//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`Market`]: CEX trading pair (major/minor symbols)
//! - [`PoolId`]: opaque identifier of a configured on-chain pool
//! - [`LiquidityKey`]: tagged key unifying both in one result mapping
//!
//! ## Token Types
//!
//! - [`Token`]: ERC-20 metadata (address, symbol, decimals)
//!
//! ## Tick Math
//!
//! - [`tick`]: price/tick conversions and bitmap word coordinates for
//!   concentrated-liquidity pools

pub mod ids;
pub mod market;
pub mod tick;
pub mod token;

pub use ids::{LiquidityKey, PoolId};
pub use market::Market;
pub use token::Token;
