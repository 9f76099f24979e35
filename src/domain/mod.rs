//! # Domain Layer
//!
//! The depth-curve engine and its value objects.
//!
//! This layer contains:
//! - **Depth**: the [`depth::DepthCurve`] value object and the three builders
//!   that produce one (order book, constant-product pool, tick-range pool)
//! - **Value Objects**: immutable types with validation ([`value_objects::Market`],
//!   [`value_objects::PoolId`], [`value_objects::Token`]) and the tick math
//! - **Errors**: the no-liquidity taxonomy ([`errors::DepthError`])
//!
//! Everything in this layer is pure and synchronous: builders consume
//! snapshots that the infrastructure layer has already fetched.

pub mod depth;
pub mod errors;
pub mod value_objects;
