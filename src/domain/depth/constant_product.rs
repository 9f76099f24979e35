//! # Constant-Product Depth Builder
//!
//! Closed-form depth of a two-asset, equal-weight constant-product pool.
//!
//! With invariant `k = balance_0 * balance_1`, the reserve level at which the
//! pool's marginal price reaches a target is solvable directly — no search —
//! and the depth between here and there is just the token-0 reserve delta.
//!
//! # Examples
//!
//! ```
//! use depth_engine::domain::depth::{ConstantProductDepth, PoolReserves};
//!
//! let reserves = PoolReserves::new(100.0, 100.0, 0, 0);
//! let curve = ConstantProductDepth::build(&reserves).unwrap();
//!
//! assert_eq!(curve.price(), 1.0);
//! assert_eq!(curve.depth_at(1.0), 0.0);
//! // Pushing the price to 4x moves the token-0 reserve from 100 to 200.
//! assert!((curve.depth_at(4.0) - 100.0).abs() < 1e-9);
//! ```

use super::curve::{DepthCurve, DepthProfile};
use crate::domain::errors::{DepthError, DepthResult};
use crate::domain::value_objects::token::decimal_factor;

/// Raw reserve snapshot of a two-asset pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolReserves {
    /// Token-0 reserve in raw units.
    pub balance_0: f64,
    /// Token-1 reserve in raw units.
    pub balance_1: f64,
    /// Token-0 decimal precision.
    pub decimals_0: u8,
    /// Token-1 decimal precision.
    pub decimals_1: u8,
}

impl PoolReserves {
    /// Creates a reserve snapshot.
    #[must_use]
    pub fn new(balance_0: f64, balance_1: f64, decimals_0: u8, decimals_1: u8) -> Self {
        Self {
            balance_0,
            balance_1,
            decimals_0,
            decimals_1,
        }
    }
}

/// Depth profile of a constant-product pool.
#[derive(Debug, Clone)]
pub struct ConstantProductDepth {
    /// Token-0 reserve at snapshot time, raw units.
    balance_0: f64,
    /// Constant-product invariant `balance_0 * balance_1`.
    invariant: f64,
    /// Decimal-normalization factor `10^(decimals_1 - decimals_0)`.
    balance_norm: f64,
    /// Divisor converting raw token-0 units to human units.
    scale_0: f64,
}

impl ConstantProductDepth {
    /// Builds a depth curve from a reserve snapshot.
    ///
    /// The curve's reference price is the decimal-normalized reserve ratio
    /// `balance_norm * balance_0 / balance_1`; depth is reported in human
    /// token-0 units. Assumes equal pool weights and reports liquidity in
    /// token 0.
    ///
    /// # Errors
    ///
    /// Returns [`DepthError::EmptyReserves`] if either reserve is zero.
    pub fn build(reserves: &PoolReserves) -> DepthResult<DepthCurve> {
        if reserves.balance_0 == 0.0 || reserves.balance_1 == 0.0 {
            return Err(DepthError::EmptyReserves);
        }

        let balance_norm = decimal_factor(reserves.decimals_1, reserves.decimals_0);
        let price = balance_norm * reserves.balance_0 / reserves.balance_1;
        let profile = Self {
            balance_0: reserves.balance_0,
            invariant: reserves.balance_0 * reserves.balance_1,
            balance_norm,
            scale_0: 10f64.powi(i32::from(reserves.decimals_0)),
        };
        Ok(DepthCurve::new(price, profile))
    }
}

impl DepthProfile for ConstantProductDepth {
    fn depth_at(&self, target_price: f64) -> f64 {
        let new_balance_0 = (target_price * self.invariant / self.balance_norm).sqrt();
        (new_balance_0 - self.balance_0).abs() / self.scale_0
    }
}
