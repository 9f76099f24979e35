//! # Depth Curve Value Object
//!
//! Reference price plus a pure depth-at-price query.
//!
//! # Examples
//!
//! ```
//! use depth_engine::domain::depth::{DepthCurve, DepthProfile};
//!
//! struct Flat(f64);
//!
//! impl DepthProfile for Flat {
//!     fn depth_at(&self, _target_price: f64) -> f64 {
//!         self.0
//!     }
//! }
//!
//! let curve = DepthCurve::new(100.5, Flat(42.0));
//! assert_eq!(curve.price(), 100.5);
//! assert_eq!(curve.depth_at(99.0), 42.0);
//! ```

use std::fmt;

/// Depth profile of one liquidity source.
///
/// Implementations hold the immutable arrays a builder derived from its
/// snapshot and answer [`DepthProfile::depth_at`] statelessly. Calling the
/// query twice with the same price must return the same value; returned
/// volumes are always ≥ 0.
pub trait DepthProfile: Send + Sync {
    /// Returns the cumulative volume tradable between the snapshot's current
    /// price and `target_price`.
    fn depth_at(&self, target_price: f64) -> f64;
}

/// A liquidity source's depth curve: reference price + depth query.
///
/// The reference price is the source's mid/spot price at snapshot time. The
/// curve owns its profile; the profile's arrays are never mutated after
/// construction, so a curve can be shared freely across threads.
pub struct DepthCurve {
    /// Reference price at snapshot time.
    price: f64,
    /// The profile answering depth queries.
    profile: Box<dyn DepthProfile>,
}

impl DepthCurve {
    /// Creates a curve from a reference price and a depth profile.
    #[must_use]
    pub fn new(price: f64, profile: impl DepthProfile + 'static) -> Self {
        Self {
            price,
            profile: Box::new(profile),
        }
    }

    /// Returns the reference price at snapshot time.
    #[inline]
    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Returns the cumulative volume tradable between the reference price and
    /// `target_price`.
    #[must_use]
    pub fn depth_at(&self, target_price: f64) -> f64 {
        self.profile.depth_at(target_price)
    }
}

impl fmt::Debug for DepthCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepthCurve")
            .field("price", &self.price)
            .finish_non_exhaustive()
    }
}
