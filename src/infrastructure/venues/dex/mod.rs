//! # DEX Venues
//!
//! On-chain pool liquidity.
//!
//! A [`DexVenue`] owns a set of pools behind the [`LiquidityPool`] capability:
//! one implementation per pool kind ([`weighted::WeightedPool`] for
//! constant-product vault pools, [`concentrated::ConcentratedPool`] for
//! tick-range pools). Pools re-read their on-chain state fresh on every
//! liquidity query; only token metadata is cached from construction.

pub mod concentrated;
pub mod erc20;
pub mod weighted;

use crate::domain::depth::DepthCurve;
use crate::domain::value_objects::{LiquidityKey, PoolId};
use crate::infrastructure::venues::error::VenueResult;
use crate::infrastructure::venues::traits::Venue;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::warn;

/// One on-chain liquidity pool.
///
/// Implementations expose the pool's raw spot price, its decimal-normalized
/// price, and the depth query. `liquidity` returns `Ok(None)` for pools whose
/// current state holds no usable liquidity (empty reserves, no initialized
/// ticks) — the venue omits those without treating them as failures.
#[async_trait]
pub trait LiquidityPool: Send + Sync {
    /// Returns the pool's identifier.
    fn id(&self) -> &PoolId;

    /// Reads the pool's raw spot price.
    async fn spot_price(&self) -> VenueResult<f64>;

    /// Reads the spot price adjusted for the two tokens' decimal precision.
    async fn normalized_price(&self) -> VenueResult<f64>;

    /// Reads fresh pool state and builds the depth curve.
    async fn liquidity(&self) -> VenueResult<Option<DepthCurve>>;
}

/// A DEX venue: a named set of pools queried uniformly.
pub struct DexVenue {
    /// Venue display name.
    name: String,
    /// The configured pools.
    pools: Vec<Box<dyn LiquidityPool>>,
}

impl DexVenue {
    /// Creates a venue over the given pools.
    #[must_use]
    pub fn new(name: impl Into<String>, pools: Vec<Box<dyn LiquidityPool>>) -> Self {
        Self {
            name: name.into(),
            pools,
        }
    }

    /// Returns the configured pools.
    #[inline]
    #[must_use]
    pub fn pools(&self) -> &[Box<dyn LiquidityPool>] {
        &self.pools
    }
}

#[async_trait]
impl Venue for DexVenue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get_liquidity(&self) -> HashMap<LiquidityKey, DepthCurve> {
        let mut curves = HashMap::with_capacity(self.pools.len());

        for pool in &self.pools {
            match pool.liquidity().await {
                Ok(Some(curve)) => {
                    curves.insert(LiquidityKey::Pool(pool.id().clone()), curve);
                }
                Ok(None) => {
                    warn!(venue = %self.name, pool = %pool.id(), "pool has no liquidity");
                }
                Err(error) => {
                    warn!(venue = %self.name, pool = %pool.id(), %error, "skipping pool");
                }
            }
        }

        curves
    }
}

impl std::fmt::Debug for DexVenue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DexVenue")
            .field("name", &self.name)
            .field("pools", &self.pools.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::depth::{DepthCurve, DepthProfile};
    use crate::infrastructure::venues::error::VenueError;

    struct Flat;

    impl DepthProfile for Flat {
        fn depth_at(&self, _target_price: f64) -> f64 {
            1.0
        }
    }

    enum Outcome {
        Curve,
        Empty,
        Failure,
    }

    struct FakePool {
        id: PoolId,
        outcome: Outcome,
    }

    #[async_trait]
    impl LiquidityPool for FakePool {
        fn id(&self) -> &PoolId {
            &self.id
        }

        async fn spot_price(&self) -> VenueResult<f64> {
            Ok(1.0)
        }

        async fn normalized_price(&self) -> VenueResult<f64> {
            Ok(1.0)
        }

        async fn liquidity(&self) -> VenueResult<Option<DepthCurve>> {
            match self.outcome {
                Outcome::Curve => Ok(Some(DepthCurve::new(1.0, Flat))),
                Outcome::Empty => Ok(None),
                Outcome::Failure => Err(VenueError::connection("rpc down")),
            }
        }
    }

    fn pool(id: &str, outcome: Outcome) -> Box<dyn LiquidityPool> {
        Box::new(FakePool {
            id: PoolId::new(id),
            outcome,
        })
    }

    #[tokio::test]
    async fn merges_only_pools_with_usable_state() {
        let venue = DexVenue::new(
            "TestDex",
            vec![
                pool("0xaaa", Outcome::Curve),
                pool("0xbbb", Outcome::Empty),
                pool("0xccc", Outcome::Failure),
                pool("0xddd", Outcome::Curve),
            ],
        );

        let curves = venue.get_liquidity().await;
        assert_eq!(curves.len(), 2);
        assert!(curves.contains_key(&LiquidityKey::Pool(PoolId::new("0xaaa"))));
        assert!(curves.contains_key(&LiquidityKey::Pool(PoolId::new("0xddd"))));
    }

    #[tokio::test]
    async fn all_failed_pools_yield_an_empty_mapping() {
        let venue = DexVenue::new("TestDex", vec![pool("0xaaa", Outcome::Failure)]);
        assert!(venue.get_liquidity().await.is_empty());
    }
}
