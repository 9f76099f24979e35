//! # Identifier Value Objects
//!
//! Identifiers for liquidity sources and the tagged key that unifies them.
//!
//! A CEX venue keys its results by [`Market`]; a DEX venue keys its results by
//! [`PoolId`]. [`LiquidityKey`] is the tagged union both variants share so a
//! caller can merge curves from any number of venues into one mapping.

use super::market::Market;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a configured on-chain pool.
///
/// Holds the rendering a venue chose for the pool — typically the pool
/// contract address, or `vault:pool-id` for vault-registered pools. Stored
/// lowercase so hex addresses compare consistently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PoolId(String);

impl PoolId {
    /// Creates a new pool identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().to_lowercase())
    }

    /// Returns the identifier as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of one entry in a venue's liquidity mapping.
///
/// CEX venues produce [`LiquidityKey::Market`] entries, DEX venues produce
/// [`LiquidityKey::Pool`] entries; both can live in the same map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiquidityKey {
    /// A CEX trading pair.
    Market(Market),
    /// An on-chain pool.
    Pool(PoolId),
}

impl fmt::Display for LiquidityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market(market) => write!(f, "{market}"),
            Self::Pool(pool) => write!(f, "{pool}"),
        }
    }
}

impl From<Market> for LiquidityKey {
    fn from(market: Market) -> Self {
        Self::Market(market)
    }
}

impl From<PoolId> for LiquidityKey {
    fn from(pool: PoolId) -> Self {
        Self::Pool(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_id_lowercases() {
        let id = PoolId::new("0xAbC123");
        assert_eq!(id.as_str(), "0xabc123");
    }

    #[test]
    fn keys_of_different_kind_differ() {
        let market: LiquidityKey = Market::new("RPL", "ETH").into();
        let pool: LiquidityKey = PoolId::new("rpl/eth").into();
        assert_ne!(market, pool);
    }

    #[test]
    fn display_delegates() {
        let key: LiquidityKey = PoolId::new("0xdeadbeef").into();
        assert_eq!(key.to_string(), "0xdeadbeef");
    }
}
