//! # Token Value Object
//!
//! ERC-20 token metadata.
//!
//! Pools read a token's symbol and decimal precision once at construction and
//! treat them as immutable afterwards; every depth calculation that converts
//! raw on-chain integers into human units goes through [`Token::unit_scale`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// ERC-20 token metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Token contract address (0x-prefixed hex).
    address: String,
    /// Token symbol (e.g., "WETH").
    symbol: String,
    /// Decimal precision of the token's smallest unit.
    decimals: u8,
}

impl Token {
    /// Creates a new token descriptor.
    #[must_use]
    pub fn new(address: impl Into<String>, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            address: address.into(),
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Returns the token contract address.
    #[inline]
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the token symbol.
    #[inline]
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the token's decimal precision.
    #[inline]
    #[must_use]
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Returns `10^decimals`, the divisor converting raw units to human units.
    #[must_use]
    pub fn unit_scale(&self) -> f64 {
        10f64.powi(i32::from(self.decimals))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}

/// Returns `10^(decimals_a - decimals_b)`.
///
/// The decimal-normalization factor between two tokens' raw-unit scales; used
/// by both pool kinds to move between raw reserve ratios and human prices.
#[must_use]
pub fn decimal_factor(decimals_a: u8, decimals_b: u8) -> f64 {
    10f64.powi(i32::from(decimals_a) - i32::from(decimals_b))
}
