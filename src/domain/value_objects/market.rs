//! # Market Value Object
//!
//! CEX trading pair representation.
//!
//! This module provides the [`Market`] type identifying a trading pair on a
//! centralized exchange by its major (base) and minor (quote) asset symbols.
//!
//! # Examples
//!
//! ```
//! use depth_engine::domain::value_objects::Market;
//!
//! let market = Market::new("rpl", "usdt");
//! assert_eq!(market.major(), "RPL");
//! assert_eq!(market.minor(), "USDT");
//! assert_eq!(market.to_string(), "RPL/USDT");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// A CEX trading pair.
///
/// Immutable value object; equality and hashing are by field. Symbols are
/// normalized to uppercase at construction so that `Market::new("rpl", "usdt")`
/// and `Market::new("RPL", "USDT")` identify the same pair.
///
/// Order-book sizes handled by the depth builders are denominated in the
/// major asset; cumulative depth is reported as minor-asset notional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    /// Major (base) asset symbol, uppercase.
    major: String,
    /// Minor (quote) asset symbol, uppercase.
    minor: String,
}

impl Market {
    /// Creates a new market, normalizing both symbols to uppercase.
    #[must_use]
    pub fn new(major: impl AsRef<str>, minor: impl AsRef<str>) -> Self {
        Self {
            major: major.as_ref().to_uppercase(),
            minor: minor.as_ref().to_uppercase(),
        }
    }

    /// Returns the major (base) asset symbol.
    #[inline]
    #[must_use]
    pub fn major(&self) -> &str {
        &self.major
    }

    /// Returns the minor (quote) asset symbol.
    #[inline]
    #[must_use]
    pub fn minor(&self) -> &str {
        &self.minor
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.major, self.minor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn normalizes_to_uppercase() {
        let market = Market::new("rpl", "usdt");
        assert_eq!(market.major(), "RPL");
        assert_eq!(market.minor(), "USDT");
    }

    #[test]
    fn equality_ignores_input_case() {
        assert_eq!(Market::new("rpl", "eth"), Market::new("RPL", "ETH"));
    }

    #[test]
    fn usable_as_hash_key() {
        let mut set = HashSet::new();
        set.insert(Market::new("RPL", "USDT"));
        set.insert(Market::new("rpl", "usdt"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn display_format() {
        assert_eq!(Market::new("RPL", "BTC").to_string(), "RPL/BTC");
    }
}
