//! # Depth Errors
//!
//! The empty-state taxonomy of the depth builders.
//!
//! Every variant here means "this market or pool has no usable liquidity
//! right now". Venues treat these as a signal to omit the entry from their
//! result mapping, never as a reason to abort sibling lookups.

use std::fmt;
use thiserror::Error;

/// One side of an order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookSide {
    /// The buy side.
    Bids,
    /// The sell side.
    Asks,
}

impl fmt::Display for BookSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bids => write!(f, "bid"),
            Self::Asks => write!(f, "ask"),
        }
    }
}

/// Reasons a depth builder produces no curve.
///
/// Builders are total over valid-shaped input: the only failure mode is an
/// empty snapshot, reported through one of these variants rather than a
/// fabricated zero-depth curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DepthError {
    /// An order book is missing all levels on one side.
    #[error("order book has no {0} levels")]
    EmptyBook(BookSide),

    /// A constant-product pool has a zero reserve.
    #[error("pool has an empty reserve")]
    EmptyReserves,

    /// No initialized ticks were found in the scanned bitmap window.
    #[error("no initialized ticks in the scanned window")]
    NoInitializedTicks,
}

/// Result type for depth builders.
pub type DepthResult<T> = Result<T, DepthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_side() {
        assert_eq!(
            DepthError::EmptyBook(BookSide::Asks).to_string(),
            "order book has no ask levels"
        );
        assert_eq!(
            DepthError::EmptyBook(BookSide::Bids).to_string(),
            "order book has no bid levels"
        );
    }
}
