//! # Infrastructure Layer
//!
//! External adapters feeding the depth builders.
//!
//! ## Venues
//!
//! - CEX order-book venues driven by per-exchange adapters over HTTP
//! - DEX pool venues driven by an `ethers`-backed contract read client with
//!   a batched multicall primitive

pub mod venues;
