//! # Domain Errors
//!
//! Error types for the depth-curve builders.

pub mod depth_error;

pub use depth_error::{BookSide, DepthError, DepthResult};
