//! # Application Layer
//!
//! Cross-cutting services used by the venue fetch paths.

pub mod services;
