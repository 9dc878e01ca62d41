//! Data models
//!
//! Shared between the board client and anything else talking to the
//! back-office API.

pub mod order;
pub mod product;

// Re-exports
pub use order::*;
pub use product::*;
