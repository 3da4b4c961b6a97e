//! Configuration types
//!
//! Board-agnostic settings for input repeat and the screen. Loading them from
//! a file is left to the session crate.

pub mod types;

pub use types::*;
