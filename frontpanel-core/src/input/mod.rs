//! Button input processing

pub mod repeat;

pub use repeat::{ButtonEvents, ButtonRepeater};
