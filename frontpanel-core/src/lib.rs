//! Board-agnostic core logic for the front panel pipeline
//!
//! This crate contains everything that does not depend on a concrete
//! platform backend:
//!
//! - Luminance conversion of BGRA8 pixel blocks (SSE2 with scalar fallback)
//! - Frame pump double-buffering GPU readback into panel frames
//! - Button repeat generator turning polled masks into input events
//! - Panel descriptor validation
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod config;
pub mod input;
pub mod luminance;
pub mod screen;
