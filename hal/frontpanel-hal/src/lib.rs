//! Front panel hardware abstraction layer
//!
//! This crate defines the driver-boundary traits the presentation and input
//! pipeline talks to. A platform backend implements them on top of the
//! console SDK; the `mock` feature provides in-memory implementations for
//! host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  frontpanel-session (simulation +       │
//! │  presentation contexts)                 │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  frontpanel-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  PanelDevice  │       │ReadbackDevice │
//! │ (screen, keys,│       │ (render target│
//! │    lights)    │       │  + staging)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`device::PanelDevice`] - Screen queries, present, buttons and lights
//! - [`readback::ReadbackDevice`] - Offscreen render target and CPU readback

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "mock")]
extern crate std;

pub mod device;
pub mod format;
pub mod readback;
pub mod surface;

#[cfg(feature = "mock")]
pub mod mock;

// Re-export key traits at crate root for convenience
pub use device::{DeviceError, PanelDevice};
pub use format::PixelFormat;
pub use readback::{Filter, ReadbackDevice, RenderTargetDesc};
pub use surface::{MappedSurface, PixelBlock, BLOCK_BYTES, BLOCK_PIXELS, BYTES_PER_PIXEL};
