//! Widget hosting abstractions for the front panel screen
//!
//! This crate provides:
//! - `WidgetSurface` trait for UI roots that can render into an offscreen target
//! - `KeyEvent` / `Reply` for routing key input to the hosted widget
//! - `VirtualWindow` owning the widget, its size and its pending re-layout
//! - `HitTestGrid` rebuilt on every render
//!
//! # Architecture
//!
//! The widget tree itself lives in the host application. The session hands
//! the window a render target once per tick; the window forwards it to the
//! widget together with a cleared hit-test grid and the panel size. The
//! render target type is left generic so any readback backend can be used.

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod geometry;
pub mod input;
pub mod widget;
pub mod window;

// Re-export key types
pub use geometry::{Rect, Size};
pub use hit_test::{HitTestGrid, WidgetId};
pub use input::{Key, KeyEvent, Reply};
pub use widget::WidgetSurface;
pub use window::VirtualWindow;
