//! Front panel button, light and event definitions
//!
//! This crate describes the device-side bit layouts and the logical
//! identifiers the rest of the pipeline uses:
//!
//! ```text
//! bit:   9      8    7   6     5    4  3  2  1  0
//!      ┌──────┬────┬───┬─────┬────┬──┬──┬──┬──┬──┐
//!      │SELECT│DOWN│UP │RIGHT│LEFT│B5│B4│B3│B2│B1│   button mask
//!      └──────┴────┴───┴─────┴────┴──┴──┴──┴──┴──┘
//! ```
//!
//! Logical buttons are a static table ([`PanelButton::ALL`]), so nothing has
//! to be registered at runtime before events can flow.

#![no_std]
#![deny(unsafe_code)]

pub mod buttons;
pub mod events;
pub mod lights;

pub use buttons::{ButtonMask, PanelButton, BUTTON_COUNT};
pub use events::ButtonEvent;
pub use lights::{LightMask, PanelLight, LIGHT_COUNT};
