//! Panel screen: descriptor validation and frame pump

pub mod descriptor;
pub mod pump;

pub use descriptor::{PanelDescriptor, ScreenError};
pub use pump::{CycleReport, FramePump, PresentOutcome, SLOT_COUNT};
