//! Input events generated from the button mask

use crate::buttons::PanelButton;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Button event delivered to the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ButtonEvent {
    /// Button went down (`repeat = false`) or is held and due to repeat
    Press { button: PanelButton, repeat: bool },
    /// Button went up
    Release { button: PanelButton },
}

impl ButtonEvent {
    /// Button the event refers to
    pub fn button(&self) -> PanelButton {
        match self {
            ButtonEvent::Press { button, .. } | ButtonEvent::Release { button } => *button,
        }
    }

    /// Returns true for presses, including repeats
    pub fn is_press(&self) -> bool {
        matches!(self, ButtonEvent::Press { .. })
    }

    /// Returns true for held-button repeats
    pub fn is_repeat(&self) -> bool {
        matches!(self, ButtonEvent::Press { repeat: true, .. })
    }
}
