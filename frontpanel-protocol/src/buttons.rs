//! Logical buttons and the device button mask

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of logical buttons on the panel
pub const BUTTON_COUNT: usize = 10;

// Device mask bits
const BUTTON_1: u32 = 0x0001;
const BUTTON_2: u32 = 0x0002;
const BUTTON_3: u32 = 0x0004;
const BUTTON_4: u32 = 0x0008;
const BUTTON_5: u32 = 0x0010;
const BUTTON_LEFT: u32 = 0x0020;
const BUTTON_RIGHT: u32 = 0x0040;
const BUTTON_UP: u32 = 0x0080;
const BUTTON_DOWN: u32 = 0x0100;
const BUTTON_SELECT: u32 = 0x0200;

const ALL_BITS: u32 = 0x03FF;

/// Logical front panel button
///
/// The discriminant is the button's index into per-button state tables and
/// its position in event emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PanelButton {
    Button1 = 0,
    Button2 = 1,
    Button3 = 2,
    Button4 = 3,
    Button5 = 4,
    DPadLeft = 5,
    DPadRight = 6,
    DPadUp = 7,
    DPadDown = 8,
    /// Pressing the directional pad in
    DPadPress = 9,
}

impl PanelButton {
    /// All buttons in event emission order
    pub const ALL: [PanelButton; BUTTON_COUNT] = [
        PanelButton::Button1,
        PanelButton::Button2,
        PanelButton::Button3,
        PanelButton::Button4,
        PanelButton::Button5,
        PanelButton::DPadLeft,
        PanelButton::DPadRight,
        PanelButton::DPadUp,
        PanelButton::DPadDown,
        PanelButton::DPadPress,
    ];

    /// Index into per-button tables
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Button at a table index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Bit for this button in the device mask
    pub const fn mask_bit(self) -> u32 {
        match self {
            PanelButton::Button1 => BUTTON_1,
            PanelButton::Button2 => BUTTON_2,
            PanelButton::Button3 => BUTTON_3,
            PanelButton::Button4 => BUTTON_4,
            PanelButton::Button5 => BUTTON_5,
            PanelButton::DPadLeft => BUTTON_LEFT,
            PanelButton::DPadRight => BUTTON_RIGHT,
            PanelButton::DPadUp => BUTTON_UP,
            PanelButton::DPadDown => BUTTON_DOWN,
            PanelButton::DPadPress => BUTTON_SELECT,
        }
    }

    /// Stable key name used when binding the button to input actions
    pub const fn key_name(self) -> &'static str {
        match self {
            PanelButton::Button1 => "FrontPanel_Button_1",
            PanelButton::Button2 => "FrontPanel_Button_2",
            PanelButton::Button3 => "FrontPanel_Button_3",
            PanelButton::Button4 => "FrontPanel_Button_4",
            PanelButton::Button5 => "FrontPanel_Button_5",
            PanelButton::DPadLeft => "FrontPanel_DPad_Left",
            PanelButton::DPadRight => "FrontPanel_DPad_Right",
            PanelButton::DPadUp => "FrontPanel_DPad_Up",
            PanelButton::DPadDown => "FrontPanel_DPad_Down",
            PanelButton::DPadPress => "FrontPanel_DPad_Press",
        }
    }

    /// Human readable name for binding menus
    pub const fn display_name(self) -> &'static str {
        match self {
            PanelButton::Button1 => "Front Panel Button 1",
            PanelButton::Button2 => "Front Panel Button 2",
            PanelButton::Button3 => "Front Panel Button 3",
            PanelButton::Button4 => "Front Panel Button 4",
            PanelButton::Button5 => "Front Panel Button 5",
            PanelButton::DPadLeft => "Front Panel DPad Left",
            PanelButton::DPadRight => "Front Panel DPad Right",
            PanelButton::DPadUp => "Front Panel DPad Up",
            PanelButton::DPadDown => "Front Panel DPad Down",
            PanelButton::DPadPress => "Front Panel DPad Press",
        }
    }

    /// Resolve a key name back to its button
    pub fn from_key_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.key_name() == name)
    }

    /// Returns true for the five face buttons (the ones with lights)
    pub fn is_face_button(&self) -> bool {
        self.index() < 5
    }

    /// Returns true for the four directions of the pad
    pub fn is_direction(&self) -> bool {
        matches!(
            self,
            PanelButton::DPadLeft
                | PanelButton::DPadRight
                | PanelButton::DPadUp
                | PanelButton::DPadDown
        )
    }
}

/// Snapshot of which buttons are held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ButtonMask(u32);

impl ButtonMask {
    /// No buttons held
    pub const NONE: Self = Self(0);

    /// Build from a raw device mask, dropping unknown bits
    pub const fn from_bits_truncate(raw: u32) -> Self {
        Self(raw & ALL_BITS)
    }

    /// Raw mask value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if a button is held
    pub const fn contains(self, button: PanelButton) -> bool {
        self.0 & button.mask_bit() != 0
    }

    /// Mark a button as held
    pub fn insert(&mut self, button: PanelButton) {
        self.0 |= button.mask_bit();
    }

    /// Mark a button as released
    pub fn remove(&mut self, button: PanelButton) {
        self.0 &= !button.mask_bit();
    }

    /// Copy with a button added
    pub const fn with(self, button: PanelButton) -> Self {
        Self(self.0 | button.mask_bit())
    }

    /// Check if nothing is held
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterate over held buttons in emission order
    pub fn pressed(self) -> impl Iterator<Item = PanelButton> {
        PanelButton::ALL
            .into_iter()
            .filter(move |b| self.contains(*b))
    }
}

impl FromIterator<PanelButton> for ButtonMask {
    fn from_iter<I: IntoIterator<Item = PanelButton>>(iter: I) -> Self {
        let mut mask = ButtonMask::NONE;
        for button in iter {
            mask.insert(button);
        }
        mask
    }
}
