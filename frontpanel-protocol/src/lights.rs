//! Button lights
//!
//! Each of the five face buttons has a light next to it.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of lights on the panel
pub const LIGHT_COUNT: usize = 5;

const LIGHT_1: u32 = 0x01;
const LIGHT_2: u32 = 0x02;
const LIGHT_3: u32 = 0x04;
const LIGHT_4: u32 = 0x08;
const LIGHT_5: u32 = 0x10;

const ALL_BITS: u32 = 0x1F;

/// Light identified by the face button it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum PanelLight {
    Button1 = 0,
    Button2 = 1,
    Button3 = 2,
    Button4 = 3,
    Button5 = 4,
}

impl PanelLight {
    /// All lights in index order
    pub const ALL: [PanelLight; LIGHT_COUNT] = [
        PanelLight::Button1,
        PanelLight::Button2,
        PanelLight::Button3,
        PanelLight::Button4,
        PanelLight::Button5,
    ];

    /// Bit for this light in the device mask
    pub const fn mask_bit(self) -> u32 {
        match self {
            PanelLight::Button1 => LIGHT_1,
            PanelLight::Button2 => LIGHT_2,
            PanelLight::Button3 => LIGHT_3,
            PanelLight::Button4 => LIGHT_4,
            PanelLight::Button5 => LIGHT_5,
        }
    }

    /// Light at an index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Snapshot of which lights are lit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightMask(u32);

impl LightMask {
    /// All lights off
    pub const NONE: Self = Self(0);

    /// Build from a raw device mask, dropping unknown bits
    pub const fn from_bits_truncate(raw: u32) -> Self {
        Self(raw & ALL_BITS)
    }

    /// Raw mask value
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check if a light is lit
    pub const fn contains(self, light: PanelLight) -> bool {
        self.0 & light.mask_bit() != 0
    }

    /// Copy with one light switched on or off
    pub const fn with_light(self, light: PanelLight, on: bool) -> Self {
        if on {
            Self(self.0 | light.mask_bit())
        } else {
            Self(self.0 & !light.mask_bit())
        }
    }
}
