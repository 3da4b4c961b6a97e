//! Panel device abstraction
//!
//! The panel device owns the physical screen, the ten buttons and the five
//! button lights. Every call reports success or failure individually; a
//! failure is never fatal to the process, only to the effect of that call.

use core::fmt;

use crate::format::PixelFormat;

/// Errors reported by the panel or readback device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The panel is not connected
    NotPresent,
    /// Driver call failed with a platform status code
    Status(u32),
}

impl DeviceError {
    /// Status code to report in logs
    ///
    /// `NotPresent` maps to the platform's "device not connected" code.
    pub fn code(&self) -> u32 {
        match self {
            DeviceError::NotPresent => 0x8007_048F,
            DeviceError::Status(code) => *code,
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::NotPresent => write!(f, "device not present ({:08X})", self.code()),
            DeviceError::Status(_) => write!(f, "device status {:08X}", self.code()),
        }
    }
}

/// Front panel device
///
/// Methods take `&self` because the same device is used from both the
/// simulation context (buttons, lights) and the presentation context
/// (present). Implementations provide their own synchronisation.
pub trait PanelDevice {
    /// Check whether the panel hardware is present
    ///
    /// Queried once at session start.
    fn is_present(&self) -> bool;

    /// Screen width in pixels
    fn screen_width(&self) -> Result<u32, DeviceError>;

    /// Screen height in pixels
    fn screen_height(&self) -> Result<u32, DeviceError>;

    /// Native pixel format of the screen
    fn screen_pixel_format(&self) -> Result<PixelFormat, DeviceError>;

    /// Present a full frame of native pixels
    ///
    /// `data` holds `width * height` bytes, one per pixel, row-major.
    fn present_buffer(&self, data: &[u8]) -> Result<(), DeviceError>;

    /// Current button bitmask (see `frontpanel-protocol` for bit layout)
    fn button_states(&self) -> Result<u32, DeviceError>;

    /// Current light bitmask
    fn light_states(&self) -> Result<u32, DeviceError>;

    /// Replace the light bitmask
    fn set_light_states(&self, lights: u32) -> Result<(), DeviceError>;
}
