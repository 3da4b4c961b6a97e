//! Panel screen geometry and format

use core::fmt;

use frontpanel_hal::{DeviceError, PanelDevice, PixelFormat, BLOCK_PIXELS};

/// Why the screen cannot be driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenError {
    /// The device did not answer the geometry or format query
    DescriptorUnavailable,
    /// Pixel format is not 8-bit single channel (raw format code)
    UnsupportedPixelFormat(u32),
    /// Width is not a whole number of 16-pixel blocks
    WidthNotAligned(u32),
    /// Width or height is zero
    ZeroSized,
    /// Screen turned off in configuration
    Disabled,
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenError::DescriptorUnavailable => write!(f, "screen descriptor unavailable"),
            ScreenError::UnsupportedPixelFormat(code) => {
                write!(f, "unsupported pixel format {}", code)
            }
            ScreenError::WidthNotAligned(width) => {
                write!(f, "width {} is not a multiple of {}", width, BLOCK_PIXELS)
            }
            ScreenError::ZeroSized => write!(f, "screen has zero size"),
            ScreenError::Disabled => write!(f, "screen disabled"),
        }
    }
}

/// Screen geometry and format, queried once per session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PanelDescriptor {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
}

impl PanelDescriptor {
    /// Query the device
    pub fn query<P: PanelDevice + ?Sized>(device: &P) -> Result<Self, DeviceError> {
        Ok(Self {
            width: device.screen_width()?,
            height: device.screen_height()?,
            format: device.screen_pixel_format()?,
        })
    }

    /// Check that the frame pump can drive this screen
    pub fn validate(&self) -> Result<(), ScreenError> {
        if !self.format.is_single_channel_8bit() {
            return Err(ScreenError::UnsupportedPixelFormat(self.format.raw()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ScreenError::ZeroSized);
        }
        if self.width as usize % BLOCK_PIXELS != 0 {
            return Err(ScreenError::WidthNotAligned(self.width));
        }
        Ok(())
    }

    /// Bytes in one presented frame
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize
    }
}
