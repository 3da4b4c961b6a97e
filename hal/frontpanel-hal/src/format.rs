//! Screen pixel formats

/// Raw code for an 8-bit single channel typeless format
pub const FORMAT_R8_TYPELESS: u32 = 60;
/// Raw code for an 8-bit single channel normalised format
pub const FORMAT_R8_UNORM: u32 = 61;
/// Raw code for an 8-bit single channel unsigned integer format
pub const FORMAT_R8_UINT: u32 = 62;

/// Native pixel format reported by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PixelFormat {
    R8Typeless,
    R8Unorm,
    R8Uint,
    /// Any other format, carrying the raw code
    Unsupported(u32),
}

impl PixelFormat {
    /// Decode a raw format code
    pub const fn from_raw(code: u32) -> Self {
        match code {
            FORMAT_R8_TYPELESS => PixelFormat::R8Typeless,
            FORMAT_R8_UNORM => PixelFormat::R8Unorm,
            FORMAT_R8_UINT => PixelFormat::R8Uint,
            other => PixelFormat::Unsupported(other),
        }
    }

    /// Raw format code
    pub const fn raw(self) -> u32 {
        match self {
            PixelFormat::R8Typeless => FORMAT_R8_TYPELESS,
            PixelFormat::R8Unorm => FORMAT_R8_UNORM,
            PixelFormat::R8Uint => FORMAT_R8_UINT,
            PixelFormat::Unsupported(code) => code,
        }
    }

    /// Check if the format stores one 8-bit channel per pixel
    ///
    /// Only these formats can take the luminance output directly.
    pub const fn is_single_channel_8bit(self) -> bool {
        matches!(
            self,
            PixelFormat::R8Typeless | PixelFormat::R8Unorm | PixelFormat::R8Uint
        )
    }
}
