//! GPU readback abstraction
//!
//! The UI is rendered into an offscreen render target on the GPU. Each frame
//! the render target is copied into a CPU-readable staging surface, which is
//! mapped on the following frame for conversion.
//!
//! Implementations must issue these calls directly against the device rather
//! than through a deferred command list that would flush and stall the
//! simulation context.

use crate::device::DeviceError;
use crate::surface::MappedSurface;

/// Texture sampling filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Filter {
    Nearest,
    Linear,
}

/// Description of a BGRA8 offscreen render target
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderTargetDesc {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Sampling filter
    pub filter: Filter,
    /// Clear colour as `[b, g, r, a]`
    pub clear_bgra: [u8; 4],
    /// Store sRGB-encoded values
    pub srgb: bool,
}

impl RenderTargetDesc {
    /// Target suitable for hosting the panel UI
    ///
    /// Nearest filtering, transparent clear and linear values, so the
    /// luminance conversion sees exactly what the widgets drew.
    pub const fn panel(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            filter: Filter::Nearest,
            clear_bgra: [0, 0, 0, 0],
            srgb: false,
        }
    }
}

/// Render target and staging surface provider
pub trait ReadbackDevice {
    /// GPU render target the UI draws into
    ///
    /// Cloning yields another handle to the same target.
    type RenderTarget: Clone;

    /// CPU-readable staging surface
    type Staging;

    /// Create an offscreen render target
    fn create_render_target(
        &self,
        desc: &RenderTargetDesc,
    ) -> Result<Self::RenderTarget, DeviceError>;

    /// Create a BGRA8 staging surface for CPU readback
    fn create_staging(&self, width: u32, height: u32) -> Result<Self::Staging, DeviceError>;

    /// Issue a copy of the render target into the staging surface
    fn copy_to_staging(
        &self,
        source: &Self::RenderTarget,
        staging: &mut Self::Staging,
    ) -> Result<(), DeviceError>;

    /// Map the staging surface for CPU reads
    ///
    /// Returns `None` when the device cannot provide a pointer this frame.
    fn map_staging<'a>(&self, staging: &'a mut Self::Staging) -> Option<MappedSurface<'a>>;

    /// Release a mapping obtained from [`ReadbackDevice::map_staging`]
    fn unmap_staging(&self, staging: &mut Self::Staging);
}
