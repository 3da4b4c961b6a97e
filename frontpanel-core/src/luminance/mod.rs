//! BGRA8 to 8-bit luminance conversion
//!
//! Each pixel becomes `0.11 * B + 0.59 * G + 0.3 * R`, rounded to nearest
//! (ties to even) and saturated to `0..=255`. Alpha is ignored.
//!
//! Work is done sixteen pixels at a time: one [`PixelBlock`] in, one
//! [`LumaBlock`] out, which is exactly one 128-bit register of output. Both
//! block types are 16-byte aligned so the vector path can use aligned loads
//! and stores. The scalar path evaluates the same `f32` expression in the
//! same order and produces identical bytes.

#![allow(unsafe_code)]

use alloc::vec;
use alloc::vec::Vec;

use frontpanel_hal::{MappedSurface, PixelBlock, BLOCK_PIXELS};

mod scalar;
#[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
mod sse2;

pub use scalar::convert_row as convert_row_scalar;

/// Blue channel weight
pub const WEIGHT_B: f32 = 0.11;
/// Green channel weight
pub const WEIGHT_G: f32 = 0.59;
/// Red channel weight
pub const WEIGHT_R: f32 = 0.3;

/// Bytes per luminance block
pub const LUMA_BLOCK_BYTES: usize = BLOCK_PIXELS;

/// Sixteen 8-bit luminance values, 16-byte aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(C, align(16))]
pub struct LumaBlock(pub [u8; LUMA_BLOCK_BYTES]);

/// Luminance of a single pixel
pub fn luminance(b: u8, g: u8, r: u8) -> u8 {
    let value = b as f32 * WEIGHT_B + g as f32 * WEIGHT_G + r as f32 * WEIGHT_R;
    round_to_u8(value)
}

/// Round half to even and saturate
///
/// Matches the default rounding mode of the vector float-to-int conversion.
fn round_to_u8(value: f32) -> u8 {
    // `as` saturates, negative and NaN become 0
    let truncated = value as u32;
    let fraction = value - truncated as f32;
    let rounded = if fraction > 0.5 || (fraction == 0.5 && truncated & 1 == 1) {
        truncated + 1
    } else {
        truncated
    };
    rounded.min(u8::MAX as u32) as u8
}

/// Convert one row of pixel blocks
///
/// `src` and `dst` must have the same number of blocks.
pub fn convert_row(src: &[PixelBlock], dst: &mut [LumaBlock]) {
    debug_assert_eq!(src.len(), dst.len(), "row length mismatch");

    #[cfg(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2"))]
    sse2::convert_row(src, dst);

    #[cfg(not(all(any(target_arch = "x86", target_arch = "x86_64"), target_feature = "sse2")))]
    scalar::convert_row(src, dst);
}

/// Row-major 8-bit frame in aligned blocks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaBuffer {
    blocks: Vec<LumaBlock>,
    width: u32,
    height: u32,
}

impl LumaBuffer {
    /// Allocate a zeroed frame
    ///
    /// `width` must be a multiple of 16.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert_eq!(width as usize % BLOCK_PIXELS, 0);
        let count = width as usize / BLOCK_PIXELS * height as usize;
        Self {
            blocks: vec![LumaBlock::default(); count],
            width,
            height,
        }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Size in bytes (one byte per pixel)
    pub fn len(&self) -> usize {
        self.blocks.len() * LUMA_BLOCK_BYTES
    }

    /// Check if the frame has no pixels
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Mutable blocks of one row
    pub fn row_mut(&mut self, y: u32) -> &mut [LumaBlock] {
        let per_row = self.width as usize / BLOCK_PIXELS;
        let start = y as usize * per_row;
        &mut self.blocks[start..start + per_row]
    }

    /// Set every pixel to zero (black)
    pub fn clear(&mut self) {
        self.blocks.fill(LumaBlock::default());
    }

    /// Frame bytes as presented to the panel
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: LumaBlock is repr(C) over [u8; 16] with no padding, so the
        // block slice is a contiguous run of len() initialised bytes.
        unsafe { core::slice::from_raw_parts(self.blocks.as_ptr().cast::<u8>(), self.len()) }
    }

    /// Convert a mapped surface of the same size into this frame
    ///
    /// Returns false (leaving the frame untouched) if the sizes differ.
    pub fn convert_from(&mut self, surface: &MappedSurface<'_>) -> bool {
        if surface.width() != self.width || surface.height() != self.height {
            return false;
        }
        for (y, row) in surface.rows().enumerate() {
            convert_row(row, self.row_mut(y as u32));
        }
        true
    }
}
