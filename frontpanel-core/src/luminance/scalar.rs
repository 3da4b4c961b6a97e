//! Portable luminance path

use frontpanel_hal::PixelBlock;

use super::{luminance, LumaBlock};

/// Convert one row a pixel at a time
pub fn convert_row(src: &[PixelBlock], dst: &mut [LumaBlock]) {
    for (block, out) in src.iter().zip(dst.iter_mut()) {
        for (lum, pixel) in out.0.iter_mut().zip(block.0.chunks_exact(4)) {
            *lum = luminance(pixel[0], pixel[1], pixel[2]);
        }
    }
}
