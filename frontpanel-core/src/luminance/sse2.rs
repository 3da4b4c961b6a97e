//! SSE2 luminance path
//!
//! A block of sixteen pixels is four 128-bit loads of four BGRA pixels. Each
//! load is split into B, G and R lanes with shift-and-mask, converted to
//! float, weighted, rounded back to i32 and packed down to sixteen bytes.

#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

use frontpanel_hal::PixelBlock;

use super::{LumaBlock, WEIGHT_B, WEIGHT_G, WEIGHT_R};

struct Weights {
    channel_mask: __m128i,
    b: __m128,
    g: __m128,
    r: __m128,
}

/// Convert one row sixteen pixels per step
pub fn convert_row(src: &[PixelBlock], dst: &mut [LumaBlock]) {
    // SAFETY: this module is only compiled with SSE2 enabled. PixelBlock and
    // LumaBlock are align(16), so every 16-byte load and store below is
    // aligned and in bounds of its block.
    unsafe {
        let weights = Weights {
            channel_mask: _mm_set1_epi32(0xFF),
            b: _mm_set1_ps(WEIGHT_B),
            g: _mm_set1_ps(WEIGHT_G),
            r: _mm_set1_ps(WEIGHT_R),
        };

        for (block, out) in src.iter().zip(dst.iter_mut()) {
            let base = block.0.as_ptr() as *const __m128i;

            let lum0 = luminance4(_mm_load_si128(base), &weights);
            let lum1 = luminance4(_mm_load_si128(base.add(1)), &weights);
            let lum2 = luminance4(_mm_load_si128(base.add(2)), &weights);
            let lum3 = luminance4(_mm_load_si128(base.add(3)), &weights);

            // Values are already in 0..=255, so the signed 16-bit pack is
            // lossless and the unsigned 8-bit pack only saturates
            let lum01 = _mm_packs_epi32(lum0, lum1);
            let lum23 = _mm_packs_epi32(lum2, lum3);
            _mm_store_si128(
                out.0.as_mut_ptr() as *mut __m128i,
                _mm_packus_epi16(lum01, lum23),
            );
        }
    }
}

/// Luminance of four pixels as i32 lanes
#[inline]
unsafe fn luminance4(pixels: __m128i, weights: &Weights) -> __m128i {
    let b = _mm_cvtepi32_ps(_mm_and_si128(pixels, weights.channel_mask));
    let g = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32(pixels, 8), weights.channel_mask));
    let r = _mm_cvtepi32_ps(_mm_and_si128(_mm_srli_epi32(pixels, 16), weights.channel_mask));

    // Same evaluation order as the scalar path: (b*wb + g*wg) + r*wr
    let sum = _mm_add_ps(
        _mm_add_ps(_mm_mul_ps(b, weights.b), _mm_mul_ps(g, weights.g)),
        _mm_mul_ps(r, weights.r),
    );

    // Round to nearest even under the default MXCSR mode
    _mm_cvtps_epi32(sum)
}
