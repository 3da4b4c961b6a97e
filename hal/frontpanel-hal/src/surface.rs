//! CPU-visible surface types
//!
//! Readback surfaces are handed to the CPU as rows of [`PixelBlock`]s. The
//! block type carries the 16-byte alignment the vector luminance routine
//! relies on, so an implementation that maps device memory has to uphold it
//! when it builds the slice.

/// Pixels per block (one 128-bit register of 8-bit output)
pub const BLOCK_PIXELS: usize = 16;

/// Bytes per BGRA8 pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Bytes per block of BGRA8 pixels
pub const BLOCK_BYTES: usize = BLOCK_PIXELS * BYTES_PER_PIXEL;

/// Sixteen packed BGRA8 pixels, 16-byte aligned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C, align(16))]
pub struct PixelBlock(pub [u8; BLOCK_BYTES]);

impl PixelBlock {
    /// All channels zero
    pub const ZERO: Self = Self([0; BLOCK_BYTES]);

    /// Block with every pixel set to the same BGRA value
    pub fn splat(bgra: [u8; 4]) -> Self {
        let mut block = Self::ZERO;
        for pixel in block.0.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&bgra);
        }
        block
    }

    /// Get a pixel as `[b, g, r, a]`
    pub fn pixel(&self, index: usize) -> [u8; 4] {
        let at = index * BYTES_PER_PIXEL;
        [self.0[at], self.0[at + 1], self.0[at + 2], self.0[at + 3]]
    }

    /// Set a pixel from `[b, g, r, a]`
    pub fn set_pixel(&mut self, index: usize, bgra: [u8; 4]) {
        let at = index * BYTES_PER_PIXEL;
        self.0[at..at + BYTES_PER_PIXEL].copy_from_slice(&bgra);
    }
}

impl Default for PixelBlock {
    fn default() -> Self {
        Self::ZERO
    }
}

/// A staging surface mapped for CPU reads
///
/// Rows start every `pitch_blocks` blocks; only the first `width / 16` blocks
/// of a row hold pixels.
#[derive(Debug, Clone, Copy)]
pub struct MappedSurface<'a> {
    blocks: &'a [PixelBlock],
    pitch_blocks: usize,
    width: u32,
    height: u32,
}

impl<'a> MappedSurface<'a> {
    /// Wrap mapped memory
    ///
    /// Returns `None` if the width is not a whole number of blocks, the pitch
    /// is shorter than a row, or the memory does not cover every row.
    pub fn new(
        blocks: &'a [PixelBlock],
        pitch_blocks: usize,
        width: u32,
        height: u32,
    ) -> Option<Self> {
        let width_px = width as usize;
        if width_px % BLOCK_PIXELS != 0 || pitch_blocks < width_px / BLOCK_PIXELS {
            return None;
        }
        if blocks.len() < pitch_blocks * height as usize {
            return None;
        }
        Some(Self {
            blocks,
            pitch_blocks,
            width,
            height,
        })
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row pitch in blocks
    pub fn pitch_blocks(&self) -> usize {
        self.pitch_blocks
    }

    /// Pixel blocks of one row, without pitch padding
    pub fn row(&self, y: u32) -> &'a [PixelBlock] {
        let start = y as usize * self.pitch_blocks;
        &self.blocks[start..start + self.width as usize / BLOCK_PIXELS]
    }

    /// Iterate over all rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &'a [PixelBlock]> + '_ {
        (0..self.height).map(move |y| self.row(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_alignment() {
        assert_eq!(core::mem::align_of::<PixelBlock>(), 16);
        assert_eq!(core::mem::size_of::<PixelBlock>(), BLOCK_BYTES);
    }

    #[test]
    fn test_pixel_access() {
        let mut block = PixelBlock::splat([1, 2, 3, 4]);
        assert_eq!(block.pixel(15), [1, 2, 3, 4]);
        block.set_pixel(7, [9, 8, 7, 6]);
        assert_eq!(block.pixel(7), [9, 8, 7, 6]);
        assert_eq!(block.pixel(8), [1, 2, 3, 4]);
    }

    #[test]
    fn test_mapped_rows_skip_pitch_padding() {
        let mut blocks = [PixelBlock::ZERO; 6];
        // 32 px wide (2 blocks) with a 3 block pitch
        blocks[0] = PixelBlock::splat([1, 1, 1, 1]);
        blocks[2] = PixelBlock::splat([0xEE, 0, 0, 0]);
        blocks[3] = PixelBlock::splat([2, 2, 2, 2]);

        let surface = MappedSurface::new(&blocks, 3, 32, 2).unwrap();
        assert_eq!(surface.pitch_blocks(), 3);
        assert_eq!(surface.row(0).len(), 2);
        assert_eq!(surface.row(1)[0], PixelBlock::splat([2, 2, 2, 2]));
        assert!(surface.rows().all(|row| row.len() == 2));
    }

    #[test]
    fn test_mapped_rejects_bad_geometry() {
        let blocks = [PixelBlock::ZERO; 4];
        assert!(MappedSurface::new(&blocks, 2, 24, 2).is_none());
        assert!(MappedSurface::new(&blocks, 1, 32, 2).is_none());
        assert!(MappedSurface::new(&blocks, 2, 32, 3).is_none());
    }
}
