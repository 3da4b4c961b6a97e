//! In-memory devices for host testing
//!
//! [`MockPanel`] records presented frames and light writes and lets tests
//! script button masks and call failures. [`MockGpu`] keeps render targets
//! and staging surfaces in ordinary memory with a 256-byte row pitch.

use std::sync::{Arc, Mutex, MutexGuard};
use std::vec;
use std::vec::Vec;

use crate::device::{DeviceError, PanelDevice};
use crate::format::PixelFormat;
use crate::readback::{ReadbackDevice, RenderTargetDesc};
use crate::surface::{MappedSurface, PixelBlock, BLOCK_BYTES, BLOCK_PIXELS, BYTES_PER_PIXEL};

/// Status code the mocks return for scripted failures (E_FAIL)
pub const MOCK_FAILURE: DeviceError = DeviceError::Status(0x8000_4005);

/// Row pitch alignment of staging surfaces in bytes
pub const STAGING_PITCH_ALIGNMENT: usize = 256;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct PanelState {
    width: u32,
    height: u32,
    format: u32,
    present: bool,
    buttons: u32,
    lights: u32,
    frames: Vec<Vec<u8>>,
    light_writes: usize,
    fail_queries: bool,
    fail_present: bool,
    fail_buttons: bool,
    fail_light_read: bool,
    fail_light_write: bool,
}

/// Scriptable front panel
#[derive(Debug, Default)]
pub struct MockPanel {
    state: Mutex<PanelState>,
}

impl MockPanel {
    /// Panel that is present with the given screen geometry
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Self {
        Self {
            state: Mutex::new(PanelState {
                width,
                height,
                format: format.raw(),
                present: true,
                ..PanelState::default()
            }),
        }
    }

    /// 256x64 R8 panel, the shipping hardware geometry
    pub fn standard() -> Self {
        Self::new(256, 64, PixelFormat::R8Unorm)
    }

    /// Panel hardware that reports itself absent
    pub fn absent() -> Self {
        Self::default()
    }

    /// Set the button mask returned by the next reads
    pub fn set_buttons(&self, mask: u32) {
        lock(&self.state).buttons = mask;
    }

    /// Change lights behind the session's back
    pub fn set_lights_externally(&self, mask: u32) {
        lock(&self.state).lights = mask;
    }

    /// Current light mask as stored by the device
    pub fn lights(&self) -> u32 {
        lock(&self.state).lights
    }

    /// Number of successful light writes
    pub fn light_writes(&self) -> usize {
        lock(&self.state).light_writes
    }

    /// Every frame presented so far
    pub fn frames(&self) -> Vec<Vec<u8>> {
        lock(&self.state).frames.clone()
    }

    /// Number of frames presented so far
    pub fn frame_count(&self) -> usize {
        lock(&self.state).frames.len()
    }

    /// Most recently presented frame
    pub fn last_frame(&self) -> Option<Vec<u8>> {
        lock(&self.state).frames.last().cloned()
    }

    /// Fail screen geometry and format queries
    pub fn fail_queries(&self, fail: bool) {
        lock(&self.state).fail_queries = fail;
    }

    /// Fail present calls
    pub fn fail_present(&self, fail: bool) {
        lock(&self.state).fail_present = fail;
    }

    /// Fail button reads
    pub fn fail_buttons(&self, fail: bool) {
        lock(&self.state).fail_buttons = fail;
    }

    /// Fail light reads
    pub fn fail_light_read(&self, fail: bool) {
        lock(&self.state).fail_light_read = fail;
    }

    /// Fail light writes
    pub fn fail_light_write(&self, fail: bool) {
        lock(&self.state).fail_light_write = fail;
    }
}

impl PanelDevice for MockPanel {
    fn is_present(&self) -> bool {
        lock(&self.state).present
    }

    fn screen_width(&self) -> Result<u32, DeviceError> {
        let state = lock(&self.state);
        if state.fail_queries {
            return Err(MOCK_FAILURE);
        }
        Ok(state.width)
    }

    fn screen_height(&self) -> Result<u32, DeviceError> {
        let state = lock(&self.state);
        if state.fail_queries {
            return Err(MOCK_FAILURE);
        }
        Ok(state.height)
    }

    fn screen_pixel_format(&self) -> Result<PixelFormat, DeviceError> {
        let state = lock(&self.state);
        if state.fail_queries {
            return Err(MOCK_FAILURE);
        }
        Ok(PixelFormat::from_raw(state.format))
    }

    fn present_buffer(&self, data: &[u8]) -> Result<(), DeviceError> {
        let mut state = lock(&self.state);
        if !state.present {
            return Err(DeviceError::NotPresent);
        }
        if state.fail_present {
            return Err(MOCK_FAILURE);
        }
        state.frames.push(data.to_vec());
        Ok(())
    }

    fn button_states(&self) -> Result<u32, DeviceError> {
        let state = lock(&self.state);
        if state.fail_buttons {
            return Err(MOCK_FAILURE);
        }
        Ok(state.buttons)
    }

    fn light_states(&self) -> Result<u32, DeviceError> {
        let state = lock(&self.state);
        if state.fail_light_read {
            return Err(MOCK_FAILURE);
        }
        Ok(state.lights)
    }

    fn set_light_states(&self, lights: u32) -> Result<(), DeviceError> {
        let mut state = lock(&self.state);
        if state.fail_light_write {
            return Err(MOCK_FAILURE);
        }
        state.lights = lights;
        state.light_writes += 1;
        Ok(())
    }
}

#[derive(Debug)]
struct TargetPixels {
    width: u32,
    height: u32,
    bgra: Vec<u8>,
}

/// Render target held in memory as tightly packed BGRA8 rows
#[derive(Debug, Clone)]
pub struct MockTarget {
    pixels: Arc<Mutex<TargetPixels>>,
}

impl MockTarget {
    /// Create a target cleared to `clear_bgra`
    pub fn new(width: u32, height: u32, clear_bgra: [u8; 4]) -> Self {
        let count = width as usize * height as usize;
        let mut bgra = Vec::with_capacity(count * BYTES_PER_PIXEL);
        for _ in 0..count {
            bgra.extend_from_slice(&clear_bgra);
        }
        Self {
            pixels: Arc::new(Mutex::new(TargetPixels { width, height, bgra })),
        }
    }

    /// Target dimensions
    pub fn size(&self) -> (u32, u32) {
        let pixels = lock(&self.pixels);
        (pixels.width, pixels.height)
    }

    /// Fill every pixel with one colour
    pub fn fill(&self, bgra: [u8; 4]) {
        let mut pixels = lock(&self.pixels);
        for pixel in pixels.bgra.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&bgra);
        }
    }

    /// Write a single pixel; out-of-range coordinates are ignored
    pub fn put_pixel(&self, x: u32, y: u32, bgra: [u8; 4]) {
        let mut pixels = lock(&self.pixels);
        if x >= pixels.width || y >= pixels.height {
            return;
        }
        let at = (y as usize * pixels.width as usize + x as usize) * BYTES_PER_PIXEL;
        pixels.bgra[at..at + BYTES_PER_PIXEL].copy_from_slice(&bgra);
    }

    /// Read a single pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let pixels = lock(&self.pixels);
        if x >= pixels.width || y >= pixels.height {
            return None;
        }
        let at = (y as usize * pixels.width as usize + x as usize) * BYTES_PER_PIXEL;
        let p = &pixels.bgra[at..at + BYTES_PER_PIXEL];
        Some([p[0], p[1], p[2], p[3]])
    }
}

/// Staging surface with pitch-padded rows
#[derive(Debug)]
pub struct MockStaging {
    blocks: Vec<PixelBlock>,
    pitch_blocks: usize,
    width: u32,
    height: u32,
    mapped: bool,
}

impl MockStaging {
    /// Whether the surface is currently mapped
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }
}

#[derive(Debug, Default)]
struct GpuState {
    targets_created: usize,
    staging_created: usize,
    copies: usize,
    maps: usize,
    unmaps: usize,
    fail_map: bool,
    fail_staging: bool,
    fail_target: bool,
    last_desc: Option<RenderTargetDesc>,
}

/// Scriptable readback device
#[derive(Debug, Default)]
pub struct MockGpu {
    state: Mutex<GpuState>,
}

impl MockGpu {
    /// Create a healthy device
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `map_staging` return no surface
    pub fn fail_map(&self, fail: bool) {
        lock(&self.state).fail_map = fail;
    }

    /// Make staging creation fail
    pub fn fail_staging(&self, fail: bool) {
        lock(&self.state).fail_staging = fail;
    }

    /// Make render target creation fail
    pub fn fail_target(&self, fail: bool) {
        lock(&self.state).fail_target = fail;
    }

    /// Render targets created so far
    pub fn targets_created(&self) -> usize {
        lock(&self.state).targets_created
    }

    /// Staging surfaces created so far
    pub fn staging_created(&self) -> usize {
        lock(&self.state).staging_created
    }

    /// Copies issued so far
    pub fn copies(&self) -> usize {
        lock(&self.state).copies
    }

    /// Successful maps and unmaps so far
    pub fn map_calls(&self) -> (usize, usize) {
        let state = lock(&self.state);
        (state.maps, state.unmaps)
    }

    /// Description of the last render target created
    pub fn last_desc(&self) -> Option<RenderTargetDesc> {
        lock(&self.state).last_desc
    }
}

impl ReadbackDevice for MockGpu {
    type RenderTarget = MockTarget;
    type Staging = MockStaging;

    fn create_render_target(&self, desc: &RenderTargetDesc) -> Result<MockTarget, DeviceError> {
        let mut state = lock(&self.state);
        if state.fail_target {
            return Err(MOCK_FAILURE);
        }
        state.targets_created += 1;
        state.last_desc = Some(*desc);
        Ok(MockTarget::new(desc.width, desc.height, desc.clear_bgra))
    }

    fn create_staging(&self, width: u32, height: u32) -> Result<MockStaging, DeviceError> {
        let mut state = lock(&self.state);
        if state.fail_staging {
            return Err(MOCK_FAILURE);
        }
        state.staging_created += 1;

        let row_bytes = width as usize * BYTES_PER_PIXEL;
        let pitch_bytes = row_bytes.div_ceil(STAGING_PITCH_ALIGNMENT) * STAGING_PITCH_ALIGNMENT;
        let pitch_blocks = pitch_bytes / BLOCK_BYTES;
        Ok(MockStaging {
            blocks: vec![PixelBlock::ZERO; pitch_blocks * height as usize],
            pitch_blocks,
            width,
            height,
            mapped: false,
        })
    }

    fn copy_to_staging(
        &self,
        source: &MockTarget,
        staging: &mut MockStaging,
    ) -> Result<(), DeviceError> {
        let pixels = lock(&source.pixels);
        if pixels.width != staging.width || pixels.height != staging.height {
            // E_INVALIDARG
            return Err(DeviceError::Status(0x8007_0057));
        }

        let row_bytes = pixels.width as usize * BYTES_PER_PIXEL;
        for (y, row) in pixels.bgra.chunks_exact(row_bytes).enumerate() {
            let start = y * staging.pitch_blocks;
            let dest = &mut staging.blocks[start..start + pixels.width as usize / BLOCK_PIXELS];
            for (block, chunk) in dest.iter_mut().zip(row.chunks_exact(BLOCK_BYTES)) {
                block.0.copy_from_slice(chunk);
            }
        }

        lock(&self.state).copies += 1;
        Ok(())
    }

    fn map_staging<'a>(&self, staging: &'a mut MockStaging) -> Option<MappedSurface<'a>> {
        let mut state = lock(&self.state);
        if state.fail_map {
            return None;
        }
        state.maps += 1;
        staging.mapped = true;
        MappedSurface::new(
            &staging.blocks,
            staging.pitch_blocks,
            staging.width,
            staging.height,
        )
    }

    fn unmap_staging(&self, staging: &mut MockStaging) {
        if staging.mapped {
            staging.mapped = false;
            lock(&self.state).unmaps += 1;
        }
    }
}
