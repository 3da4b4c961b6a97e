//! Double-buffered GPU readback into panel frames
//!
//! Two staging slots alternate between "being copied into" and "being read
//! back". Each cycle:
//!
//! 1. The slot copied into on the previous cycle is mapped, converted to
//!    luminance row by row, unmapped and presented.
//! 2. The freshly rendered target is copied into the current slot.
//! 3. The slot index flips.
//!
//! Presentation therefore lags rendering by exactly one cycle, and the
//! first cycle after construction presents nothing. A slot is never mapped
//! on the same cycle it is copied into.

use alloc::vec::Vec;

use frontpanel_hal::{DeviceError, PanelDevice, ReadbackDevice};

use crate::luminance::LumaBuffer;
use crate::screen::PanelDescriptor;

/// Number of in-flight frames
pub const SLOT_COUNT: usize = 2;

/// What happened on the read-back half of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PresentOutcome {
    /// Frame converted and handed to the panel
    Presented,
    /// Slot holds no copied frame yet
    NotReady,
    /// Staging memory could not be mapped; frame skipped
    MapUnavailable,
    /// Panel rejected the frame
    PresentFailed(DeviceError),
}

/// Result of one pump cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleReport {
    /// Slot the new render was copied into
    pub slot: usize,
    pub present: PresentOutcome,
    /// Staging creation or copy failure for the new render
    pub copy: Result<(), DeviceError>,
}

struct FrameSlot<S> {
    /// Created on first use
    staging: Option<S>,
    luma: LumaBuffer,
    /// Staging holds a completed copy not yet read back
    populated: bool,
}

/// Frame pump over a readback device
pub struct FramePump<G: ReadbackDevice> {
    width: u32,
    height: u32,
    slots: [FrameSlot<G::Staging>; SLOT_COUNT],
    /// Slot the next copy goes into
    index: usize,
}

impl<G: ReadbackDevice> FramePump<G> {
    /// Allocate luminance buffers for a validated descriptor
    pub fn new(descriptor: &PanelDescriptor) -> Self {
        let (width, height) = (descriptor.width, descriptor.height);
        let slot = || FrameSlot {
            staging: None,
            luma: LumaBuffer::new(width, height),
            populated: false,
        };
        Self {
            width,
            height,
            slots: [slot(), slot()],
            index: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Slot the next copy goes into
    pub fn index(&self) -> usize {
        self.index
    }

    /// Luminance buffer sizes, one per slot
    pub fn buffer_lens(&self) -> Vec<usize> {
        self.slots.iter().map(|slot| slot.luma.len()).collect()
    }

    /// Run one cycle: present the previous copy, then copy `source`
    pub fn cycle<P: PanelDevice + ?Sized>(
        &mut self,
        gpu: &G,
        panel: &P,
        source: &G::RenderTarget,
    ) -> CycleReport {
        let present = self.present_slot(gpu, panel, self.index ^ 1);
        let slot = self.index;
        let copy = self.copy_into(gpu, source, slot);
        self.index ^= 1;

        CycleReport {
            slot,
            present,
            copy,
        }
    }

    fn present_slot<P: PanelDevice + ?Sized>(
        &mut self,
        gpu: &G,
        panel: &P,
        index: usize,
    ) -> PresentOutcome {
        let slot = &mut self.slots[index];
        if !slot.populated {
            return PresentOutcome::NotReady;
        }
        let Some(staging) = slot.staging.as_mut() else {
            return PresentOutcome::NotReady;
        };
        slot.populated = false;

        let converted = match gpu.map_staging(staging) {
            Some(surface) => slot.luma.convert_from(&surface),
            None => false,
        };
        gpu.unmap_staging(staging);

        if !converted {
            return PresentOutcome::MapUnavailable;
        }
        match panel.present_buffer(slot.luma.as_bytes()) {
            Ok(()) => PresentOutcome::Presented,
            Err(e) => PresentOutcome::PresentFailed(e),
        }
    }

    fn copy_into(
        &mut self,
        gpu: &G,
        source: &G::RenderTarget,
        index: usize,
    ) -> Result<(), DeviceError> {
        let slot = &mut self.slots[index];
        slot.populated = false;

        let staging = match slot.staging.take() {
            Some(staging) => staging,
            None => gpu.create_staging(self.width, self.height)?,
        };
        let staging = slot.staging.insert(staging);

        gpu.copy_to_staging(source, staging)?;
        slot.populated = true;
        Ok(())
    }

    /// Zero the pending frame and present it
    pub fn blank<P: PanelDevice + ?Sized>(&mut self, panel: &P) -> Result<(), DeviceError> {
        let luma = &mut self.slots[self.index].luma;
        luma.clear();
        panel.present_buffer(luma.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontpanel_hal::mock::{MockGpu, MockPanel, MockTarget};
    use frontpanel_hal::PixelFormat;

    const WHITE: [u8; 4] = [255, 255, 255, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn descriptor(width: u32, height: u32) -> PanelDescriptor {
        PanelDescriptor {
            width,
            height,
            format: PixelFormat::R8Unorm,
        }
    }

    #[test]
    fn test_buffers_sized_to_panel() {
        let pump = FramePump::<MockGpu>::new(&descriptor(256, 64));
        assert_eq!(pump.buffer_lens(), [16384, 16384]);
        assert_eq!(pump.index(), 0);
    }

    #[test]
    fn test_first_cycle_presents_nothing() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(32, 2, PixelFormat::R8Unorm);
        let target = MockTarget::new(32, 2, WHITE);
        let mut pump = FramePump::new(&descriptor(32, 2));

        let report = pump.cycle(&gpu, &panel, &target);
        assert_eq!(report.slot, 0);
        assert_eq!(report.present, PresentOutcome::NotReady);
        assert_eq!(report.copy, Ok(()));
        assert_eq!(panel.frame_count(), 0);
        assert_eq!(pump.index(), 1);
    }

    #[test]
    fn test_presents_previous_render() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(32, 2, PixelFormat::R8Unorm);
        let target = MockTarget::new(32, 2, BLACK);
        let mut pump = FramePump::new(&descriptor(32, 2));

        // Tick 0 renders white, tick 1 renders black
        target.fill(WHITE);
        pump.cycle(&gpu, &panel, &target);
        target.fill(BLACK);
        let report = pump.cycle(&gpu, &panel, &target);

        assert_eq!(report.present, PresentOutcome::Presented);
        assert_eq!(report.slot, 1);
        let frame = panel.last_frame().unwrap();
        assert_eq!(frame.len(), 64);
        assert!(frame.iter().all(|&b| b == 255));

        // Tick 2 presents tick 1's black render
        target.fill(WHITE);
        pump.cycle(&gpu, &panel, &target);
        assert!(panel.last_frame().unwrap().iter().all(|&b| b == 0));
        assert_eq!(panel.frame_count(), 2);
    }

    #[test]
    fn test_pixel_positions_survive() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(32, 2, PixelFormat::R8Unorm);
        let target = MockTarget::new(32, 2, BLACK);
        let mut pump = FramePump::new(&descriptor(32, 2));

        target.put_pixel(17, 1, WHITE);
        pump.cycle(&gpu, &panel, &target);
        pump.cycle(&gpu, &panel, &target);

        let frame = panel.last_frame().unwrap();
        assert_eq!(frame[32 + 17], 255);
        assert_eq!(frame.iter().filter(|&&b| b != 0).count(), 1);
    }

    #[test]
    fn test_slots_alternate_and_are_reused() {
        let gpu = MockGpu::new();
        let panel = MockPanel::standard();
        let target = MockTarget::new(256, 64, WHITE);
        let mut pump = FramePump::new(&descriptor(256, 64));

        let slots: Vec<usize> = (0..5)
            .map(|_| pump.cycle(&gpu, &panel, &target).slot)
            .collect();
        assert_eq!(slots, [0, 1, 0, 1, 0]);
        assert_eq!(gpu.staging_created(), 2);
        assert_eq!(gpu.copies(), 5);
        assert_eq!(panel.frame_count(), 4);
        assert!(panel.frames().iter().all(|f| f.len() == 16384));
    }

    #[test]
    fn test_map_failure_skips_frame() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(16, 1, PixelFormat::R8Unorm);
        let target = MockTarget::new(16, 1, WHITE);
        let mut pump = FramePump::new(&descriptor(16, 1));

        pump.cycle(&gpu, &panel, &target);
        gpu.fail_map(true);
        let report = pump.cycle(&gpu, &panel, &target);
        assert_eq!(report.present, PresentOutcome::MapUnavailable);
        assert_eq!(report.copy, Ok(()));
        assert_eq!(panel.frame_count(), 0);

        gpu.fail_map(false);
        let report = pump.cycle(&gpu, &panel, &target);
        assert_eq!(report.present, PresentOutcome::Presented);
        assert_eq!(panel.frame_count(), 1);
    }

    #[test]
    fn test_map_and_unmap_are_paired() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(16, 1, PixelFormat::R8Unorm);
        let target = MockTarget::new(16, 1, WHITE);
        let mut pump = FramePump::new(&descriptor(16, 1));

        for _ in 0..4 {
            pump.cycle(&gpu, &panel, &target);
        }
        assert_eq!(gpu.map_calls(), (3, 3));
    }

    #[test]
    fn test_staging_failure_retries_next_cycle() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(16, 1, PixelFormat::R8Unorm);
        let target = MockTarget::new(16, 1, WHITE);
        let mut pump = FramePump::new(&descriptor(16, 1));

        gpu.fail_staging(true);
        let report = pump.cycle(&gpu, &panel, &target);
        assert!(report.copy.is_err());

        gpu.fail_staging(false);
        // Slot 0 was never filled, so slot 1's first cycle has nothing to show
        let report = pump.cycle(&gpu, &panel, &target);
        assert_eq!(report.present, PresentOutcome::NotReady);
        assert_eq!(report.copy, Ok(()));

        let report = pump.cycle(&gpu, &panel, &target);
        assert_eq!(report.present, PresentOutcome::Presented);
        assert_eq!(gpu.staging_created(), 2);
    }

    #[test]
    fn test_present_failure_is_reported() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(16, 1, PixelFormat::R8Unorm);
        let target = MockTarget::new(16, 1, WHITE);
        let mut pump = FramePump::new(&descriptor(16, 1));

        pump.cycle(&gpu, &panel, &target);
        panel.fail_present(true);
        let report = pump.cycle(&gpu, &panel, &target);
        assert!(matches!(report.present, PresentOutcome::PresentFailed(_)));
    }

    #[test]
    fn test_blank_presents_zeroes() {
        let gpu = MockGpu::new();
        let panel = MockPanel::new(32, 2, PixelFormat::R8Unorm);
        let target = MockTarget::new(32, 2, WHITE);
        let mut pump = FramePump::new(&descriptor(32, 2));

        pump.cycle(&gpu, &panel, &target);
        pump.cycle(&gpu, &panel, &target);
        pump.cycle(&gpu, &panel, &target);
        pump.blank(&panel).unwrap();

        let frame = panel.last_frame().unwrap();
        assert_eq!(frame.len(), 64);
        assert!(frame.iter().all(|&b| b == 0));
    }
}
