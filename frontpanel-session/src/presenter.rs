//! Presentation context
//!
//! Drains render commands queued by the session and runs them against the
//! readback device and the panel. Owns the frame pump; nothing else touches
//! the staging slots or frame buffers.

use std::sync::Arc;

use frontpanel_core::screen::{FramePump, PresentOutcome};
use frontpanel_hal::{PanelDevice, ReadbackDevice};

use crate::channel::{RenderChannel, RenderCommand};

/// Consumer side of the render channel
pub struct PanelPresenter<P: PanelDevice, G: ReadbackDevice> {
    panel: Option<Arc<P>>,
    gpu: Arc<G>,
    channel: Arc<RenderChannel<G::RenderTarget>>,
    pump: Option<FramePump<G>>,
}

impl<P: PanelDevice, G: ReadbackDevice> PanelPresenter<P, G> {
    pub(crate) fn new(
        panel: Option<Arc<P>>,
        gpu: Arc<G>,
        channel: Arc<RenderChannel<G::RenderTarget>>,
    ) -> Self {
        Self {
            panel,
            gpu,
            channel,
            pump: None,
        }
    }

    /// Run every queued command in order
    ///
    /// Returns the number of commands processed.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(command) = self.channel.try_receive() {
            self.process(command);
            processed += 1;
        }
        processed
    }

    /// Frame buffers are allocated
    pub fn is_active(&self) -> bool {
        self.pump.is_some()
    }

    /// Frame buffer sizes in bytes, while active
    pub fn buffer_lens(&self) -> Option<Vec<usize>> {
        self.pump.as_ref().map(|pump| pump.buffer_lens())
    }

    fn process(&mut self, command: RenderCommand<G::RenderTarget>) {
        match command {
            RenderCommand::Init { descriptor } => {
                debug!(
                    "Frame pump ready: {}x{}",
                    descriptor.width,
                    descriptor.height
                );
                self.pump = Some(FramePump::new(&descriptor));
            }
            RenderCommand::Draw { target, slot } => self.draw(&target, slot),
            RenderCommand::Deinit => self.release(),
        }
    }

    fn draw(&mut self, target: &G::RenderTarget, slot: usize) {
        let (Some(pump), Some(panel)) = (self.pump.as_mut(), self.panel.as_deref()) else {
            trace!("Draw without frame buffers, ignored");
            return;
        };
        debug_assert_eq!(slot, pump.index(), "draw slot out of step with frame pump");

        let report = pump.cycle(&*self.gpu, panel, target);
        match report.present {
            PresentOutcome::Presented | PresentOutcome::NotReady => {}
            PresentOutcome::MapUnavailable => {
                warn!("Staging surface unavailable, frame skipped");
            }
            PresentOutcome::PresentFailed(e) => {
                warn!("Front panel present failed: {}", e);
            }
        }
        if let Err(e) = report.copy {
            warn!("Front panel readback copy failed: {}", e);
        }
    }

    fn release(&mut self) {
        let Some(mut pump) = self.pump.take() else {
            return;
        };
        if let Some(panel) = self.panel.as_deref() {
            if let Err(e) = pump.blank(panel) {
                warn!("Front panel blank frame failed: {}", e);
            }
        }
        debug!("Frame pump released");
    }
}
