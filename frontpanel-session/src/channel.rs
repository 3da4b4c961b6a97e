//! Simulation to presentation hand-off

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use frontpanel_core::screen::PanelDescriptor;

/// Channel capacity for render commands
pub const RENDER_CHANNEL_SIZE: usize = 8;

/// Slots a draw never takes, so attach and detach always fit
pub const LIFECYCLE_HEADROOM: usize = 2;

/// Work for the presentation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand<T> {
    /// Allocate frame buffers for a validated screen
    Init { descriptor: PanelDescriptor },
    /// Run one frame pump cycle on a freshly rendered target
    Draw { target: T, slot: usize },
    /// Present a blank frame and release frame buffers
    Deinit,
}

/// FIFO of render commands, one producer and one consumer
pub type RenderChannel<T> = Channel<CriticalSectionRawMutex, RenderCommand<T>, RENDER_CHANNEL_SIZE>;

/// Check if a draw may be queued without eating lifecycle headroom
pub fn has_draw_capacity<T>(channel: &RenderChannel<T>) -> bool {
    channel.free_capacity() > LIFECYCLE_HEADROOM
}

#[cfg(test)]
mod tests {
    use super::*;
    use frontpanel_hal::PixelFormat;

    #[test]
    fn test_draws_leave_headroom() {
        let channel: RenderChannel<u32> = Channel::new();
        let mut queued = 0;
        while has_draw_capacity(&channel) {
            channel
                .try_send(RenderCommand::Draw {
                    target: queued,
                    slot: 0,
                })
                .unwrap();
            queued += 1;
        }
        assert_eq!(queued as usize, RENDER_CHANNEL_SIZE - LIFECYCLE_HEADROOM);

        let descriptor = PanelDescriptor {
            width: 256,
            height: 64,
            format: PixelFormat::R8Unorm,
        };
        assert!(channel.try_send(RenderCommand::Deinit).is_ok());
        assert!(channel.try_send(RenderCommand::Init { descriptor }).is_ok());
        assert!(channel.is_full());
    }

    #[test]
    fn test_fifo_order() {
        let channel: RenderChannel<u32> = Channel::new();
        channel.try_send(RenderCommand::Draw { target: 1, slot: 0 }).unwrap();
        channel.try_send(RenderCommand::Deinit).unwrap();
        assert_eq!(
            channel.try_receive().ok(),
            Some(RenderCommand::Draw { target: 1, slot: 0 })
        );
        assert_eq!(channel.try_receive().ok(), Some(RenderCommand::Deinit));
        assert!(channel.try_receive().is_err());
    }
}
