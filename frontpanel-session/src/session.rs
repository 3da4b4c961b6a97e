//! Panel session
//!
//! Simulation-side owner of everything the host interacts with: the hosted
//! widget, button polling and the lights. Every public operation is
//! infallible; device failures are logged and the affected work is retried
//! on the next tick.

use std::sync::Arc;
use std::time::Instant;

use embassy_sync::channel::Channel;

use frontpanel_core::config::PanelConfig;
use frontpanel_core::input::ButtonRepeater;
use frontpanel_core::screen::{PanelDescriptor, ScreenError};
use frontpanel_display::{KeyEvent, Size, VirtualWindow, WidgetSurface};
use frontpanel_hal::{PanelDevice, ReadbackDevice, RenderTargetDesc};
use frontpanel_protocol::{ButtonMask, LightMask, PanelLight};

use crate::channel::{has_draw_capacity, RenderChannel, RenderCommand, LIFECYCLE_HEADROOM};
use crate::input::InputSink;
use crate::presenter::PanelPresenter;

/// Whether the screen can be driven
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScreenSupport {
    /// Not yet validated (no widget attached so far)
    Unknown,
    Supported,
    /// Permanently disabled for this session
    Unsupported(ScreenError),
}

/// Panel device chosen once at startup
enum PanelLink<P> {
    Attached(Arc<P>),
    Unattached,
}

/// Resources hosting the widget while one is attached
struct ScreenResources<T> {
    window: VirtualWindow<T>,
    target: T,
    /// Slot the next draw is tagged with
    next_slot: usize,
}

/// Front panel session
pub struct PanelSession<P: PanelDevice, G: ReadbackDevice, S: InputSink> {
    link: PanelLink<P>,
    gpu: Arc<G>,
    channel: Arc<RenderChannel<G::RenderTarget>>,
    config: PanelConfig,
    /// Queried once when the panel is attached
    descriptor: Option<PanelDescriptor>,
    support: ScreenSupport,
    screen: Option<ScreenResources<G::RenderTarget>>,
    repeater: ButtonRepeater,
    sink: S,
    clock: Instant,
}

impl<P: PanelDevice, G: ReadbackDevice, S: InputSink> PanelSession<P, G, S> {
    /// Start a session and its presentation context
    ///
    /// `panel` is `None` when no device was found. A device that reports it
    /// is not present is treated the same way.
    pub fn new(
        panel: Option<Arc<P>>,
        gpu: Arc<G>,
        sink: S,
        config: PanelConfig,
    ) -> (Self, PanelPresenter<P, G>) {
        let link = match panel {
            Some(panel) if panel.is_present() => PanelLink::Attached(panel),
            _ => {
                info!("No front panel attached");
                PanelLink::Unattached
            }
        };

        let descriptor = match &link {
            PanelLink::Attached(panel) => match PanelDescriptor::query(panel.as_ref()) {
                Ok(descriptor) => Some(descriptor),
                Err(e) => {
                    warn!("Front panel screen query failed: {}", e);
                    None
                }
            },
            PanelLink::Unattached => None,
        };

        let support = if config.screen.enabled {
            ScreenSupport::Unknown
        } else {
            info!("Front panel screen disabled by config");
            ScreenSupport::Unsupported(ScreenError::Disabled)
        };

        let channel = Arc::new(Channel::new());
        let presenter_panel = match &link {
            PanelLink::Attached(panel) => Some(panel.clone()),
            PanelLink::Unattached => None,
        };
        let presenter = PanelPresenter::new(presenter_panel, gpu.clone(), channel.clone());

        let session = Self {
            link,
            gpu,
            channel,
            config,
            descriptor,
            support,
            screen: None,
            repeater: ButtonRepeater::new(config.input),
            sink,
            clock: Instant::now(),
        };
        (session, presenter)
    }

    /// A panel device was attached at startup
    pub fn is_available(&self) -> bool {
        matches!(self.link, PanelLink::Attached(_))
    }

    /// Same as [`is_available`](Self::is_available)
    pub fn is_front_panel_available(&self) -> bool {
        self.is_available()
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn screen_support(&self) -> ScreenSupport {
        self.support
    }

    /// Screen resources are allocated and a widget is bound
    pub fn is_screen_active(&self) -> bool {
        self.screen.is_some()
    }

    pub fn input_sink(&self) -> &S {
        &self.sink
    }

    pub fn input_sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// The attached widget
    pub fn screen_widget_mut(&mut self) -> Option<&mut (dyn WidgetSurface<G::RenderTarget> + 'static)> {
        self.screen.as_mut().and_then(|screen| screen.window.content_mut())
    }

    /// Attach a widget to the screen, or detach with `None`
    ///
    /// Attaching allocates screen resources on first use; if the screen
    /// cannot be driven the widget is dropped and nothing else happens.
    /// Attaching again replaces the widget and forces a full layout pass.
    /// Detaching presents a blank frame and releases all screen resources.
    pub fn set_screen_widget(&mut self, widget: Option<Box<dyn WidgetSurface<G::RenderTarget>>>) {
        let Some(widget) = widget else {
            self.release_screen();
            return;
        };
        if !self.is_available() {
            debug!("No front panel, widget ignored");
            return;
        }
        if self.screen.is_none() && !self.init_screen() {
            return;
        }
        if let Some(screen) = self.screen.as_mut() {
            screen.window.set_content(widget);
        }
    }

    fn init_screen(&mut self) -> bool {
        if let ScreenSupport::Unsupported(e) = self.support {
            debug!("Front panel screen unavailable: {}", e);
            return false;
        }

        let validated = self
            .descriptor
            .ok_or(ScreenError::DescriptorUnavailable)
            .and_then(|descriptor| descriptor.validate().map(|()| descriptor));
        let descriptor = match validated {
            Ok(descriptor) => descriptor,
            Err(e) => {
                warn!("Front panel screen unsupported: {}", e);
                self.support = ScreenSupport::Unsupported(e);
                return false;
            }
        };

        // Draws never take the last LIFECYCLE_HEADROOM slots, so with this
        // much free the matching Deinit always fits
        if self.channel.free_capacity() < LIFECYCLE_HEADROOM {
            warn!("Render queue full, front panel screen not initialized");
            return false;
        }

        let desc = RenderTargetDesc::panel(descriptor.width, descriptor.height);
        let target = match self.gpu.create_render_target(&desc) {
            Ok(target) => target,
            Err(e) => {
                warn!("Front panel render target creation failed: {}", e);
                return false;
            }
        };

        if self.channel.try_send(RenderCommand::Init { descriptor }).is_err() {
            error!("Render queue full, front panel screen not initialized");
            return false;
        }

        self.support = ScreenSupport::Supported;
        self.screen = Some(ScreenResources {
            window: VirtualWindow::new(Size::new(descriptor.width, descriptor.height)),
            target,
            next_slot: 0,
        });
        info!(
            "Front panel screen initialized: {}x{}",
            descriptor.width,
            descriptor.height
        );
        true
    }

    fn release_screen(&mut self) {
        let Some(mut screen) = self.screen.take() else {
            return;
        };
        drop(screen.window.take_content());
        if self.channel.try_send(RenderCommand::Deinit).is_err() {
            error!("Render queue full, front panel not blanked");
        }
        debug!("Front panel screen released");
    }

    /// Light a button, or turn its light off
    ///
    /// Re-reads the device state first so lights changed elsewhere are kept.
    pub fn set_button_light_state(&self, light: PanelLight, on: bool) {
        let PanelLink::Attached(panel) = &self.link else {
            return;
        };
        let current = match panel.light_states() {
            Ok(raw) => LightMask::from_bits_truncate(raw),
            Err(e) => {
                warn!("Front panel light read failed: {}", e);
                return;
            }
        };
        let updated = current.with_light(light, on);
        if let Err(e) = panel.set_light_states(updated.bits()) {
            warn!("Front panel light write failed: {}", e);
        }
    }

    /// Current state of a button light; false when unknown
    pub fn button_light_state(&self, light: PanelLight) -> bool {
        let PanelLink::Attached(panel) = &self.link else {
            return false;
        };
        match panel.light_states() {
            Ok(raw) => LightMask::from_bits_truncate(raw).contains(light),
            Err(e) => {
                warn!("Front panel light read failed: {}", e);
                false
            }
        }
    }

    /// Advance one tick using the session clock
    pub fn tick(&mut self, delta_time: f32) {
        let now_ms = self.clock.elapsed().as_millis() as u64;
        self.tick_at(delta_time, now_ms);
    }

    /// Advance one tick at `now_ms` milliseconds
    ///
    /// Renders the attached widget and queues a frame pump cycle, then polls
    /// the buttons and forwards resulting events to the input sink.
    pub fn tick_at(&mut self, delta_time: f32, now_ms: u64) {
        if let Some(screen) = self.screen.as_mut() {
            if screen.window.render(&screen.target, delta_time) {
                if !has_draw_capacity(&self.channel) {
                    warn!("Render queue full, frame dropped");
                } else {
                    let draw = RenderCommand::Draw {
                        target: screen.target.clone(),
                        slot: screen.next_slot,
                    };
                    if self.channel.try_send(draw).is_ok() {
                        screen.next_slot ^= 1;
                    }
                }
            }
        }

        self.poll_buttons(now_ms);
    }

    fn poll_buttons(&mut self, now_ms: u64) {
        let PanelLink::Attached(panel) = &self.link else {
            return;
        };
        let raw = match panel.button_states() {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Front panel button read failed: {}", e);
                return;
            }
        };

        let events = self
            .repeater
            .update(ButtonMask::from_bits_truncate(raw), now_ms);
        for event in events {
            trace!("Front panel event: {:?}", event);
            self.sink.dispatch(event);
        }
    }

    /// Offer a key-down to the attached widget
    ///
    /// Returns true if the widget consumed it.
    pub fn handle_key_down(&mut self, event: &KeyEvent) -> bool {
        self.screen
            .as_mut()
            .is_some_and(|screen| screen.window.key_down(event).is_handled())
    }

    /// Offer a key-up to the attached widget
    pub fn handle_key_up(&mut self, event: &KeyEvent) -> bool {
        self.screen
            .as_mut()
            .is_some_and(|screen| screen.window.key_up(event).is_handled())
    }
}

impl<P: PanelDevice, G: ReadbackDevice, S: InputSink> Drop for PanelSession<P, G, S> {
    fn drop(&mut self) {
        self.release_screen();
    }
}
