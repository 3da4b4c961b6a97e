//! Application input sink

use frontpanel_protocol::{ButtonEvent, PanelButton};

/// Receiver for generated button events
pub trait InputSink {
    fn button_pressed(&mut self, button: PanelButton, is_repeat: bool);

    fn button_released(&mut self, button: PanelButton);

    /// Dispatch a generated event to the matching callback
    fn dispatch(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Press { button, repeat } => self.button_pressed(button, repeat),
            ButtonEvent::Release { button } => self.button_released(button),
        }
    }
}

/// Queue events for the host to drain
impl InputSink for Vec<ButtonEvent> {
    fn button_pressed(&mut self, button: PanelButton, is_repeat: bool) {
        self.push(ButtonEvent::Press {
            button,
            repeat: is_repeat,
        });
    }

    fn button_released(&mut self, button: PanelButton) {
        self.push(ButtonEvent::Release { button });
    }
}
