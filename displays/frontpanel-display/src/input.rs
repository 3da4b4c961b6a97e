//! Key events offered to the hosted widget

use frontpanel_protocol::{ButtonEvent, PanelButton};

/// Key identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Key {
    /// A front panel button
    Panel(PanelButton),
    /// Any other host key, by host key code
    Code(u32),
}

/// Key press or release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyEvent {
    pub key: Key,
    /// Held-key repeat (key-down only)
    pub repeat: bool,
}

impl KeyEvent {
    pub const fn new(key: Key) -> Self {
        Self { key, repeat: false }
    }

    pub const fn repeated(key: Key) -> Self {
        Self { key, repeat: true }
    }

    /// Panel button this event refers to, if any
    pub fn panel_button(&self) -> Option<PanelButton> {
        match self.key {
            Key::Panel(button) => Some(button),
            Key::Code(_) => None,
        }
    }
}

impl From<ButtonEvent> for KeyEvent {
    fn from(event: ButtonEvent) -> Self {
        match event {
            ButtonEvent::Press { button, repeat: true } => Self::repeated(Key::Panel(button)),
            ButtonEvent::Press { button, repeat: false } => Self::new(Key::Panel(button)),
            ButtonEvent::Release { button } => Self::new(Key::Panel(button)),
        }
    }
}

/// Whether a handler consumed the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reply {
    Handled,
    #[default]
    Unhandled,
}

impl Reply {
    pub fn is_handled(&self) -> bool {
        matches!(self, Reply::Handled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_button_event() {
        let event = KeyEvent::from(ButtonEvent::Press {
            button: PanelButton::DPadDown,
            repeat: true,
        });
        assert_eq!(event.panel_button(), Some(PanelButton::DPadDown));
        assert!(event.repeat);
        assert_eq!(event, KeyEvent::repeated(Key::Panel(PanelButton::DPadDown)));

        let event = KeyEvent::from(ButtonEvent::Press {
            button: PanelButton::Button4,
            repeat: false,
        });
        assert_eq!(event, KeyEvent::new(Key::Panel(PanelButton::Button4)));

        let event = KeyEvent::from(ButtonEvent::Release {
            button: PanelButton::Button2,
        });
        assert_eq!(event.key, Key::Panel(PanelButton::Button2));
        assert!(!event.repeat);
    }

    #[test]
    fn test_reply_default_unhandled() {
        assert!(!Reply::default().is_handled());
        assert!(Reply::Handled.is_handled());
        assert_eq!(KeyEvent::new(Key::Code(13)).panel_button(), None);
    }
}
