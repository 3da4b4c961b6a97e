//! Edge-triggered button events with held-button repeat
//!
//! Each poll the new mask is diffed against the previous one. A rising edge
//! emits a first press and arms the button's timer with the initial delay;
//! while the button stays held a repeat is emitted every time the timer is
//! due and the timer is re-armed with the repeat delay; a falling edge emits
//! a release. Buttons are processed in [`PanelButton::ALL`] order, so events
//! within one poll are always in that order.
//!
//! Times are milliseconds from any monotonic origin.

use frontpanel_protocol::{ButtonEvent, ButtonMask, PanelButton, BUTTON_COUNT};

use crate::config::InputConfig;

/// Events from one poll; at most one per button
pub type ButtonEvents = heapless::Vec<ButtonEvent, BUTTON_COUNT>;

/// Per-button repeat state machine
#[derive(Debug, Clone)]
pub struct ButtonRepeater {
    initial_delay_ms: u64,
    repeat_delay_ms: u64,
    /// Mask seen on the last successful poll
    previous: ButtonMask,
    /// Next repeat time per button, only meaningful while held
    next_repeat_ms: [u64; BUTTON_COUNT],
}

impl ButtonRepeater {
    pub fn new(config: InputConfig) -> Self {
        Self {
            initial_delay_ms: config.initial_repeat_delay_ms as u64,
            repeat_delay_ms: config.repeat_delay_ms as u64,
            previous: ButtonMask::NONE,
            next_repeat_ms: [0; BUTTON_COUNT],
        }
    }

    /// Mask recorded by the last [`update`](Self::update)
    pub fn previous(&self) -> ButtonMask {
        self.previous
    }

    /// When a held button will next repeat
    pub fn next_repeat_ms(&self, button: PanelButton) -> Option<u64> {
        self.previous
            .contains(button)
            .then(|| self.next_repeat_ms[button.index()])
    }

    /// Diff `new` against `previous` and advance timers
    ///
    /// Does not record `new` as the previous mask; see [`update`](Self::update).
    pub fn generate(&mut self, new: ButtonMask, previous: ButtonMask, now_ms: u64) -> ButtonEvents {
        let mut events = ButtonEvents::new();

        for button in PanelButton::ALL {
            let timer = &mut self.next_repeat_ms[button.index()];
            let event = match (new.contains(button), previous.contains(button)) {
                (true, false) => {
                    *timer = now_ms + self.initial_delay_ms;
                    Some(ButtonEvent::Press {
                        button,
                        repeat: false,
                    })
                }
                (true, true) if now_ms >= *timer => {
                    *timer = now_ms + self.repeat_delay_ms;
                    Some(ButtonEvent::Press {
                        button,
                        repeat: true,
                    })
                }
                (false, true) => Some(ButtonEvent::Release { button }),
                _ => None,
            };

            if let Some(event) = event {
                // Capacity is one slot per button
                let _ = events.push(event);
            }
        }

        events
    }

    /// Process a freshly polled mask and remember it for the next poll
    pub fn update(&mut self, new: ButtonMask, now_ms: u64) -> ButtonEvents {
        let events = self.generate(new, self.previous, now_ms);
        self.previous = new;
        events
    }

    /// Forget held buttons without emitting releases
    pub fn reset(&mut self) {
        self.previous = ButtonMask::NONE;
        self.next_repeat_ms = [0; BUTTON_COUNT];
    }
}

impl Default for ButtonRepeater {
    fn default() -> Self {
        Self::new(InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use proptest::prelude::*;

    fn press(button: PanelButton) -> ButtonEvent {
        ButtonEvent::Press {
            button,
            repeat: false,
        }
    }

    fn repeat(button: PanelButton) -> ButtonEvent {
        ButtonEvent::Press {
            button,
            repeat: true,
        }
    }

    fn release(button: PanelButton) -> ButtonEvent {
        ButtonEvent::Release { button }
    }

    fn mask(buttons: &[PanelButton]) -> ButtonMask {
        buttons.iter().copied().collect()
    }

    #[test]
    fn test_hold_and_release_sequence() {
        let mut repeater = ButtonRepeater::default();
        let b1 = PanelButton::Button1;
        let held = mask(&[b1]);
        let polls = [
            (ButtonMask::NONE, 0, None),
            (held, 50, Some(press(b1))),
            (held, 150, None),
            (held, 250, Some(repeat(b1))),
            (held, 350, Some(repeat(b1))),
            (ButtonMask::NONE, 400, Some(release(b1))),
        ];

        for (state, now, expected) in polls {
            let events = repeater.update(state, now);
            assert_eq!(events.first().copied(), expected, "at {} ms", now);
            assert!(events.len() <= 1);
        }
    }

    #[test]
    fn test_press_at_zero_repeats_on_schedule() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::DPadUp;
        let held = mask(&[b]);

        assert_eq!(repeater.update(held, 0).as_slice(), &[press(b)]);
        assert!(repeater.update(held, 50).is_empty());
        assert!(repeater.update(held, 150).is_empty());
        assert_eq!(repeater.update(held, 250).as_slice(), &[repeat(b)]);
        assert_eq!(repeater.next_repeat_ms(b), Some(350));
        assert_eq!(repeater.update(held, 350).as_slice(), &[repeat(b)]);
        assert_eq!(repeater.update(ButtonMask::NONE, 400).as_slice(), &[release(b)]);
        assert_eq!(repeater.next_repeat_ms(b), None);
    }

    #[test]
    fn test_repeat_fires_exactly_at_deadline() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::Button3;
        repeater.update(mask(&[b]), 1000);
        assert!(repeater.update(mask(&[b]), 1199).is_empty());
        assert_eq!(repeater.update(mask(&[b]), 1200).as_slice(), &[repeat(b)]);
    }

    #[test]
    fn test_short_hold_never_repeats() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::Button2;
        assert_eq!(repeater.update(mask(&[b]), 0).as_slice(), &[press(b)]);
        assert!(repeater.update(mask(&[b]), 100).is_empty());
        assert!(repeater.update(mask(&[b]), 199).is_empty());
        assert_eq!(repeater.update(ButtonMask::NONE, 210).as_slice(), &[release(b)]);
    }

    #[test]
    fn test_repress_rearms_initial_delay() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::Button5;
        repeater.update(mask(&[b]), 0);
        repeater.update(ButtonMask::NONE, 100);
        assert_eq!(repeater.update(mask(&[b]), 300).as_slice(), &[press(b)]);
        assert!(repeater.update(mask(&[b]), 450).is_empty());
        assert_eq!(repeater.update(mask(&[b]), 500).as_slice(), &[repeat(b)]);
    }

    #[test]
    fn test_events_follow_button_order() {
        let mut repeater = ButtonRepeater::default();
        let all: ButtonMask = PanelButton::ALL.into_iter().collect();

        let events = repeater.update(all, 0);
        let order: Vec<PanelButton> = events.iter().map(|e| e.button()).collect();
        assert_eq!(order, PanelButton::ALL.to_vec());
        assert!(events.iter().all(|e| e.is_press() && !e.is_repeat()));

        let events = repeater.update(ButtonMask::NONE, 10);
        let order: Vec<PanelButton> = events.iter().map(|e| e.button()).collect();
        assert_eq!(order, PanelButton::ALL.to_vec());
    }

    #[test]
    fn test_independent_timers() {
        let mut repeater = ButtonRepeater::default();
        let left = PanelButton::DPadLeft;
        let press_btn = PanelButton::DPadPress;

        repeater.update(mask(&[left]), 0);
        repeater.update(mask(&[left, press_btn]), 150);

        // Left is due at 200, press at 350
        assert_eq!(
            repeater.update(mask(&[left, press_btn]), 200).as_slice(),
            &[repeat(left)]
        );
        assert_eq!(
            repeater.update(mask(&[left, press_btn]), 350).as_slice(),
            &[repeat(left), repeat(press_btn)]
        );
    }

    #[test]
    fn test_custom_delays() {
        let mut repeater = ButtonRepeater::new(InputConfig {
            initial_repeat_delay_ms: 500,
            repeat_delay_ms: 50,
        });
        let b = PanelButton::Button4;
        repeater.update(mask(&[b]), 0);
        assert!(repeater.update(mask(&[b]), 400).is_empty());
        assert_eq!(repeater.update(mask(&[b]), 500).as_slice(), &[repeat(b)]);
        assert_eq!(repeater.update(mask(&[b]), 550).as_slice(), &[repeat(b)]);
    }

    #[test]
    fn test_generate_leaves_previous_untouched() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::Button1;
        let events = repeater.generate(mask(&[b]), ButtonMask::NONE, 0);
        assert_eq!(events.as_slice(), &[press(b)]);
        assert_eq!(repeater.previous(), ButtonMask::NONE);
    }

    #[test]
    fn test_reset_forgets_held_buttons() {
        let mut repeater = ButtonRepeater::default();
        let b = PanelButton::Button1;
        repeater.update(mask(&[b]), 0);
        repeater.reset();
        assert_eq!(repeater.update(mask(&[b]), 10).as_slice(), &[press(b)]);
    }

    proptest! {
        #[test]
        fn test_edges_emit_exactly_one_event(
            polls in proptest::collection::vec((0u32..0x400, 1u64..80), 1..40)
        ) {
            let mut repeater = ButtonRepeater::default();
            let mut previous = ButtonMask::NONE;
            let mut now = 0u64;

            for (raw, step) in polls {
                now += step;
                let state = ButtonMask::from_bits_truncate(raw);
                let events = repeater.update(state, now);

                for button in PanelButton::ALL {
                    let mine: Vec<ButtonEvent> = events
                        .iter()
                        .copied()
                        .filter(|e| e.button() == button)
                        .collect();
                    let is_held = state.contains(button);
                    let was_held = previous.contains(button);

                    prop_assert!(mine.len() <= 1);
                    match (is_held, was_held) {
                        (true, false) => prop_assert_eq!(mine, vec![press(button)]),
                        (false, true) => prop_assert_eq!(mine, vec![release(button)]),
                        (false, false) => prop_assert!(mine.is_empty()),
                        (true, true) => prop_assert!(mine.iter().all(|e| e.is_repeat())),
                    }
                }
                previous = state;
            }
        }
    }
}
