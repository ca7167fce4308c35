//! Debounced input channels
//!
//! Turns raw, noisy logic levels into clean levels plus one-shot events.
//! Every channel is sampled once per loop iteration with the current
//! monotonic time; nothing here blocks.

pub mod button;
pub mod lid;

pub use button::{ButtonChannel, ButtonEvent};
pub use lid::LidChannel;

use crate::config::Timing;

/// Front-panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Ok,
    Next,
    Back,
}

/// One snapshot of the raw input levels
///
/// Levels are logical (pressed / open), already corrected for the
/// electrical polarity of each pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawInputs {
    pub ok: bool,
    pub next: bool,
    pub back: bool,
    pub lid_open: bool,
}

/// The three front-panel buttons
#[derive(Debug, Clone)]
pub struct Buttons {
    pub ok: ButtonChannel,
    pub next: ButtonChannel,
    pub back: ButtonChannel,
}

impl Buttons {
    pub fn new(timing: &Timing) -> Self {
        let channel = ButtonChannel::new(timing.debounce_ms, timing.long_press_ms);
        Self {
            ok: channel.clone(),
            next: channel.clone(),
            back: channel,
        }
    }

    /// Sample all three channels
    pub fn sample(&mut self, raw: &RawInputs, now_ms: u32) {
        self.ok.sample(raw.ok, now_ms);
        self.next.sample(raw.next, now_ms);
        self.back.sample(raw.back, now_ms);
    }

    /// Get a channel by id
    pub fn channel_mut(&mut self, id: ButtonId) -> &mut ButtonChannel {
        match id {
            ButtonId::Ok => &mut self.ok,
            ButtonId::Next => &mut self.next,
            ButtonId::Back => &mut self.back,
        }
    }

    /// Check if any button is currently held down (debounced)
    pub fn any_pressed(&self) -> bool {
        self.ok.is_pressed() || self.next.is_pressed() || self.back.is_pressed()
    }

    /// Drop unread events and ignore the presses in progress
    pub fn suppress(&mut self) {
        self.ok.suppress();
        self.next.suppress();
        self.back.suppress();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(ok: bool, next: bool, back: bool) -> RawInputs {
        RawInputs {
            ok,
            next,
            back,
            lid_open: false,
        }
    }

    #[test]
    fn test_any_pressed_after_debounce() {
        let mut buttons = Buttons::new(&Timing::default());
        buttons.sample(&pressed(false, true, false), 0);
        assert!(!buttons.any_pressed());

        buttons.sample(&pressed(false, true, false), 60);
        assert!(buttons.any_pressed());
        assert!(buttons.next.is_pressed());
        assert!(!buttons.ok.is_pressed());
    }

    #[test]
    fn test_suppress_discards_pending() {
        let mut buttons = Buttons::new(&Timing::default());
        buttons.sample(&pressed(true, false, false), 0);
        buttons.sample(&pressed(true, false, false), 60);
        buttons.sample(&pressed(false, false, false), 100);
        buttons.sample(&pressed(false, false, false), 160);

        buttons.suppress();
        assert_eq!(buttons.ok.consume_event(), None);
    }
}
