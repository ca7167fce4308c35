//! Debounced push button with short/long press detection

use crate::time::elapsed;

/// Gesture reported by a button channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEvent {
    /// Pressed and released before the long-press threshold
    ShortPress,
    /// Held past the long-press threshold (fires while still held)
    LongPress,
}

/// One debounced button
///
/// A raw level change restarts the debounce window; a level that stays put
/// for longer than the window becomes the confirmed level. At most one
/// event is buffered and a newer event overwrites an unread one.
#[derive(Debug, Clone)]
pub struct ButtonChannel {
    debounce_ms: u32,
    long_press_ms: u32,
    /// Last raw sample
    raw: bool,
    /// When `raw` last changed
    raw_changed_at: u32,
    /// Debounced level
    pressed: bool,
    press_started_at: u32,
    long_fired: bool,
    pending: Option<ButtonEvent>,
}

impl ButtonChannel {
    pub fn new(debounce_ms: u32, long_press_ms: u32) -> Self {
        Self {
            debounce_ms,
            long_press_ms,
            raw: false,
            raw_changed_at: 0,
            pressed: false,
            press_started_at: 0,
            long_fired: false,
            pending: None,
        }
    }

    /// Feed one raw sample (`true` = pressed)
    pub fn sample(&mut self, level: bool, now_ms: u32) {
        if level != self.raw {
            self.raw = level;
            self.raw_changed_at = now_ms;
        }

        if elapsed(now_ms, self.raw_changed_at) > self.debounce_ms && self.raw != self.pressed {
            self.pressed = self.raw;

            if self.pressed {
                self.press_started_at = now_ms;
                self.long_fired = false;
            } else if !self.long_fired {
                self.pending = Some(ButtonEvent::ShortPress);
            }
        }

        if self.pressed
            && !self.long_fired
            && elapsed(now_ms, self.press_started_at) >= self.long_press_ms
        {
            self.long_fired = true;
            self.pending = Some(ButtonEvent::LongPress);
        }
    }

    /// Take the pending event, leaving none behind
    pub fn consume_event(&mut self) -> Option<ButtonEvent> {
        self.pending.take()
    }

    /// Drop the pending event and whatever the current hold would produce
    pub fn suppress(&mut self) {
        self.pending = None;
        if self.pressed {
            self.long_fired = true;
        }
    }

    /// Debounced level
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }
}
