//! State machine events

use crate::input::{ButtonEvent, ButtonId};

/// Button gestures, one variant per button and press length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    OkShort,
    OkLong,
    NextShort,
    NextLong,
    BackShort,
    BackLong,
}

impl Event {
    pub fn from_button(button: ButtonId, press: ButtonEvent) -> Self {
        use ButtonEvent::*;
        match (button, press) {
            (ButtonId::Ok, ShortPress) => Event::OkShort,
            (ButtonId::Ok, LongPress) => Event::OkLong,
            (ButtonId::Next, ShortPress) => Event::NextShort,
            (ButtonId::Next, LongPress) => Event::NextLong,
            (ButtonId::Back, ShortPress) => Event::BackShort,
            (ButtonId::Back, LongPress) => Event::BackLong,
        }
    }
}
