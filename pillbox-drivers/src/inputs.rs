//! Button and lid switch pins

use embedded_hal::digital::InputPin;
use pillbox_core::input::RawInputs;

/// The three front-panel buttons and the lid switch
///
/// Buttons pull the pin low when pressed. The lid switch polarity depends
/// on how the reed switch or microswitch is mounted, so it is configurable.
/// A pin that cannot be read counts as released / closed.
pub struct PanelInputs<OK, NEXT, BACK, LID> {
    ok: OK,
    next: NEXT,
    back: BACK,
    lid: LID,
    /// Pin level that means "lid open"
    lid_open_high: bool,
}

impl<OK, NEXT, BACK, LID> PanelInputs<OK, NEXT, BACK, LID>
where
    OK: InputPin,
    NEXT: InputPin,
    BACK: InputPin,
    LID: InputPin,
{
    pub fn new(ok: OK, next: NEXT, back: BACK, lid: LID, lid_open_high: bool) -> Self {
        Self {
            ok,
            next,
            back,
            lid,
            lid_open_high,
        }
    }

    /// Sample every pin once
    pub fn read(&mut self) -> RawInputs {
        RawInputs {
            ok: self.ok.is_low().unwrap_or(false),
            next: self.next.is_low().unwrap_or(false),
            back: self.back.is_low().unwrap_or(false),
            lid_open: self
                .lid
                .is_high()
                .map(|high| high == self.lid_open_high)
                .unwrap_or(false),
        }
    }
}
