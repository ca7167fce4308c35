//! Piezo buzzer output

use crate::alarm::Tone;

/// Tone generator
pub trait Buzzer {
    /// Continuous alarm tone on or off
    fn set_output(&mut self, on: bool);

    /// Play one tone to completion at `volume` (0-255)
    ///
    /// Blocks for `tone.duration_ms`; only used for short feedback chirps.
    fn play(&mut self, tone: Tone, volume: u8);

    /// Volume for the alarm tone (0-255)
    fn set_volume(&mut self, volume: u8);
}
