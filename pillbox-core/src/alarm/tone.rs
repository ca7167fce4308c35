//! Short feedback chirps
//!
//! Chirps are played synchronously by the buzzer driver and are bounded to
//! a few hundred milliseconds.

/// A single tone, or a silent gap when `freq_hz` is zero
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub freq_hz: u16,
    pub duration_ms: u16,
}

impl Tone {
    pub const fn new(freq_hz: u16, duration_ms: u16) -> Self {
        Self {
            freq_hz,
            duration_ms,
        }
    }

    pub const fn rest(duration_ms: u16) -> Self {
        Self::new(0, duration_ms)
    }
}

/// Frequency of the continuous alarm tone (Hz)
pub const ALARM_FREQ_HZ: u16 = 2000;

/// Feedback sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Chirp {
    /// Two rising tones
    Confirm,
    /// Two falling tones
    Error,
    /// C5, E5, G5 at half volume
    Startup,
}

const CONFIRM: [Tone; 2] = [Tone::new(1000, 80), Tone::new(1500, 80)];
const ERROR: [Tone; 2] = [Tone::new(800, 100), Tone::new(400, 150)];
const STARTUP: [Tone; 6] = [
    Tone::new(523, 100),
    Tone::rest(50),
    Tone::new(659, 100),
    Tone::rest(50),
    Tone::new(784, 100),
    Tone::rest(50),
];

impl Chirp {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Chirp::Confirm => &CONFIRM,
            Chirp::Error => &ERROR,
            Chirp::Startup => &STARTUP,
        }
    }

    /// Volume to play at, given the configured volume
    pub fn volume(self, configured: u8) -> u8 {
        match self {
            Chirp::Startup => configured / 2,
            _ => configured,
        }
    }

    /// Total playing time (ms)
    pub fn duration_ms(self) -> u32 {
        self.tones().iter().map(|t| t.duration_ms as u32).sum()
    }
}
