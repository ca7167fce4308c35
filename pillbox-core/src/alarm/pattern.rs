//! Alarm on/off patterns
//!
//! Each pattern is a list of step durations in milliseconds. Even steps
//! sound, odd steps are silent, and the list repeats.

/// Named alarm pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pattern {
    /// Short chirps with long gaps
    Gentle,
    /// Even half-second beeps
    #[default]
    Standard,
    /// Rapid beeping
    Urgent,
}

const GENTLE: [u16; 6] = [200, 1500, 200, 1500, 200, 3000];
const STANDARD: [u16; 6] = [500, 500, 500, 500, 500, 1000];
const URGENT: [u16; 6] = [200, 200, 200, 200, 200, 200];

impl Pattern {
    /// Step durations (ms)
    pub fn steps(self) -> &'static [u16] {
        match self {
            Pattern::Gentle => &GENTLE,
            Pattern::Standard => &STANDARD,
            Pattern::Urgent => &URGENT,
        }
    }

    /// Duration of step `index`, wrapping past the end
    pub fn step_duration(self, index: usize) -> u32 {
        let steps = self.steps();
        steps[index % steps.len()] as u32
    }

    /// Output level for step `index`
    pub fn step_is_on(index: usize) -> bool {
        index % 2 == 0
    }
}
