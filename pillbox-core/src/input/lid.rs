//! Lid reed-switch channel
//!
//! Same debounce as the buttons plus a longer stability window, so a box
//! being carried around does not register as an opening.

use crate::time::elapsed;

/// Debounced lid sensor
#[derive(Debug, Clone)]
pub struct LidChannel {
    debounce_ms: u32,
    stable_ms: u32,
    raw: bool,
    raw_changed_at: u32,
    /// Accepted level
    open: bool,
    just_opened: bool,
    just_closed: bool,
    openings_today: u16,
    /// First sample seen; the sensor has produced a reading
    primed: bool,
}

impl LidChannel {
    pub fn new(debounce_ms: u32, stable_ms: u32) -> Self {
        Self {
            debounce_ms,
            stable_ms,
            raw: false,
            raw_changed_at: 0,
            open: false,
            just_opened: false,
            just_closed: false,
            openings_today: 0,
            primed: false,
        }
    }

    /// Feed one raw sample (`true` = lid open)
    ///
    /// Edge flags from the previous sample are cleared first, so an edge is
    /// visible for exactly one iteration.
    pub fn sample(&mut self, open: bool, now_ms: u32) {
        self.just_opened = false;
        self.just_closed = false;

        if !self.primed {
            // Adopt the power-on level without reporting an edge
            self.primed = true;
            self.raw = open;
            self.open = open;
            self.raw_changed_at = now_ms;
            return;
        }

        if open != self.raw {
            self.raw = open;
            self.raw_changed_at = now_ms;
        }

        let stable_for = elapsed(now_ms, self.raw_changed_at);
        if stable_for > self.debounce_ms && stable_for >= self.stable_ms && self.raw != self.open {
            self.open = self.raw;
            if self.open {
                self.just_opened = true;
                self.openings_today = self.openings_today.saturating_add(1);
                debug!("Lid opened ({} today)", self.openings_today);
            } else {
                self.just_closed = true;
                debug!("Lid closed");
            }
        }
    }

    /// One-shot opened edge; reading clears it
    pub fn just_opened(&mut self) -> bool {
        core::mem::take(&mut self.just_opened)
    }

    /// One-shot closed edge; reading clears it
    pub fn just_closed(&mut self) -> bool {
        core::mem::take(&mut self.just_closed)
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn openings_today(&self) -> u16 {
        self.openings_today
    }

    pub fn reset_daily_count(&mut self) {
        self.openings_today = 0;
    }

    /// Whether the sensor has produced a reading
    pub fn sensor_working(&self) -> bool {
        self.primed
    }
}
