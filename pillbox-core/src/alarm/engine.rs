//! Alarm pattern state machine
//!
//! ```text
//! Inactive --start--> Active --snooze--> Snoozed
//!    ^                  |  ^               |
//!    +------stop--------+  +--expiry-------+
//!    ^                                     |
//!    +----------------stop-----------------+
//! ```

use super::Pattern;
use crate::time::elapsed;

/// Alarm session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    #[default]
    Inactive,
    /// Pattern playing
    Active,
    /// Output held off until the snooze expires
    Snoozed,
}

/// Drives the buzzer level through a pattern
#[derive(Debug, Clone)]
pub struct AlarmEngine {
    /// Administrative enable; cleared when muted or alarms are switched off
    enabled: bool,
    state: AlarmState,
    pattern: Pattern,
    step: usize,
    step_started_at: u32,
    snooze_started_at: u32,
    snooze_ms: u32,
    /// Pattern level before the enable gate
    level: bool,
}

impl Default for AlarmEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlarmEngine {
    pub const fn new() -> Self {
        Self {
            enabled: true,
            state: AlarmState::Inactive,
            pattern: Pattern::Standard,
            step: 0,
            step_started_at: 0,
            snooze_started_at: 0,
            snooze_ms: 0,
            level: false,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Active or snoozed
    pub fn is_active(&self) -> bool {
        self.state != AlarmState::Inactive
    }

    pub fn is_snoozed(&self) -> bool {
        self.state == AlarmState::Snoozed
    }

    pub fn pattern(&self) -> Pattern {
        self.pattern
    }

    /// Current step index within the pattern
    pub fn step(&self) -> usize {
        self.step
    }

    /// Level the buzzer should be driven at
    pub fn output(&self) -> bool {
        self.enabled && self.level
    }

    /// Start `pattern` from step 0 with the output on
    ///
    /// Returns `false` without changing anything when disabled.
    pub fn start(&mut self, pattern: Pattern, now_ms: u32) -> bool {
        if !self.enabled {
            debug!("Alarm start blocked: disabled");
            return false;
        }
        self.state = AlarmState::Active;
        self.pattern = pattern;
        self.step = 0;
        self.step_started_at = now_ms;
        self.level = true;
        info!("Alarm started ({})", pattern);
        true
    }

    pub fn stop(&mut self) {
        if self.state != AlarmState::Inactive {
            info!("Alarm stopped");
        }
        self.state = AlarmState::Inactive;
        self.step = 0;
        self.level = false;
    }

    /// Silence for `seconds`; only valid while active
    pub fn snooze(&mut self, seconds: u16, now_ms: u32) -> bool {
        if self.state != AlarmState::Active {
            return false;
        }
        self.state = AlarmState::Snoozed;
        self.snooze_started_at = now_ms;
        self.snooze_ms = seconds as u32 * 1000;
        self.level = false;
        info!("Alarm snoozed for {}s", seconds);
        true
    }

    /// Advance timing; returns `true` if [`output`](Self::output) changed
    pub fn tick(&mut self, now_ms: u32) -> bool {
        let before = self.output();

        match self.state {
            AlarmState::Inactive => {}
            AlarmState::Snoozed => {
                if elapsed(now_ms, self.snooze_started_at) >= self.snooze_ms {
                    self.state = AlarmState::Active;
                    self.step = 0;
                    self.step_started_at = now_ms;
                    self.level = true;
                    info!("Snooze ended, alarm resumed");
                }
            }
            AlarmState::Active => {
                if elapsed(now_ms, self.step_started_at) >= self.pattern.step_duration(self.step) {
                    self.step = (self.step + 1) % self.pattern.steps().len();
                    self.step_started_at = now_ms;
                    self.level = Pattern::step_is_on(self.step);
                }
            }
        }

        self.output() != before
    }

    /// Whole seconds left on the snooze, 0 when not snoozed
    pub fn remaining_snooze_secs(&self, now_ms: u32) -> u16 {
        if self.state != AlarmState::Snoozed {
            return 0;
        }
        let spent = elapsed(now_ms, self.snooze_started_at);
        (self.snooze_ms.saturating_sub(spent) / 1000) as u16
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_asserts_output() {
        let mut alarm = AlarmEngine::new();
        assert!(!alarm.output());
        assert!(alarm.start(Pattern::Standard, 1000));
        assert_eq!(alarm.state(), AlarmState::Active);
        assert_eq!(alarm.step(), 0);
        assert!(alarm.output());
    }

    #[test]
    fn test_pattern_steps_advance_and_wrap() {
        let mut alarm = AlarmEngine::new();
        alarm.start(Pattern::Standard, 0);

        assert!(!alarm.tick(499));
        assert!(alarm.tick(500));
        assert_eq!(alarm.step(), 1);
        assert!(!alarm.output());

        alarm.tick(1000);
        alarm.tick(1500);
        alarm.tick(2000);
        alarm.tick(2500);
        assert_eq!(alarm.step(), 5);
        assert!(!alarm.output());

        // Step 5 lasts 1000 ms
        alarm.tick(3499);
        assert_eq!(alarm.step(), 5);
        alarm.tick(3500);
        assert_eq!(alarm.step(), 0);
        assert!(alarm.output());
    }

    #[test]
    fn test_snooze_only_from_active() {
        let mut alarm = AlarmEngine::new();
        assert!(!alarm.snooze(300, 0));
        assert_eq!(alarm.state(), AlarmState::Inactive);

        alarm.start(Pattern::Standard, 0);
        assert!(alarm.snooze(300, 100));
        assert!(!alarm.output());
        assert!(!alarm.snooze(300, 200));
    }

    #[test]
    fn test_snooze_countdown_and_resume_from_step_zero() {
        let mut alarm = AlarmEngine::new();
        alarm.start(Pattern::Standard, 0);
        alarm.tick(500);
        alarm.tick(1000);
        assert_eq!(alarm.step(), 2);

        alarm.snooze(300, 1200);
        assert_eq!(alarm.remaining_snooze_secs(1200), 300);
        assert_eq!(alarm.remaining_snooze_secs(61_200), 240);

        // Frozen while snoozed
        alarm.tick(100_000);
        assert!(alarm.is_snoozed());
        assert!(!alarm.output());

        assert!(alarm.tick(301_200));
        assert_eq!(alarm.state(), AlarmState::Active);
        assert_eq!(alarm.step(), 0);
        assert!(alarm.output());
        assert_eq!(alarm.remaining_snooze_secs(301_200), 0);
    }

    #[test]
    fn test_stop_from_snoozed() {
        let mut alarm = AlarmEngine::new();
        alarm.start(Pattern::Urgent, 0);
        alarm.snooze(60, 10);
        alarm.stop();
        assert_eq!(alarm.state(), AlarmState::Inactive);
        assert!(!alarm.output());
        assert_eq!(alarm.remaining_snooze_secs(20), 0);
    }

    #[test]
    fn test_disabled_start_is_noop() {
        let mut alarm = AlarmEngine::new();
        alarm.set_enabled(false);
        assert!(!alarm.start(Pattern::Standard, 0));
        assert_eq!(alarm.state(), AlarmState::Inactive);
        assert!(!alarm.output());
    }

    #[test]
    fn test_disabling_mutes_running_pattern() {
        let mut alarm = AlarmEngine::new();
        alarm.start(Pattern::Standard, 0);
        alarm.set_enabled(false);
        assert!(alarm.is_active());
        assert!(!alarm.output());
    }

    #[test]
    fn test_snooze_across_counter_wrap() {
        let mut alarm = AlarmEngine::new();
        let start = u32::MAX - 1000;
        alarm.start(Pattern::Standard, start);
        alarm.snooze(5, start);
        assert_eq!(alarm.remaining_snooze_secs(start.wrapping_add(2000)), 3);
        alarm.tick(start.wrapping_add(5000));
        assert!(!alarm.is_snoozed());
    }
}
