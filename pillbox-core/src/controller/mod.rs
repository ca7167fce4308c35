//! Top-level coordinator
//!
//! [`Controller`] owns every subsystem together with the clock, display and
//! buzzer. The firmware calls [`Controller::step`] once per loop iteration:
//!
//! 1. Sample buttons and lid
//! 2. Advance the alarm pattern
//! 3. Wake the display if a button is held while it sleeps; the wake press
//!    is swallowed and only the lid is checked before the iteration ends
//! 4. Once per poll interval: read the clock, detect day rollover, match dose times
//! 5. Lid opened during an alert confirms the dose
//! 6. Handle button events for the mode the iteration started in
//! 7. Sleep the display after inactivity
//!
//! Persistence and the Wi-Fi link are outside the core; the controller queues
//! [`Effect`]s for the firmware to carry out.

mod effects;
mod handlers;
mod remote;

pub use effects::{Effect, MAX_PENDING_EFFECTS};

use heapless::Vec;

use crate::alarm::{AlarmEngine, Chirp, Pattern};
use crate::config::{Settings, Timing, MAX_DOSES};
use crate::input::{ButtonId, Buttons, LidChannel, RawInputs};
use crate::scheduler::{DoseId, DoseScheduler};
use crate::state::{EditDoseStage, Event, Mode};
use crate::storage::{IntakeLog, LogEntry};
use crate::time::{elapsed, DateTime, TimeOfDay};
use crate::traits::{Buzzer, Clock, Display, DisplayError};
use crate::view::{HomeStatus, ListPurpose, MessageKind, View};
use effects::EffectQueue;

/// State read back from storage before boot
#[derive(Debug, Clone, Default)]
pub struct Restored {
    pub settings: Option<Settings>,
    /// Stored `(time, enabled)` pairs
    pub doses: Vec<(TimeOfDay, bool), MAX_DOSES>,
    pub last_day: Option<u8>,
    pub log: Option<IntakeLog>,
}

/// Transient message shown over the current mode
#[derive(Debug, Clone, Copy)]
struct Message {
    kind: MessageKind,
    text: &'static str,
    shown_at: u32,
}

/// Wi-Fi bridge as seen from the controller
#[derive(Debug, Clone, Copy, Default)]
struct Link {
    enabled: bool,
    address: Option<[u8; 4]>,
    /// Remote clock writes allowed
    time_unlocked: bool,
}

/// Owns all subsystems and sequences every multi-component transition
pub struct Controller<C, D, B> {
    clock: C,
    display: D,
    buzzer: B,
    timing: Timing,
    settings: Settings,
    buttons: Buttons,
    lid: LidChannel,
    alarm: AlarmEngine,
    scheduler: DoseScheduler,
    log: IntakeLog,
    mode: Mode,
    /// Last good clock reading
    now: DateTime,
    clock_ok: bool,
    /// Day-of-month rollover detector; `None` until the first reading
    last_day: Option<u8>,
    last_poll_ms: u32,
    last_activity_ms: u32,
    /// Minute of day an alert was last raised in
    alerted_minute: Option<u16>,
    display_on: bool,
    message: Option<Message>,
    link: Link,
    effects: EffectQueue,
    /// Screen contents out of date
    dirty: bool,
}

impl<C: Clock, D: Display, B: Buzzer> Controller<C, D, B> {
    pub fn new(clock: C, display: D, buzzer: B, timing: Timing) -> Self {
        Self {
            clock,
            display,
            buzzer,
            buttons: Buttons::new(&timing),
            lid: LidChannel::new(timing.debounce_ms, timing.lid_stable_ms),
            timing,
            settings: Settings::default(),
            alarm: AlarmEngine::new(),
            scheduler: DoseScheduler::new(),
            log: IntakeLog::new(),
            mode: Mode::Home,
            now: DateTime::FALLBACK,
            clock_ok: true,
            last_day: None,
            last_poll_ms: 0,
            last_activity_ms: 0,
            alerted_minute: None,
            display_on: false,
            message: None,
            link: Link::default(),
            effects: EffectQueue::new(),
            dirty: true,
        }
    }

    /// Bring the controller up from stored state
    ///
    /// Settings are applied first, then the display is powered (failure is
    /// returned and is fatal), the clock is checked (failure only degrades to
    /// the fallback time), stored doses go back through the scheduler, and
    /// the startup chirp plays.
    pub fn boot(&mut self, restored: Restored, now_ms: u32) -> Result<(), DisplayError> {
        if let Some(settings) = restored.settings {
            self.settings = settings;
        }
        self.apply_settings();

        self.display.set_power(true)?;
        self.display_on = true;

        self.init_clock();

        let rejected = self.scheduler.restore(restored.doses);
        if rejected > 0 {
            warn!("{} stored doses rejected", rejected);
        }

        self.last_day = restored.last_day;
        match restored.log {
            Some(log) if log.is_valid() => self.log = log,
            Some(_) => warn!("Stored intake log inconsistent, starting empty"),
            None => {}
        }

        self.chirp(Chirp::Startup);

        self.mode = Mode::Home;
        self.last_poll_ms = now_ms;
        self.last_activity_ms = now_ms;
        self.render(now_ms);

        info!(
            "Boot complete: {} doses, alarm {}, mute {}",
            self.scheduler.len(),
            self.settings.alarm_enabled,
            self.settings.mute
        );
        Ok(())
    }

    /// Run one loop iteration
    pub fn step(&mut self, now_ms: u32, raw: &RawInputs) {
        self.buttons.sample(raw, now_ms);
        self.lid.sample(raw.lid_open, now_ms);

        let was_snoozed = self.alarm.is_snoozed();
        if self.alarm.tick(now_ms) {
            self.buzzer.set_output(self.alarm.output());
        }
        if was_snoozed != self.alarm.is_snoozed() {
            self.dirty = true;
        }

        if self.buttons.any_pressed() {
            self.last_activity_ms = now_ms;
            if !self.display_on {
                self.wake();
                self.buttons.suppress();
                // The lid edge is only visible this iteration
                self.check_lid(now_ms);
                return;
            }
        }

        if elapsed(now_ms, self.last_poll_ms) >= self.timing.poll_interval_ms {
            self.last_poll_ms = now_ms;
            self.poll(now_ms);
        }

        self.check_lid(now_ms);

        // All events are consumed; only those for the screen the iteration
        // started on are handled
        let screen = core::mem::discriminant(&self.mode);
        for id in [ButtonId::Ok, ButtonId::Next, ButtonId::Back] {
            let Some(press) = self.buttons.channel_mut(id).consume_event() else {
                continue;
            };
            if core::mem::discriminant(&self.mode) == screen {
                self.handle_event(Event::from_button(id, press), now_ms);
            } else {
                trace!("Dropped {} after mode change", id);
            }
        }

        self.expire_message(now_ms);
        self.check_screen_timeout(now_ms);

        if self.dirty {
            self.render(now_ms);
        }
    }

    /// Next effect for the firmware to carry out
    pub fn take_effect(&mut self) -> Option<Effect> {
        self.effects.pop()
    }

    /// Reset schedule, settings and log to defaults
    pub fn factory_reset(&mut self) {
        warn!("Factory reset");
        self.end_alert();
        self.scheduler.clear();
        self.log.clear();
        self.settings = Settings::default();
        self.apply_settings();
        self.effects.push(Effect::SaveDoses);
        self.effects.push(Effect::SaveSettings);
        self.effects.push(Effect::SaveLog);
        self.mode = Mode::Home;
        self.dirty = true;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scheduler(&self) -> &DoseScheduler {
        &self.scheduler
    }

    pub fn log(&self) -> &IntakeLog {
        &self.log
    }

    pub fn alarm(&self) -> &AlarmEngine {
        &self.alarm
    }

    pub fn lid(&self) -> &LidChannel {
        &self.lid
    }

    /// Most recent clock reading
    pub fn now(&self) -> DateTime {
        self.now
    }

    /// Whether the last clock read succeeded
    pub fn clock_ok(&self) -> bool {
        self.clock_ok
    }

    pub fn display_on(&self) -> bool {
        self.display_on
    }

    pub fn link_enabled(&self) -> bool {
        self.link.enabled
    }

    pub fn time_unlocked(&self) -> bool {
        self.link.time_unlocked
    }

    /// Dose the live alert is for
    pub fn active_dose(&self) -> Option<DoseId> {
        match self.mode {
            Mode::Alert { dose } => Some(dose),
            _ => None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn buzzer(&self) -> &B {
        &self.buzzer
    }

    /// What the screen should show right now
    pub fn view(&self, now_ms: u32) -> View {
        if let Some(message) = &self.message {
            return View::Message {
                kind: message.kind,
                text: message.text,
            };
        }

        match self.mode {
            Mode::Home => View::Home(self.home_status()),
            Mode::MainMenu { cursor } => View::MainMenu { selected: cursor },
            Mode::DoseMenu { cursor } => View::DoseMenu { selected: cursor },
            Mode::AddDose(edit) => View::DoseEdit {
                time: edit.value,
                field: edit.field,
                is_new: true,
            },
            Mode::EditDose(EditDoseStage::Pick { cursor }) => View::DoseList {
                doses: self.dose_list(),
                selected: cursor,
                purpose: ListPurpose::Edit,
            },
            Mode::EditDose(EditDoseStage::Fields { edit, .. }) => View::DoseEdit {
                time: edit.value,
                field: edit.field,
                is_new: false,
            },
            Mode::DeleteDose { cursor } => View::DoseList {
                doses: self.dose_list(),
                selected: cursor,
                purpose: ListPurpose::Delete,
            },
            Mode::EditTime(edit) => View::TimeEdit {
                time: edit.value,
                field: edit.field,
            },
            Mode::EditDate(edit) => View::DateEdit {
                date: edit.value,
                field: edit.field,
            },
            Mode::AlarmToggle => View::AlarmToggle {
                enabled: self.settings.alarm_enabled,
            },
            Mode::WifiToggle => View::WifiToggle {
                enabled: self.link.enabled,
                address: self.link.address,
            },
            Mode::Alert { .. } if self.alarm.is_snoozed() => View::Snoozed {
                remaining_secs: self.alarm.remaining_snooze_secs(now_ms),
            },
            Mode::Alert { dose } => View::Alert {
                dose_number: dose + 1,
                time: self
                    .scheduler
                    .get(dose)
                    .map(|d| d.time)
                    .unwrap_or(self.now.time),
            },
        }
    }

    fn home_status(&self) -> HomeStatus {
        HomeStatus {
            time: self.now.time,
            minutes_to_next: self.scheduler.minutes_until_next(&self.now.time),
            taken: self.scheduler.taken_count() as u8,
            enabled: self.scheduler.enabled_count() as u8,
            wifi: self.link.enabled,
            mute: self.settings.mute,
            alarm_enabled: self.settings.alarm_enabled,
            lid_sensor: self.lid.sensor_working(),
        }
    }

    fn dose_list(&self) -> Vec<crate::scheduler::Dose, MAX_DOSES> {
        // Same capacity on both sides
        Vec::from_slice(self.scheduler.doses()).unwrap_or_default()
    }

    fn render(&mut self, now_ms: u32) {
        self.dirty = false;
        if !self.display_on {
            return;
        }
        let view = self.view(now_ms);
        if let Err(e) = self.display.render(&view) {
            warn!("Render failed: {}", e);
        }
    }

    fn init_clock(&mut self) {
        match self.clock.lost_power() {
            Ok(false) => {}
            Ok(true) => {
                warn!("Clock lost power, setting default time");
                if let Err(e) = self.clock.set_datetime(DateTime::FALLBACK) {
                    warn!("Clock set failed: {}", e);
                }
            }
            Err(e) => warn!("Clock unavailable ({}), using default time", e),
        }
        self.refresh_clock();
    }

    fn refresh_clock(&mut self) {
        match self.clock.now() {
            Ok(now) => {
                self.now = now;
                self.clock_ok = true;
            }
            Err(e) => {
                if self.clock_ok {
                    warn!("Clock read failed: {}", e);
                }
                self.clock_ok = false;
            }
        }
    }

    /// Background checks, once per poll interval
    fn poll(&mut self, now_ms: u32) {
        self.refresh_clock();
        self.check_rollover();
        self.check_dose_time(now_ms);
        self.dirty = true;
    }

    fn check_rollover(&mut self) {
        let today = self.now.date.day;
        match self.last_day {
            None => self.last_day = Some(today),
            Some(day) if day == today => {}
            Some(_) => {
                info!("New day ({}), resetting taken flags", today);
                self.scheduler.reset_daily();
                self.lid.reset_daily_count();
                self.alerted_minute = None;
                self.last_day = Some(today);
                self.effects.push(Effect::SaveLastDay(today));
            }
        }
    }

    fn check_dose_time(&mut self, now_ms: u32) {
        let minute = self.now.time.minute_of_day();
        if self.alerted_minute.is_some_and(|m| m != minute) {
            self.alerted_minute = None;
        }

        if !self.settings.alarms_audible()
            || self.mode.is_alert()
            || self.alarm.is_active()
            || self.alerted_minute.is_some()
        {
            return;
        }

        if let Some(id) = self.scheduler.check_dose_time(&self.now.time) {
            self.raise_alert(id, minute, now_ms);
        }
    }

    fn raise_alert(&mut self, dose: DoseId, minute: u16, now_ms: u32) {
        if !self.alarm.start(Pattern::Standard, now_ms) {
            return;
        }
        self.buzzer.set_output(self.alarm.output());
        info!("Dose {} due at {}", dose, self.now.time);

        self.alerted_minute = Some(minute);
        self.mode = Mode::Alert { dose };
        self.message = None;
        self.last_activity_ms = now_ms;
        if !self.display_on {
            self.wake();
        }
        self.dirty = true;
    }

    /// Lid opened while a dose was due
    fn confirm_intake(&mut self, now_ms: u32) {
        let Mode::Alert { dose } = self.mode else {
            return;
        };
        if let Err(e) = self.scheduler.mark_taken(dose) {
            warn!("Active dose {} not marked: {}", dose, e);
        }
        self.record_opening(Some(dose), true);
        self.end_alert();
        self.chirp(Chirp::Confirm);
        self.last_activity_ms = now_ms;
        info!("Dose {} taken", dose);
    }

    fn check_lid(&mut self, now_ms: u32) {
        if !self.lid.just_opened() {
            return;
        }
        if self.mode.is_alert() {
            self.confirm_intake(now_ms);
        } else {
            self.record_opening(None, false);
        }
    }

    fn record_opening(&mut self, dose: Option<DoseId>, on_time: bool) {
        self.log.record(LogEntry {
            timestamp: self.now.unix_timestamp(),
            dose,
            on_time,
        });
        self.effects.push(Effect::SaveLog);
    }

    /// Stop the alarm and leave the alert, if one is live
    fn end_alert(&mut self) {
        self.alarm.stop();
        self.buzzer.set_output(false);
        if self.mode.is_alert() {
            self.mode = Mode::Home;
        }
        self.dirty = true;
    }

    /// Push `settings` into the subsystems that depend on them
    fn apply_settings(&mut self) {
        self.alarm.set_enabled(self.settings.alarms_audible());
        self.buzzer.set_volume(self.settings.volume);
        if !self.settings.alarms_audible() && self.mode.is_alert() {
            info!("Alarms silenced, ending alert");
            self.end_alert();
        }
        self.dirty = true;
    }

    /// Play a feedback chirp unless muted
    fn chirp(&mut self, chirp: Chirp) {
        if self.settings.mute {
            return;
        }
        let volume = chirp.volume(self.settings.volume);
        for tone in chirp.tones() {
            self.buzzer.play(*tone, volume);
        }
        self.buzzer.set_output(self.alarm.output());
    }

    fn show_message(&mut self, kind: MessageKind, text: &'static str, now_ms: u32) {
        self.message = Some(Message {
            kind,
            text,
            shown_at: now_ms,
        });
        self.dirty = true;
    }

    fn expire_message(&mut self, now_ms: u32) {
        if let Some(message) = self.message {
            if elapsed(now_ms, message.shown_at) >= self.timing.message_ms {
                self.message = None;
                self.dirty = true;
            }
        }
    }

    fn wake(&mut self) {
        if let Err(e) = self.display.set_power(true) {
            warn!("Display wake failed: {}", e);
        }
        self.display_on = true;
        self.dirty = true;
        debug!("Display on");
    }

    fn check_screen_timeout(&mut self, now_ms: u32) {
        if !self.display_on || self.mode.is_alert() {
            return;
        }
        if elapsed(now_ms, self.last_activity_ms) >= self.timing.screen_timeout_ms {
            if let Err(e) = self.display.set_power(false) {
                warn!("Display sleep failed: {}", e);
            }
            self.display_on = false;
            self.mode = Mode::Home;
            self.message = None;
            debug!("Display off after inactivity");
        }
    }
}
